use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AlertaQuery {
    pub id: Option<i32>,
    /// all | unread | high
    pub filtro: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAlertaRequest {
    pub id: Option<i32>,
    #[serde(default)]
    pub action: String,
}
