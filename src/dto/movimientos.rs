use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMovimientoRequest {
    #[serde(default)]
    pub tipo: String,
    pub producto_id: Option<i32>,
    #[serde(default)]
    pub cantidad: i32,
    pub responsable_id: Option<i32>,
    #[serde(default)]
    pub referencia: String,
    #[serde(default)]
    pub notas: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MovimientoQuery {
    pub id: Option<i32>,
    pub search: Option<String>,
    pub tipo: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MovimientoCreado {
    pub success: bool,
    pub id: i32,
    pub referencia: String,
    pub message: String,
}
