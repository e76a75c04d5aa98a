use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Usuario;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUsuarioRequest {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub rol: Option<String>,
    pub activo: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUsuarioRequest {
    pub id: Option<i32>,
    pub nombre: Option<String>,
    pub email: Option<String>,
    pub rol: Option<String>,
    pub activo: Option<bool>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsuarioCreado {
    pub success: bool,
    pub message: String,
    pub user: Usuario,
}
