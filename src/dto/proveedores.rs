use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProveedorRequest {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub contacto: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub direccion: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProveedorRequest {
    pub id: Option<i32>,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub contacto: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub direccion: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProveedorQuery {
    pub id: Option<i32>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProveedorCreado {
    pub success: bool,
    pub id: i32,
    pub message: String,
}

/// El borrado es físico; los productos quedan desvinculados por SET NULL.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProveedorEliminado {
    pub success: bool,
    pub message: String,
    pub products_affected: i64,
}
