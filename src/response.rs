use serde::Serialize;
use utoipa::ToSchema;

/// Envoltura de éxito para mutaciones: `{"success": true, "message": ...}`.
/// Las variantes con campos extra (id, referencia, numero_pedido) viven en
/// los DTOs de cada recurso.
#[derive(Debug, Serialize, ToSchema)]
pub struct Operacion {
    pub success: bool,
    pub message: String,
}

impl Operacion {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
