use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{LineaPedido, Pedido};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LineaPedidoRequest {
    pub producto_id: i32,
    pub cantidad: i32,
    pub precio_unitario: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePedidoRequest {
    pub proveedor_id: Option<i32>,
    pub fecha_entrega_estimada: Option<NaiveDate>,
    #[serde(default)]
    pub notas: String,
    pub creado_por: Option<i32>,
    #[serde(default)]
    pub productos: Vec<LineaPedidoRequest>,
    #[serde(default)]
    pub monto_total: f64,
}

/// El frontend envía `nuevo_estado`; versiones anteriores enviaban `estado`.
/// El id puede venir en el cuerpo o como query param.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEstadoRequest {
    pub id: Option<i32>,
    pub nuevo_estado: Option<String>,
    pub estado: Option<String>,
    pub usuario_id: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PedidoQuery {
    pub id: Option<i32>,
    pub search: Option<String>,
    /// Filtro en vocabulario de frontend; se mapea a BD en el handler.
    pub estado: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PedidoConProductos {
    #[serde(flatten)]
    pub pedido: Pedido,
    pub productos: Vec<LineaPedido>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PedidoCreado {
    pub success: bool,
    pub id: i32,
    pub numero_pedido: String,
    pub message: String,
}
