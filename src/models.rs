use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Modelos de lectura para las consultas sqlx. Los listados incluyen los
/// nombres traídos por LEFT JOIN (categoria_nombre, proveedor_nombre, ...)
/// tal como los consume el frontend.

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Producto {
    pub id: i32,
    pub sku: String,
    pub nombre: String,
    pub descripcion: String,
    pub categoria_id: Option<i32>,
    pub proveedor_id: Option<i32>,
    pub stock: i32,
    pub stock_minimo: i32,
    pub precio: f64,
    pub activo: bool,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
    pub categoria_nombre: Option<String>,
    pub proveedor_nombre: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Proveedor {
    pub id: i32,
    pub nombre: String,
    pub contacto: String,
    pub email: String,
    pub telefono: String,
    pub direccion: String,
    pub activo: bool,
    pub fecha_creacion: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Categoria {
    pub id: i32,
    pub nombre: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Movimiento {
    pub id: i32,
    pub tipo: String,
    pub producto_id: Option<i32>,
    pub cantidad: i32,
    pub responsable_id: Option<i32>,
    pub referencia: String,
    pub notas: String,
    pub fecha_movimiento: DateTime<Utc>,
    pub producto_nombre: Option<String>,
    pub responsable_nombre: Option<String>,
}

/// Fila de `pedidos`. El campo `estado` se remapea al vocabulario del
/// frontend antes de serializarse.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Pedido {
    pub id: i32,
    pub numero_pedido: String,
    pub proveedor_id: Option<i32>,
    pub estado: String,
    pub fecha_entrega_estimada: Option<NaiveDate>,
    pub notas: String,
    pub creado_por: Option<i32>,
    pub monto_total: f64,
    pub fecha_creacion: DateTime<Utc>,
    pub proveedor_nombre: Option<String>,
    pub creado_por_nombre: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LineaPedido {
    pub id: i32,
    pub pedido_id: i32,
    pub producto_id: i32,
    pub cantidad: i32,
    pub precio_unitario: f64,
    pub subtotal: f64,
    pub producto_nombre: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Alerta {
    pub id: i32,
    pub tipo: String,
    pub titulo: String,
    pub mensaje: String,
    pub producto_id: Option<i32>,
    pub severidad: String,
    pub leida: bool,
    pub fecha_creacion: DateTime<Utc>,
    pub producto_nombre: Option<String>,
}

/// Vista pública de un usuario; nunca incluye el hash de contraseña.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Usuario {
    pub id: i32,
    pub nombre: String,
    pub email: String,
    pub rol: String,
    pub activo: bool,
    pub fecha_creacion: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RegistroAuditoria {
    pub id: i32,
    pub usuario_id: Option<i32>,
    pub nombre_usuario: String,
    pub accion: String,
    pub entidad: String,
    pub entidad_id: String,
    pub cambios: String,
    pub fecha: DateTime<Utc>,
}
