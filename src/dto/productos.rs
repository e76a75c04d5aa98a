use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// La categoría y el proveedor pueden venir por id o por nombre
/// (`categoria`/`proveedor`); el handler resuelve el nombre a id.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductoRequest {
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    pub categoria_id: Option<i32>,
    pub categoria: Option<String>,
    pub proveedor_id: Option<i32>,
    pub proveedor: Option<String>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub stock_minimo: i32,
    #[serde(default)]
    pub precio: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductoRequest {
    pub id: Option<i32>,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    pub categoria_id: Option<i32>,
    pub categoria: Option<String>,
    pub proveedor_id: Option<i32>,
    pub proveedor: Option<String>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub stock_minimo: i32,
    #[serde(default)]
    pub precio: f64,
    pub activo: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductoQuery {
    pub id: Option<i32>,
    pub search: Option<String>,
    pub categoria: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductoCreado {
    pub success: bool,
    pub id: i32,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResultadoImportacion {
    pub success: bool,
    pub importados: usize,
    pub errores: Vec<String>,
    pub message: String,
}
