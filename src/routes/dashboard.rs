use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::{error::AppResult, models::{Alerta, Movimiento}, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Estadisticas {
    pub inventario_total: i64,
    pub stock_bajo: i64,
    pub pedidos_pendientes: i64,
    pub valor_total: f64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct ProductoStockBajo {
    pub id: i32,
    pub sku: String,
    pub nombre: String,
    pub stock: i32,
    pub stock_minimo: i32,
    pub porcentaje: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardData {
    pub estadisticas: Estadisticas,
    pub movimientos_recientes: Vec<Movimiento>,
    pub productos_stock_bajo: Vec<ProductoStockBajo>,
    pub alertas_activas: Vec<Alerta>,
}

/// Agregados para la pantalla principal: totales de inventario, pedidos
/// pendientes y los últimos movimientos y alertas sin leer.
#[utoipa::path(get, path = "/api/dashboard", tag = "Dashboard")]
pub async fn dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardData>> {
    let (inventario_total,): (i64,) =
        sqlx::query_as("SELECT COALESCE(SUM(stock), 0) FROM productos WHERE activo = true")
            .fetch_one(&state.pool)
            .await?;

    let (stock_bajo,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM productos WHERE activo = true AND stock < stock_minimo",
    )
    .fetch_one(&state.pool)
    .await?;

    let (pedidos_pendientes,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM pedidos WHERE estado = 'pendiente'")
            .fetch_one(&state.pool)
            .await?;

    let (valor_total,): (f64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(stock * precio), 0)::double precision FROM productos WHERE activo = true",
    )
    .fetch_one(&state.pool)
    .await?;

    let movimientos_recientes: Vec<Movimiento> = sqlx::query_as(
        r#"
        SELECT m.*, p.nombre as producto_nombre, u.nombre as responsable_nombre
        FROM movimientos m
        LEFT JOIN productos p ON m.producto_id = p.id
        LEFT JOIN usuarios u ON m.responsable_id = u.id
        ORDER BY m.fecha_movimiento DESC
        LIMIT 5
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let productos_stock_bajo: Vec<ProductoStockBajo> = sqlx::query_as(
        r#"
        SELECT id, sku, nombre, stock, stock_minimo,
               COALESCE(ROUND(stock::numeric / NULLIF(stock_minimo, 0) * 100, 1), 0)::double precision
                   AS porcentaje
        FROM productos
        WHERE activo = true AND stock < stock_minimo
        ORDER BY stock::numeric / NULLIF(stock_minimo, 0) ASC NULLS FIRST
        LIMIT 5
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let alertas_activas: Vec<Alerta> = sqlx::query_as(
        r#"
        SELECT a.*, p.nombre as producto_nombre
        FROM alertas a
        LEFT JOIN productos p ON a.producto_id = p.id
        WHERE a.leida = false
        ORDER BY a.fecha_creacion DESC
        LIMIT 4
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(DashboardData {
        estadisticas: Estadisticas {
            inventario_total,
            stock_bajo,
            pedidos_pendientes,
            valor_total,
        },
        movimientos_recientes,
        productos_stock_bajo,
        alertas_activas,
    }))
}
