use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::{error::AppResult, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(reportes))
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct RotacionProducto {
    pub id: i32,
    pub nombre: String,
    pub sku: String,
    pub stock: i32,
    pub total_movimientos: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct ResumenMensual {
    pub mes: String,
    pub ventas: f64,
    pub compras: f64,
    pub margen: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Reportes {
    #[serde(rename = "rotationData")]
    pub rotation_data: Vec<RotacionProducto>,
    #[serde(rename = "monthlyData")]
    pub monthly_data: Vec<ResumenMensual>,
}

/// Reportes de rotación (los 10 productos con más movimientos) y resumen
/// mensual de los últimos 6 meses. Las salidas se valoran a precio actual
/// del producto; el margen es ventas menos compras.
#[utoipa::path(get, path = "/api/reportes", tag = "Reportes")]
pub async fn reportes(State(state): State<AppState>) -> AppResult<Json<Reportes>> {
    let rotation_data: Vec<RotacionProducto> = sqlx::query_as(
        r#"
        SELECT p.id, p.nombre, p.sku, p.stock, COUNT(m.id) AS total_movimientos
        FROM productos p
        JOIN movimientos m ON m.producto_id = p.id
        GROUP BY p.id, p.nombre, p.sku, p.stock
        ORDER BY total_movimientos DESC
        LIMIT 10
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let monthly_data: Vec<ResumenMensual> = sqlx::query_as(
        r#"
        SELECT to_char(date_trunc('month', m.fecha_movimiento), 'YYYY-MM') AS mes,
               COALESCE(SUM(CASE WHEN m.tipo = 'exit' THEN m.cantidad * p.precio ELSE 0 END), 0)::double precision AS ventas,
               COALESCE(SUM(CASE WHEN m.tipo = 'entry' THEN m.cantidad * p.precio ELSE 0 END), 0)::double precision AS compras,
               COALESCE(SUM(CASE WHEN m.tipo = 'exit' THEN m.cantidad * p.precio
                                 ELSE -m.cantidad * p.precio END), 0)::double precision AS margen
        FROM movimientos m
        JOIN productos p ON m.producto_id = p.id
        WHERE m.fecha_movimiento >= date_trunc('month', NOW()) - INTERVAL '5 months'
        GROUP BY date_trunc('month', m.fecha_movimiento)
        ORDER BY date_trunc('month', m.fecha_movimiento)
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(Reportes {
        rotation_data,
        monthly_data,
    }))
}
