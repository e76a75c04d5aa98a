use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use sqlx::{Postgres, QueryBuilder};

use crate::{
    dto::movimientos::{CreateMovimientoRequest, MovimientoCreado, MovimientoQuery},
    error::{AppError, AppResult},
    models::Movimiento,
    services::movimiento_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(movimientos_get).post(registrar_movimiento))
}

const SELECT_MOVIMIENTO: &str = r#"
    SELECT m.*, p.nombre as producto_nombre, u.nombre as responsable_nombre
    FROM movimientos m
    LEFT JOIN productos p ON m.producto_id = p.id
    LEFT JOIN usuarios u ON m.responsable_id = u.id
"#;

#[utoipa::path(get, path = "/api/movimientos", tag = "Movimientos")]
pub async fn movimientos_get(
    State(state): State<AppState>,
    Query(query): Query<MovimientoQuery>,
) -> AppResult<Response> {
    if let Some(id) = query.id {
        let movimiento: Movimiento =
            sqlx::query_as(&format!("{SELECT_MOVIMIENTO} WHERE m.id = $1"))
                .bind(id)
                .fetch_optional(&state.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Movimiento no encontrado".into()))?;
        return Ok(Json(movimiento).into_response());
    }

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_MOVIMIENTO);
    qb.push(" WHERE 1=1");

    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let term = format!("%{search}%");
        qb.push(" AND (p.nombre ILIKE ")
            .push_bind(term.clone())
            .push(" OR m.referencia ILIKE ")
            .push_bind(term)
            .push(")");
    }

    if let Some(tipo) = query
        .tipo
        .as_deref()
        .filter(|t| !t.is_empty() && *t != "all")
    {
        qb.push(" AND m.tipo = ").push_bind(tipo.to_string());
    }

    qb.push(" ORDER BY m.fecha_movimiento DESC");

    let movimientos: Vec<Movimiento> = qb.build_query_as().fetch_all(&state.pool).await?;
    Ok(Json(movimientos).into_response())
}

#[utoipa::path(post, path = "/api/movimientos", request_body = CreateMovimientoRequest, tag = "Movimientos")]
pub async fn registrar_movimiento(
    State(state): State<AppState>,
    Json(payload): Json<CreateMovimientoRequest>,
) -> AppResult<(StatusCode, Json<MovimientoCreado>)> {
    let creado = movimiento_service::registrar_movimiento(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(creado)))
}
