use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    dto::alertas::{AlertaQuery, UpdateAlertaRequest},
    error::{AppError, AppResult},
    models::Alerta,
    response::Operacion,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(alertas_get).put(actualizar_alerta).delete(eliminar_alerta),
    )
}

const SELECT_ALERTA: &str = r#"
    SELECT a.*, p.nombre as producto_nombre
    FROM alertas a
    LEFT JOIN productos p ON a.producto_id = p.id
"#;

#[utoipa::path(get, path = "/api/alertas", tag = "Alertas")]
pub async fn alertas_get(
    State(state): State<AppState>,
    Query(query): Query<AlertaQuery>,
) -> AppResult<Response> {
    if let Some(id) = query.id {
        let alerta: Alerta = sqlx::query_as(&format!("{SELECT_ALERTA} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(&state.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Alerta no encontrada".into()))?;
        return Ok(Json(alerta).into_response());
    }

    let condicion = match query.filtro.as_deref() {
        Some("unread") => " WHERE a.leida = false",
        Some("high") => " WHERE a.severidad = 'high'",
        _ => "",
    };

    let alertas: Vec<Alerta> = sqlx::query_as(&format!(
        "{SELECT_ALERTA}{condicion} ORDER BY a.fecha_creacion DESC"
    ))
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(alertas).into_response())
}

/// `action: "mark_read"` marca la alerta como leída. Es la única acción
/// soportada sobre una alerta existente.
#[utoipa::path(put, path = "/api/alertas", request_body = UpdateAlertaRequest, tag = "Alertas")]
pub async fn actualizar_alerta(
    State(state): State<AppState>,
    Query(query): Query<AlertaQuery>,
    Json(payload): Json<UpdateAlertaRequest>,
) -> AppResult<Json<Operacion>> {
    let id = payload
        .id
        .or(query.id)
        .ok_or_else(|| AppError::BadRequest("ID de alerta requerido".into()))?;

    if payload.action != "mark_read" {
        return Err(AppError::BadRequest("Acción no válida".into()));
    }

    let result = sqlx::query("UPDATE alertas SET leida = true WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Alerta no encontrada".into()));
    }

    Ok(Json(Operacion::ok("Alerta marcada como leída")))
}

#[utoipa::path(delete, path = "/api/alertas", tag = "Alertas")]
pub async fn eliminar_alerta(
    State(state): State<AppState>,
    Query(query): Query<AlertaQuery>,
) -> AppResult<Json<Operacion>> {
    let id = query
        .id
        .ok_or_else(|| AppError::BadRequest("ID de alerta requerido".into()))?;

    let result = sqlx::query("DELETE FROM alertas WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Alerta no encontrada".into()));
    }

    Ok(Json(Operacion::ok("Alerta eliminada")))
}
