use axum::{Json, Router, extract::State, routing::get};

use crate::{error::AppResult, models::RegistroAuditoria, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_auditoria))
}

/// La bitácora completa; el filtrado por año lo hace el cliente.
#[utoipa::path(get, path = "/api/auditoria", tag = "Auditoria")]
pub async fn list_auditoria(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RegistroAuditoria>>> {
    let logs: Vec<RegistroAuditoria> =
        sqlx::query_as("SELECT * FROM auditoria ORDER BY fecha DESC")
            .fetch_all(&state.pool)
            .await?;
    Ok(Json(logs))
}
