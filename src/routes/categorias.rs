use axum::{Json, Router, extract::State, routing::get};

use crate::{error::AppResult, models::Categoria, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_categorias))
}

#[utoipa::path(get, path = "/api/categorias", tag = "Categorias")]
pub async fn list_categorias(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Categoria>>> {
    let categorias: Vec<Categoria> =
        sqlx::query_as("SELECT * FROM categorias ORDER BY nombre")
            .fetch_all(&state.pool)
            .await?;
    Ok(Json(categorias))
}
