use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::auth::{AuthResponse, LoginRequest, RegisterRequest},
    error::AppResult,
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
}

#[utoipa::path(post, path = "/api/auth/login", request_body = LoginRequest, tag = "Auth")]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let resp = auth_service::login(&state.pool, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(post, path = "/api/auth/register", request_body = RegisterRequest, tag = "Auth")]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    let resp = auth_service::register(&state.pool, payload).await?;
    Ok(Json(resp))
}
