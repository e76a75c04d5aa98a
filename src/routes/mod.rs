use axum::Router;

use crate::state::AppState;

pub mod alertas;
pub mod auditoria;
pub mod auth;
pub mod categorias;
pub mod dashboard;
pub mod doc;
pub mod health;
pub mod movimientos;
pub mod pedidos;
pub mod productos;
pub mod proveedores;
pub mod reportes;
pub mod usuarios;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/productos", productos::router())
        .nest("/proveedores", proveedores::router())
        .nest("/categorias", categorias::router())
        .nest("/movimientos", movimientos::router())
        .nest("/pedidos", pedidos::router())
        .nest("/alertas", alertas::router())
        .nest("/usuarios", usuarios::router())
        .nest("/auditoria", auditoria::router())
        .nest("/dashboard", dashboard::router())
        .nest("/reportes", reportes::router())
}
