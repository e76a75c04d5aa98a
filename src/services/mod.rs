pub mod auth_service;
pub mod movimiento_service;
pub mod pedido_service;
