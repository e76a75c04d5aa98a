pub mod alertas;
pub mod auth;
pub mod movimientos;
pub mod pedidos;
pub mod productos;
pub mod proveedores;
pub mod usuarios;
