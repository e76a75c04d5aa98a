pub mod alertas;
pub mod categorias;
pub mod movimientos;
pub mod pedido_productos;
pub mod pedidos;
pub mod productos;
pub mod proveedores;
pub mod usuarios;

pub use alertas::Entity as Alertas;
pub use categorias::Entity as Categorias;
pub use movimientos::Entity as Movimientos;
pub use pedido_productos::Entity as PedidoProductos;
pub use pedidos::Entity as Pedidos;
pub use productos::Entity as Productos;
pub use proveedores::Entity as Proveedores;
pub use usuarios::Entity as Usuarios;
