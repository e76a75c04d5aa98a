use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{alertas as alertas_dto, auth as auth_dto, movimientos as movimientos_dto,
          pedidos as pedidos_dto, productos as productos_dto, proveedores as proveedores_dto,
          usuarios as usuarios_dto},
    models::{
        Alerta, Categoria, LineaPedido, Movimiento, Pedido, Producto, Proveedor,
        RegistroAuditoria, Usuario,
    },
    response::Operacion,
    routes::{
        alertas, auditoria, auth, categorias, dashboard, health, movimientos, pedidos,
        productos, proveedores, reportes, usuarios,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        productos::productos_get,
        productos::crear_producto,
        productos::actualizar_producto,
        productos::eliminar_producto,
        productos::importar_productos,
        proveedores::proveedores_get,
        proveedores::crear_proveedor,
        proveedores::actualizar_proveedor,
        proveedores::eliminar_proveedor,
        categorias::list_categorias,
        movimientos::movimientos_get,
        movimientos::registrar_movimiento,
        pedidos::pedidos_get,
        pedidos::crear_pedido,
        pedidos::actualizar_estado,
        alertas::alertas_get,
        alertas::actualizar_alerta,
        alertas::eliminar_alerta,
        usuarios::list_usuarios,
        usuarios::crear_usuario,
        usuarios::actualizar_usuario,
        auditoria::list_auditoria,
        dashboard::dashboard,
        reportes::reportes
    ),
    components(
        schemas(
            Producto,
            Proveedor,
            Categoria,
            Movimiento,
            Pedido,
            LineaPedido,
            Alerta,
            Usuario,
            RegistroAuditoria,
            Operacion,
            health::HealthData,
            auth_dto::LoginRequest,
            auth_dto::RegisterRequest,
            auth_dto::AuthResponse,
            productos_dto::CreateProductoRequest,
            productos_dto::UpdateProductoRequest,
            productos_dto::ProductoCreado,
            productos_dto::ResultadoImportacion,
            proveedores_dto::CreateProveedorRequest,
            proveedores_dto::UpdateProveedorRequest,
            proveedores_dto::ProveedorCreado,
            proveedores_dto::ProveedorEliminado,
            movimientos_dto::CreateMovimientoRequest,
            movimientos_dto::MovimientoCreado,
            pedidos_dto::LineaPedidoRequest,
            pedidos_dto::CreatePedidoRequest,
            pedidos_dto::UpdateEstadoRequest,
            pedidos_dto::PedidoCreado,
            alertas_dto::UpdateAlertaRequest,
            usuarios_dto::CreateUsuarioRequest,
            usuarios_dto::UpdateUsuarioRequest,
            usuarios_dto::UsuarioCreado,
            dashboard::Estadisticas,
            dashboard::ProductoStockBajo,
            dashboard::DashboardData,
            reportes::RotacionProducto,
            reportes::ResumenMensual,
            reportes::Reportes
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Auth", description = "Login y registro"),
        (name = "Productos", description = "Catálogo de productos"),
        (name = "Proveedores", description = "Proveedores"),
        (name = "Categorias", description = "Categorías de productos"),
        (name = "Movimientos", description = "Movimientos de inventario"),
        (name = "Pedidos", description = "Pedidos de compra"),
        (name = "Alertas", description = "Alertas de stock y sistema"),
        (name = "Usuarios", description = "Administración de usuarios"),
        (name = "Auditoria", description = "Bitácora de cambios"),
        (name = "Dashboard", description = "Agregados para la pantalla principal"),
        (name = "Reportes", description = "Reportes de rotación y mensuales"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
