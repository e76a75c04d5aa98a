use crate::db::{DbPool, OrmConn};

/// Estado compartido de la aplicación. Conviven dos conexiones a la misma
/// base: el pool sqlx para lecturas planas, agregados y la bitácora, y la
/// conexión SeaORM para los servicios transaccionales (pedidos y
/// movimientos).
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
}
