use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};

use crate::{
    audit::registrar_auditoria,
    dto::movimientos::{CreateMovimientoRequest, MovimientoCreado},
    entity::{
        alertas::ActiveModel as AlertaActive,
        movimientos::{ActiveModel as MovimientoActive, Column as MovCol, Entity as Movimientos},
        productos::{Column as ProdCol, Entity as Productos},
        usuarios::{Column as UserCol, Entity as Usuarios},
    },
    error::{AppError, AppResult},
    state::AppState,
};

/// Referencia secuencial por tipo: `ENTR-0001` para entradas, `SAL-0001`
/// para salidas.
pub fn referencia_movimiento(tipo: &str, numero: u64) -> String {
    if tipo == "entry" {
        format!("ENTR-{numero:04}")
    } else {
        format!("SAL-{numero:04}")
    }
}

/// Registra un movimiento de stock. Los movimientos son inmutables: esta es
/// la única operación de escritura sobre la tabla.
///
/// Una salida nunca puede dejar el stock en negativo; el faltante se reporta
/// con las cantidades actual y solicitada. El alta del movimiento, el delta
/// de stock y la alerta de stock bajo van en una sola transacción; la
/// auditoría se escribe después del commit y sus fallos solo se loguean.
pub async fn registrar_movimiento(
    state: &AppState,
    payload: CreateMovimientoRequest,
) -> AppResult<MovimientoCreado> {
    let tipo = payload.tipo.trim();
    if tipo != "entry" && tipo != "exit" {
        return Err(AppError::BadRequest("Tipo de movimiento inválido".into()));
    }

    let producto_id = payload
        .producto_id
        .ok_or_else(|| AppError::BadRequest("Producto requerido".into()))?;

    if payload.cantidad <= 0 {
        return Err(AppError::BadRequest(
            "La cantidad debe ser mayor a 0".into(),
        ));
    }

    let responsable_id = payload
        .responsable_id
        .ok_or_else(|| AppError::BadRequest("Responsable requerido".into()))?;

    let txn = state.orm.begin().await?;

    let producto = Productos::find()
        .filter(
            Condition::all()
                .add(ProdCol::Id.eq(producto_id))
                .add(ProdCol::Activo.eq(true)),
        )
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Producto no encontrado o inactivo".into()))?;

    let responsable = Usuarios::find()
        .filter(
            Condition::all()
                .add(UserCol::Id.eq(responsable_id))
                .add(UserCol::Activo.eq(true)),
        )
        .one(&txn)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Usuario responsable no encontrado o inactivo".into())
        })?;

    if tipo == "exit" && producto.stock < payload.cantidad {
        return Err(AppError::Conflict(format!(
            "Stock insuficiente. Stock actual: {}, solicitado: {}",
            producto.stock, payload.cantidad
        )));
    }

    let referencia = if payload.referencia.trim().is_empty() {
        let previos = Movimientos::find()
            .filter(MovCol::Tipo.eq(tipo))
            .count(&txn)
            .await?;
        referencia_movimiento(tipo, previos + 1)
    } else {
        payload.referencia.trim().to_string()
    };

    let movimiento = MovimientoActive {
        tipo: Set(tipo.to_string()),
        producto_id: Set(Some(producto_id)),
        cantidad: Set(payload.cantidad),
        responsable_id: Set(Some(responsable_id)),
        referencia: Set(referencia.clone()),
        notas: Set(payload.notas.trim().to_string()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let delta = if tipo == "entry" {
        Expr::col(ProdCol::Stock).add(payload.cantidad)
    } else {
        Expr::col(ProdCol::Stock).sub(payload.cantidad)
    };
    Productos::update_many()
        .col_expr(ProdCol::Stock, delta)
        .filter(ProdCol::Id.eq(producto_id))
        .exec(&txn)
        .await?;

    let actualizado = Productos::find_by_id(producto_id).one(&txn).await?;
    if let Some(p) = actualizado {
        if p.stock < p.stock_minimo {
            AlertaActive {
                tipo: Set("low_stock".into()),
                titulo: Set(format!("Stock Bajo - {}", p.nombre)),
                mensaje: Set(format!(
                    "El producto está por debajo del umbral mínimo ({}/{})",
                    p.stock, p.stock_minimo
                )),
                producto_id: Set(Some(p.id)),
                severidad: Set("high".into()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;

    let tipo_texto = if tipo == "entry" { "Entrada" } else { "Salida" };
    let cambios = format!(
        "{tipo_texto} de inventario - {} unidades - Ref: {referencia}",
        payload.cantidad
    );
    if let Err(err) = registrar_auditoria(
        &state.pool,
        Some(responsable_id),
        &responsable.nombre,
        "Registro de movimiento",
        "Movimiento",
        &movimiento.id.to_string(),
        &cambios,
    )
    .await
    {
        tracing::warn!(error = %err, "fallo al registrar auditoría");
    }

    Ok(MovimientoCreado {
        success: true,
        id: movimiento.id,
        referencia,
        message: "Movimiento registrado exitosamente".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::referencia_movimiento;

    #[test]
    fn referencias_por_tipo() {
        assert_eq!(referencia_movimiento("entry", 1), "ENTR-0001");
        assert_eq!(referencia_movimiento("exit", 1), "SAL-0001");
        assert_eq!(referencia_movimiento("entry", 42), "ENTR-0042");
        assert_eq!(referencia_movimiento("exit", 12345), "SAL-12345");
    }
}
