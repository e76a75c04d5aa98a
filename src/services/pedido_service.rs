use anyhow::anyhow;
use chrono::Utc;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};

use crate::{
    audit::{nombre_de_usuario, registrar_auditoria},
    dto::pedidos::{CreatePedidoRequest, PedidoCreado, UpdateEstadoRequest},
    entity::{
        alertas::ActiveModel as AlertaActive,
        movimientos::{ActiveModel as MovimientoActive, Column as MovCol, Entity as Movimientos},
        pedido_productos::{ActiveModel as LineaActive, Column as LineaCol, Entity as PedidoProductos},
        pedidos::{ActiveModel as PedidoActive, Column as PedidoCol, Entity as Pedidos},
        productos::{Column as ProdCol, Entity as Productos},
    },
    error::{AppError, AppResult},
    response::Operacion,
    services::movimiento_service::referencia_movimiento,
    state::AppState,
    status::{ESTADOS_PERMITIDOS, ESTADOS_VALIDOS_BD, es_entregado, estado_from_db, estado_to_db},
};

/// Crea un pedido con sus líneas en una sola transacción. El número de
/// pedido `PO-YYYY-####` se genera contando filas existentes y reintentando
/// ante colisión.
pub async fn crear_pedido(
    state: &AppState,
    payload: CreatePedidoRequest,
) -> AppResult<PedidoCreado> {
    let proveedor_id = payload
        .proveedor_id
        .ok_or_else(|| AppError::BadRequest("Proveedor requerido".into()))?;

    if payload.productos.is_empty() {
        return Err(AppError::BadRequest(
            "Debe incluir al menos un producto en el pedido".into(),
        ));
    }

    for (i, linea) in payload.productos.iter().enumerate() {
        if linea.cantidad <= 0 {
            return Err(AppError::BadRequest(format!(
                "Producto #{}: Cantidad debe ser mayor a 0",
                i + 1
            )));
        }
        if linea.precio_unitario < 0.0 {
            return Err(AppError::BadRequest(format!(
                "Producto #{}: Precio unitario requerido",
                i + 1
            )));
        }
    }

    let numero_pedido = generar_numero_pedido(&state.orm).await?;

    let txn = state.orm.begin().await?;

    let pedido = PedidoActive {
        numero_pedido: Set(numero_pedido.clone()),
        proveedor_id: Set(Some(proveedor_id)),
        estado: Set(estado_to_db("pendiente")),
        fecha_entrega_estimada: Set(payload.fecha_entrega_estimada),
        notas: Set(payload.notas.clone()),
        creado_por: Set(payload.creado_por),
        monto_total: Set(payload.monto_total),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut detalle_lineas = Vec::with_capacity(payload.productos.len());
    for linea in &payload.productos {
        let subtotal = f64::from(linea.cantidad) * linea.precio_unitario;
        LineaActive {
            pedido_id: Set(pedido.id),
            producto_id: Set(linea.producto_id),
            cantidad: Set(linea.cantidad),
            precio_unitario: Set(linea.precio_unitario),
            subtotal: Set(subtotal),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        detalle_lineas.push(format!(
            "Producto ID {}: {} unidades x ${:.2} = ${:.2}",
            linea.producto_id, linea.cantidad, linea.precio_unitario, subtotal
        ));
    }

    txn.commit().await?;

    let nombre = match payload.creado_por {
        Some(id) => nombre_de_usuario(&state.pool, id).await,
        None => "Sistema".to_string(),
    };
    let cambios = format!(
        "Pedido creado: {} - Total: ${:.2}\nProductos:\n{}",
        numero_pedido,
        payload.monto_total,
        detalle_lineas.join("\n")
    );
    if let Err(err) = registrar_auditoria(
        &state.pool,
        payload.creado_por,
        &nombre,
        "Creación de pedido",
        "Pedido",
        &pedido.id.to_string(),
        &cambios,
    )
    .await
    {
        tracing::warn!(error = %err, "fallo al registrar auditoría");
    }

    Ok(PedidoCreado {
        success: true,
        id: pedido.id,
        numero_pedido,
        message: "Pedido creado exitosamente".to_string(),
    })
}

/// Transición de estado de un pedido (el núcleo del flujo).
///
/// Contrato:
/// 1. el pedido debe existir;
/// 2. `entregado` es terminal: cualquier intento sobre un pedido entregado
///    falla sin efectos;
/// 3. re-aplicar el estado actual es un no-op que responde éxito;
/// 4. al pasar a `entregado`, por cada línea se incrementa el stock, se
///    inserta un movimiento `entry` con referencia secuencial y se genera
///    alerta de stock bajo si corresponde, todo dentro de la misma
///    transacción que el UPDATE del estado;
/// 5. cero filas afectadas solo se tolera si una relectura muestra que el
///    estado objetivo ya quedó guardado;
/// 6. la auditoría se escribe después del commit y sus fallos se tragan.
pub async fn actualizar_estado(
    state: &AppState,
    pedido_id: i32,
    payload: &UpdateEstadoRequest,
) -> AppResult<Operacion> {
    let nuevo_estado = payload
        .nuevo_estado
        .as_deref()
        .or(payload.estado.as_deref())
        .unwrap_or("");

    if !ESTADOS_PERMITIDOS.contains(&nuevo_estado) {
        return Err(AppError::BadRequest(format!(
            "Estado inválido. Estados permitidos: {}. Estado recibido: {}",
            ESTADOS_PERMITIDOS.join(", "),
            if nuevo_estado.is_empty() { "null" } else { nuevo_estado },
        )));
    }

    let nuevo_estado_bd = estado_to_db(nuevo_estado);
    if !ESTADOS_VALIDOS_BD.contains(&nuevo_estado_bd.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Estado inválido para la base de datos. Estado recibido: \"{nuevo_estado}\", mapeado: \"{nuevo_estado_bd}\""
        )));
    }

    let usuario_id = payload.usuario_id;

    let txn = state.orm.begin().await?;

    let pedido = Pedidos::find_by_id(pedido_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Pedido no encontrado".into()))?;

    // Filas legadas pueden traer estado vacío; se tratan como pendiente.
    let mut estado_actual_bd = pedido.estado.trim().to_string();
    if estado_actual_bd.is_empty() {
        tracing::warn!(pedido_id, "estado vacío, se asume 'pendiente'");
        Pedidos::update_many()
            .col_expr(PedidoCol::Estado, Expr::value("pendiente"))
            .filter(PedidoCol::Id.eq(pedido_id))
            .exec(&txn)
            .await?;
        estado_actual_bd = "pendiente".to_string();
    }

    if es_entregado(&estado_actual_bd) {
        return Err(AppError::Conflict(
            "No se puede modificar el estado de un pedido que ya fue entregado".into(),
        ));
    }

    if estado_actual_bd == nuevo_estado_bd {
        txn.commit().await?;
        return Ok(Operacion::ok("El pedido ya tiene ese estado"));
    }

    let entrega = nuevo_estado_bd == "entregado";
    if entrega {
        aplicar_entrega(&txn, pedido_id, &pedido.numero_pedido, usuario_id).await?;
    }

    let resultado = Pedidos::update_many()
        .col_expr(PedidoCol::Estado, Expr::value(nuevo_estado_bd.clone()))
        .filter(PedidoCol::Id.eq(pedido_id))
        .exec(&txn)
        .await?;

    if resultado.rows_affected == 0 {
        // Carrera benigna: otra transacción pudo dejar ya el estado objetivo.
        let actual = Pedidos::find_by_id(pedido_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("El pedido no existe en la base de datos".into())
            })?;
        if actual.estado == nuevo_estado_bd
            || estado_from_db(&actual.estado) == estado_from_db(&nuevo_estado_bd)
        {
            txn.commit().await?;
            return Ok(Operacion::ok("El pedido ya tiene ese estado"));
        }
        return Err(AppError::Internal(anyhow!(
            "No se pudo actualizar el estado. Estado actual en BD: \"{}\", intentado: \"{}\"",
            actual.estado,
            nuevo_estado_bd
        )));
    }

    if entrega {
        AlertaActive {
            tipo: Set("system".into()),
            titulo: Set("Pedido Entregado".into()),
            mensaje: Set(
                "El pedido ha sido marcado como entregado. El inventario ha sido actualizado."
                    .into(),
            ),
            producto_id: Set(None),
            severidad: Set("medium".into()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    let nombre = match usuario_id {
        Some(id) => nombre_de_usuario(&state.pool, id).await,
        None => "Sistema".to_string(),
    };
    let mut cambios = format!(
        "Estado cambiado de '{}' a '{}'",
        estado_from_db(&estado_actual_bd),
        estado_from_db(&nuevo_estado_bd)
    );
    if entrega {
        cambios.push_str(" - Stock actualizado automáticamente");
    }
    if let Err(err) = registrar_auditoria(
        &state.pool,
        usuario_id,
        &nombre,
        "Actualización de estado de pedido",
        "Pedido",
        &pedido_id.to_string(),
        &cambios,
    )
    .await
    {
        tracing::warn!(error = %err, "fallo al registrar auditoría");
    }

    Ok(Operacion::ok("Estado del pedido actualizado exitosamente"))
}

/// Efectos de entrega por línea de pedido: stock, movimiento de entrada y
/// alerta de stock bajo. Corre dentro de la transacción del llamador.
async fn aplicar_entrega(
    txn: &sea_orm::DatabaseTransaction,
    pedido_id: i32,
    numero_pedido: &str,
    usuario_id: Option<i32>,
) -> AppResult<()> {
    let lineas = PedidoProductos::find()
        .filter(LineaCol::PedidoId.eq(pedido_id))
        .all(txn)
        .await?;

    for linea in &lineas {
        Productos::update_many()
            .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).add(linea.cantidad))
            .filter(ProdCol::Id.eq(linea.producto_id))
            .exec(txn)
            .await?;

        let previos = Movimientos::find()
            .filter(MovCol::Tipo.eq("entry"))
            .count(txn)
            .await?;
        let referencia = referencia_movimiento("entry", previos + 1);

        MovimientoActive {
            tipo: Set("entry".into()),
            producto_id: Set(Some(linea.producto_id)),
            cantidad: Set(linea.cantidad),
            responsable_id: Set(usuario_id),
            referencia: Set(referencia),
            notas: Set(format!("Entrada por pedido entregado: {numero_pedido}")),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        let producto = Productos::find_by_id(linea.producto_id).one(txn).await?;
        if let Some(p) = producto {
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
                .insert(txn)
                .await?;
            }
        }
    }

    Ok(())
}

async fn generar_numero_pedido<C: ConnectionTrait>(conn: &C) -> AppResult<String> {
    let ano = Utc::now().format("%Y");
    let total = Pedidos::find().count(conn).await?;
    let mut siguiente = total + 1;

    for _ in 0..100 {
        let numero = format!("PO-{ano}-{siguiente:04}");
        let existe = Pedidos::find()
            .filter(PedidoCol::NumeroPedido.eq(numero.clone()))
            .count(conn)
            .await?;
        if existe == 0 {
            return Ok(numero);
        }
        siguiente += 1;
    }

    Err(AppError::Internal(anyhow!(
        "No se pudo generar un número de pedido único"
    )))
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;

    #[test]
    fn formato_de_numero_de_pedido() {
        let ano = chrono::Utc::now().year();
        let numero = format!("PO-{ano}-{:04}", 7);
        assert_eq!(numero, format!("PO-{ano}-0007"));
    }
}
