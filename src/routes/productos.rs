use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

use crate::{
    audit::registrar_auditoria,
    db::DbPool,
    dto::productos::{
        CreateProductoRequest, ProductoCreado, ProductoQuery, ResultadoImportacion,
        UpdateProductoRequest,
    },
    error::{AppError, AppResult},
    models::Producto,
    response::Operacion,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(productos_get)
                .post(crear_producto)
                .put(actualizar_producto)
                .delete(eliminar_producto),
        )
        .route("/importar", post(importar_productos))
}

const SELECT_PRODUCTO: &str = r#"
    SELECT p.*, c.nombre as categoria_nombre, pr.nombre as proveedor_nombre
    FROM productos p
    LEFT JOIN categorias c ON p.categoria_id = c.id
    LEFT JOIN proveedores pr ON p.proveedor_id = pr.id
"#;

#[utoipa::path(get, path = "/api/productos", tag = "Productos")]
pub async fn productos_get(
    State(state): State<AppState>,
    Query(query): Query<ProductoQuery>,
) -> AppResult<Response> {
    if let Some(id) = query.id {
        let producto: Producto =
            sqlx::query_as(&format!("{SELECT_PRODUCTO} WHERE p.id = $1"))
                .bind(id)
                .fetch_optional(&state.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Producto no encontrado".into()))?;
        return Ok(Json(producto).into_response());
    }

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_PRODUCTO);
    qb.push(" WHERE p.activo = true");

    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let term = format!("%{search}%");
        qb.push(" AND (p.nombre ILIKE ")
            .push_bind(term.clone())
            .push(" OR p.sku ILIKE ")
            .push_bind(term)
            .push(")");
    }

    if let Some(categoria) = query
        .categoria
        .as_deref()
        .filter(|c| !c.is_empty() && *c != "all")
    {
        qb.push(" AND c.nombre = ").push_bind(categoria.to_string());
    }

    qb.push(" ORDER BY p.fecha_actualizacion DESC");

    let productos: Vec<Producto> = qb.build_query_as().fetch_all(&state.pool).await?;
    Ok(Json(productos).into_response())
}

#[utoipa::path(post, path = "/api/productos", request_body = CreateProductoRequest, tag = "Productos")]
pub async fn crear_producto(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductoRequest>,
) -> AppResult<(StatusCode, Json<ProductoCreado>)> {
    if payload.nombre.is_empty() {
        return Err(AppError::BadRequest("El nombre es requerido".into()));
    }
    if payload.stock < 0 || payload.stock_minimo < 0 {
        return Err(AppError::BadRequest("El stock no puede ser negativo".into()));
    }
    if payload.precio < 0.0 {
        return Err(AppError::BadRequest("El precio no puede ser negativo".into()));
    }

    let sku = if payload.sku.is_empty() {
        generar_sku(&state.pool).await?
    } else {
        let existente: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM productos WHERE sku = $1")
                .bind(&payload.sku)
                .fetch_optional(&state.pool)
                .await?;
        if existente.is_some() {
            return Err(AppError::Conflict("El SKU ya existe".into()));
        }
        payload.sku.clone()
    };

    let categoria_id =
        resolver_categoria(&state.pool, payload.categoria_id, payload.categoria.as_deref())
            .await?;
    let proveedor_id =
        resolver_proveedor(&state.pool, payload.proveedor_id, payload.proveedor.as_deref())
            .await?;

    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO productos (sku, nombre, descripcion, categoria_id, proveedor_id, stock, stock_minimo, precio)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id
        "#,
    )
    .bind(&sku)
    .bind(&payload.nombre)
    .bind(&payload.descripcion)
    .bind(categoria_id)
    .bind(proveedor_id)
    .bind(payload.stock)
    .bind(payload.stock_minimo)
    .bind(payload.precio)
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = registrar_auditoria(
        &state.pool,
        None,
        "Sistema",
        "Creación de producto",
        "productos",
        &id.to_string(),
        &format!("Producto '{}' creado con SKU {}", payload.nombre, sku),
    )
    .await
    {
        tracing::warn!(error = %err, "fallo al registrar auditoria");
    }

    Ok((
        StatusCode::CREATED,
        Json(ProductoCreado {
            success: true,
            id,
            message: "Producto creado correctamente".into(),
        }),
    ))
}

/// Actualización completa. Si lo único que cambió respecto de la fila actual
/// es `activo`, la auditoría lo registra como cambio de estado en lugar de
/// actualización general.
#[utoipa::path(put, path = "/api/productos", request_body = UpdateProductoRequest, tag = "Productos")]
pub async fn actualizar_producto(
    State(state): State<AppState>,
    Query(query): Query<ProductoQuery>,
    Json(payload): Json<UpdateProductoRequest>,
) -> AppResult<Json<Operacion>> {
    let id = payload
        .id
        .or(query.id)
        .ok_or_else(|| AppError::BadRequest("ID de producto requerido".into()))?;

    let actual: Producto = sqlx::query_as(&format!("{SELECT_PRODUCTO} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Producto no encontrado".into()))?;

    if payload.nombre.is_empty() {
        return Err(AppError::BadRequest("El nombre es requerido".into()));
    }

    if payload.sku != actual.sku {
        let duplicado: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM productos WHERE sku = $1 AND id != $2")
                .bind(&payload.sku)
                .bind(id)
                .fetch_optional(&state.pool)
                .await?;
        if duplicado.is_some() {
            return Err(AppError::Conflict("El SKU ya existe".into()));
        }
    }

    let categoria_id =
        resolver_categoria(&state.pool, payload.categoria_id, payload.categoria.as_deref())
            .await?;
    let proveedor_id =
        resolver_proveedor(&state.pool, payload.proveedor_id, payload.proveedor.as_deref())
            .await?;
    let activo = payload.activo.unwrap_or(actual.activo);

    sqlx::query(
        r#"
        UPDATE productos
        SET sku = $1, nombre = $2, descripcion = $3, categoria_id = $4, proveedor_id = $5,
            stock = $6, stock_minimo = $7, precio = $8, activo = $9, fecha_actualizacion = NOW()
        WHERE id = $10
        "#,
    )
    .bind(&payload.sku)
    .bind(&payload.nombre)
    .bind(&payload.descripcion)
    .bind(categoria_id)
    .bind(proveedor_id)
    .bind(payload.stock)
    .bind(payload.stock_minimo)
    .bind(payload.precio)
    .bind(activo)
    .bind(id)
    .execute(&state.pool)
    .await?;

    let solo_cambio_estado = activo != actual.activo
        && payload.sku == actual.sku
        && payload.nombre == actual.nombre
        && payload.descripcion == actual.descripcion
        && payload.stock == actual.stock
        && payload.stock_minimo == actual.stock_minimo
        && payload.precio == actual.precio;

    let (accion, cambios) = if solo_cambio_estado {
        (
            "Cambio de estado de producto",
            format!(
                "Producto '{}' {}",
                actual.nombre,
                if activo { "activado" } else { "desactivado" }
            ),
        )
    } else {
        (
            "Actualización de producto",
            format!("Producto '{}' actualizado", payload.nombre),
        )
    };

    if let Err(err) = registrar_auditoria(
        &state.pool,
        None,
        "Sistema",
        accion,
        "productos",
        &id.to_string(),
        &cambios,
    )
    .await
    {
        tracing::warn!(error = %err, "fallo al registrar auditoria");
    }

    Ok(Json(Operacion::ok("Producto actualizado correctamente")))
}

/// Borrado físico. `pedido_productos` no tiene ON DELETE, así que las líneas
/// históricas se eliminan a mano dentro de la misma transacción.
#[utoipa::path(delete, path = "/api/productos", tag = "Productos")]
pub async fn eliminar_producto(
    State(state): State<AppState>,
    Query(query): Query<ProductoQuery>,
) -> AppResult<Json<Operacion>> {
    let id = query
        .id
        .ok_or_else(|| AppError::BadRequest("ID de producto requerido".into()))?;

    let producto: Option<(String,)> =
        sqlx::query_as("SELECT nombre FROM productos WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.pool)
            .await?;
    let nombre = producto
        .map(|(n,)| n)
        .ok_or_else(|| AppError::NotFound("Producto no encontrado".into()))?;

    let mut txn = state.pool.begin().await?;

    sqlx::query("DELETE FROM pedido_productos WHERE producto_id = $1")
        .bind(id)
        .execute(&mut *txn)
        .await?;

    sqlx::query("DELETE FROM productos WHERE id = $1")
        .bind(id)
        .execute(&mut *txn)
        .await?;

    txn.commit().await?;

    if let Err(err) = registrar_auditoria(
        &state.pool,
        None,
        "Sistema",
        "Eliminación de producto",
        "productos",
        &id.to_string(),
        &format!("Producto '{nombre}' eliminado"),
    )
    .await
    {
        tracing::warn!(error = %err, "fallo al registrar auditoria");
    }

    Ok(Json(Operacion::ok("Producto eliminado correctamente")))
}

/// Las columnas numéricas llegan como texto: las planillas exportadas suelen
/// traer celdas vacías, que cuentan como 0 en lugar de invalidar la fila.
#[derive(Debug, Deserialize)]
struct FilaImportacion {
    #[serde(default)]
    sku: String,
    #[serde(default)]
    nombre: String,
    #[serde(default)]
    descripcion: String,
    #[serde(default)]
    categoria: String,
    #[serde(default)]
    stock: String,
    #[serde(default)]
    stock_minimo: String,
    #[serde(default)]
    precio: String,
    #[serde(default)]
    proveedor: String,
}

fn celda_entera(valor: &str) -> AppResult<i32> {
    let valor = valor.trim();
    if valor.is_empty() {
        return Ok(0);
    }
    valor
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Valor numérico inválido: '{valor}'")))
}

fn celda_decimal(valor: &str) -> AppResult<f64> {
    let valor = valor.trim();
    if valor.is_empty() {
        return Ok(0.0);
    }
    valor
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Valor numérico inválido: '{valor}'")))
}

/// Importación masiva desde un CSV con encabezado
/// `sku,nombre,descripcion,categoria,stock,stock_minimo,precio,proveedor`.
/// Cada fila se procesa de forma independiente; los errores se acumulan sin
/// abortar el resto del archivo.
#[utoipa::path(post, path = "/api/productos/importar", tag = "Productos")]
pub async fn importar_productos(
    State(state): State<AppState>,
    body: String,
) -> AppResult<Json<ResultadoImportacion>> {
    if body.trim().is_empty() {
        return Err(AppError::BadRequest("Archivo CSV vacío".into()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut importados = 0usize;
    let mut errores = Vec::new();

    for (idx, record) in reader.deserialize::<FilaImportacion>().enumerate() {
        let numero_fila = idx + 2; // la fila 1 es el encabezado
        let fila = match record {
            Ok(fila) => fila,
            Err(err) => {
                errores.push(format!("Fila {numero_fila}: {err}"));
                continue;
            }
        };

        match importar_fila(&state.pool, fila).await {
            Ok(()) => importados += 1,
            Err(err) => errores.push(format!("Fila {numero_fila}: {err}")),
        }
    }

    if let Err(err) = registrar_auditoria(
        &state.pool,
        None,
        "Sistema",
        "Importación de productos",
        "productos",
        "-",
        &format!("{} productos importados, {} errores", importados, errores.len()),
    )
    .await
    {
        tracing::warn!(error = %err, "fallo al registrar auditoria");
    }

    let message = format!("{importados} productos importados");
    Ok(Json(ResultadoImportacion {
        success: true,
        importados,
        errores,
        message,
    }))
}

async fn importar_fila(pool: &DbPool, fila: FilaImportacion) -> AppResult<()> {
    if fila.nombre.is_empty() {
        return Err(AppError::BadRequest("El nombre es requerido".into()));
    }

    let stock = celda_entera(&fila.stock)?;
    let stock_minimo = celda_entera(&fila.stock_minimo)?;
    let precio = celda_decimal(&fila.precio)?;
    if stock < 0 || stock_minimo < 0 || precio < 0.0 {
        return Err(AppError::BadRequest("Valores numéricos inválidos".into()));
    }

    let sku = if fila.sku.is_empty() {
        generar_sku(pool).await?
    } else {
        let existente: Option<(i32,)> = sqlx::query_as("SELECT id FROM productos WHERE sku = $1")
            .bind(&fila.sku)
            .fetch_optional(pool)
            .await?;
        if existente.is_some() {
            return Err(AppError::Conflict(format!("El SKU {} ya existe", fila.sku)));
        }
        fila.sku.clone()
    };

    let categoria = (!fila.categoria.is_empty()).then_some(fila.categoria.as_str());
    let proveedor = (!fila.proveedor.is_empty()).then_some(fila.proveedor.as_str());
    let categoria_id = resolver_categoria(pool, None, categoria).await?;
    let proveedor_id = resolver_proveedor(pool, None, proveedor).await?;

    sqlx::query(
        r#"
        INSERT INTO productos (sku, nombre, descripcion, categoria_id, proveedor_id, stock, stock_minimo, precio)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(&sku)
    .bind(&fila.nombre)
    .bind(&fila.descripcion)
    .bind(categoria_id)
    .bind(proveedor_id)
    .bind(stock)
    .bind(stock_minimo)
    .bind(precio)
    .execute(pool)
    .await?;

    Ok(())
}

/// `PROD-####` = filas existentes + 1, con reintento ante colisión con SKUs
/// ya ocupados (p. ej. tras borrados físicos).
async fn generar_sku(pool: &DbPool) -> AppResult<String> {
    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM productos")
        .fetch_one(pool)
        .await?;

    let mut siguiente = total + 1;
    for _ in 0..100 {
        let candidato = format!("PROD-{siguiente:04}");
        let ocupado: Option<(i32,)> = sqlx::query_as("SELECT id FROM productos WHERE sku = $1")
            .bind(&candidato)
            .fetch_optional(pool)
            .await?;
        if ocupado.is_none() {
            return Ok(candidato);
        }
        siguiente += 1;
    }

    Err(AppError::Internal(anyhow::anyhow!(
        "no se pudo generar un SKU libre tras 100 intentos"
    )))
}

/// Resuelve la categoría por id o por nombre; un nombre inexistente la crea.
async fn resolver_categoria(
    pool: &DbPool,
    id: Option<i32>,
    nombre: Option<&str>,
) -> AppResult<Option<i32>> {
    if let Some(id) = id {
        return Ok(Some(id));
    }
    let Some(nombre) = nombre.filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    let existente: Option<(i32,)> = sqlx::query_as("SELECT id FROM categorias WHERE nombre = $1")
        .bind(nombre)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existente {
        return Ok(Some(id));
    }

    let (id,): (i32,) =
        sqlx::query_as("INSERT INTO categorias (nombre) VALUES ($1) RETURNING id")
            .bind(nombre)
            .fetch_one(pool)
            .await?;
    Ok(Some(id))
}

/// Resuelve el proveedor por id o por nombre; a diferencia de las categorías,
/// un proveedor desconocido no se crea.
async fn resolver_proveedor(
    pool: &DbPool,
    id: Option<i32>,
    nombre: Option<&str>,
) -> AppResult<Option<i32>> {
    if let Some(id) = id {
        return Ok(Some(id));
    }
    let Some(nombre) = nombre.filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    let existente: Option<(i32,)> =
        sqlx::query_as("SELECT id FROM proveedores WHERE nombre = $1 AND activo = true")
            .bind(nombre)
            .fetch_optional(pool)
            .await?;

    match existente {
        Some((id,)) => Ok(Some(id)),
        None => Err(AppError::NotFound(format!(
            "Proveedor '{nombre}' no encontrado"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{celda_decimal, celda_entera};

    #[test]
    fn celdas_vacias_cuentan_como_cero() {
        assert_eq!(celda_entera("").unwrap(), 0);
        assert_eq!(celda_entera("  ").unwrap(), 0);
        assert_eq!(celda_decimal("").unwrap(), 0.0);
    }

    #[test]
    fn celdas_numericas_se_parsean() {
        assert_eq!(celda_entera("15").unwrap(), 15);
        assert_eq!(celda_entera(" 3 ").unwrap(), 3);
        assert_eq!(celda_decimal("12.50").unwrap(), 12.5);
    }

    #[test]
    fn celdas_no_numericas_se_rechazan() {
        assert!(celda_entera("abc").is_err());
        assert!(celda_decimal("1,5").is_err());
    }
}
