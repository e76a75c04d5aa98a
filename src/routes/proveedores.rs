use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use sqlx::{Postgres, QueryBuilder};

use crate::{
    audit::registrar_auditoria,
    dto::proveedores::{
        CreateProveedorRequest, ProveedorCreado, ProveedorEliminado, ProveedorQuery,
        UpdateProveedorRequest,
    },
    error::{AppError, AppResult},
    models::Proveedor,
    response::Operacion,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(proveedores_get)
            .post(crear_proveedor)
            .put(actualizar_proveedor)
            .delete(eliminar_proveedor),
    )
}

#[utoipa::path(get, path = "/api/proveedores", tag = "Proveedores")]
pub async fn proveedores_get(
    State(state): State<AppState>,
    Query(query): Query<ProveedorQuery>,
) -> AppResult<Response> {
    if let Some(id) = query.id {
        let proveedor: Proveedor =
            sqlx::query_as("SELECT * FROM proveedores WHERE id = $1 AND activo = true")
                .bind(id)
                .fetch_optional(&state.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Proveedor no encontrado".into()))?;
        return Ok(Json(proveedor).into_response());
    }

    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM proveedores WHERE activo = true");

    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let term = format!("%{search}%");
        qb.push(" AND (nombre ILIKE ")
            .push_bind(term.clone())
            .push(" OR contacto ILIKE ")
            .push_bind(term)
            .push(")");
    }

    qb.push(" ORDER BY nombre");

    let proveedores: Vec<Proveedor> = qb.build_query_as().fetch_all(&state.pool).await?;
    Ok(Json(proveedores).into_response())
}

#[utoipa::path(post, path = "/api/proveedores", request_body = CreateProveedorRequest, tag = "Proveedores")]
pub async fn crear_proveedor(
    State(state): State<AppState>,
    Json(payload): Json<CreateProveedorRequest>,
) -> AppResult<(StatusCode, Json<ProveedorCreado>)> {
    if payload.nombre.is_empty() {
        return Err(AppError::BadRequest("El nombre es requerido".into()));
    }
    if payload.contacto.is_empty() {
        return Err(AppError::BadRequest("El contacto es requerido".into()));
    }
    if payload.email.is_empty() {
        return Err(AppError::BadRequest("El email es requerido".into()));
    }
    if payload.telefono.is_empty() {
        return Err(AppError::BadRequest("El teléfono es requerido".into()));
    }

    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO proveedores (nombre, contacto, email, telefono, direccion)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(&payload.nombre)
    .bind(&payload.contacto)
    .bind(&payload.email)
    .bind(&payload.telefono)
    .bind(&payload.direccion)
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = registrar_auditoria(
        &state.pool,
        None,
        "Sistema",
        "Creación de proveedor",
        "proveedores",
        &id.to_string(),
        &format!("Proveedor '{}' creado", payload.nombre),
    )
    .await
    {
        tracing::warn!(error = %err, "fallo al registrar auditoria");
    }

    Ok((
        StatusCode::CREATED,
        Json(ProveedorCreado {
            success: true,
            id,
            message: "Proveedor creado correctamente".into(),
        }),
    ))
}

#[utoipa::path(put, path = "/api/proveedores", request_body = UpdateProveedorRequest, tag = "Proveedores")]
pub async fn actualizar_proveedor(
    State(state): State<AppState>,
    Query(query): Query<ProveedorQuery>,
    Json(payload): Json<UpdateProveedorRequest>,
) -> AppResult<Json<Operacion>> {
    let id = payload
        .id
        .or(query.id)
        .ok_or_else(|| AppError::BadRequest("ID de proveedor requerido".into()))?;

    if payload.nombre.is_empty() {
        return Err(AppError::BadRequest("El nombre es requerido".into()));
    }

    let result = sqlx::query(
        r#"
        UPDATE proveedores
        SET nombre = $1, contacto = $2, email = $3, telefono = $4, direccion = $5
        WHERE id = $6 AND activo = true
        "#,
    )
    .bind(&payload.nombre)
    .bind(&payload.contacto)
    .bind(&payload.email)
    .bind(&payload.telefono)
    .bind(&payload.direccion)
    .bind(id)
    .execute(&state.pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Proveedor no encontrado".into()));
    }

    if let Err(err) = registrar_auditoria(
        &state.pool,
        None,
        "Sistema",
        "Actualización de proveedor",
        "proveedores",
        &id.to_string(),
        &format!("Proveedor '{}' actualizado", payload.nombre),
    )
    .await
    {
        tracing::warn!(error = %err, "fallo al registrar auditoria");
    }

    Ok(Json(Operacion::ok("Proveedor actualizado correctamente")))
}

/// Borrado físico. Los productos vinculados quedan con `proveedor_id` NULL
/// (FK ON DELETE SET NULL); la respuesta informa cuántos quedaron afectados.
#[utoipa::path(delete, path = "/api/proveedores", tag = "Proveedores")]
pub async fn eliminar_proveedor(
    State(state): State<AppState>,
    Query(query): Query<ProveedorQuery>,
) -> AppResult<Json<ProveedorEliminado>> {
    let id = query
        .id
        .ok_or_else(|| AppError::BadRequest("ID de proveedor requerido".into()))?;

    let proveedor: Proveedor = sqlx::query_as("SELECT * FROM proveedores WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Proveedor no encontrado".into()))?;

    let (products_affected,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM productos WHERE proveedor_id = $1")
            .bind(id)
            .fetch_one(&state.pool)
            .await?;

    sqlx::query("DELETE FROM proveedores WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if let Err(err) = registrar_auditoria(
        &state.pool,
        None,
        "Sistema",
        "Eliminación de proveedor",
        "proveedores",
        &id.to_string(),
        &format!(
            "Proveedor '{}' eliminado - {} productos desvinculados",
            proveedor.nombre, products_affected
        ),
    )
    .await
    {
        tracing::warn!(error = %err, "fallo al registrar auditoria");
    }

    Ok(Json(ProveedorEliminado {
        success: true,
        message: "Proveedor eliminado correctamente".into(),
        products_affected,
    }))
}
