use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    dto::usuarios::{CreateUsuarioRequest, UpdateUsuarioRequest, UsuarioCreado},
    entity::{usuarios, Usuarios},
    error::{AppError, AppResult},
    models::Usuario,
    response::Operacion,
    services::auth_service::{self, ROLES_PERMITIDOS},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_usuarios).post(crear_usuario).put(actualizar_usuario),
    )
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UsuarioQuery {
    pub id: Option<i32>,
}

#[utoipa::path(get, path = "/api/usuarios", tag = "Usuarios")]
pub async fn list_usuarios(State(state): State<AppState>) -> AppResult<Json<Vec<Usuario>>> {
    let usuarios: Vec<Usuario> = sqlx::query_as(
        "SELECT id, nombre, email, rol, activo, fecha_creacion FROM usuarios ORDER BY nombre",
    )
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(usuarios))
}

#[utoipa::path(post, path = "/api/usuarios", request_body = CreateUsuarioRequest, tag = "Usuarios")]
pub async fn crear_usuario(
    State(state): State<AppState>,
    Json(payload): Json<CreateUsuarioRequest>,
) -> AppResult<(StatusCode, Json<UsuarioCreado>)> {
    if payload.nombre.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "Nombre, email y contraseña son requeridos".into(),
        ));
    }

    let rol = payload.rol.unwrap_or_else(|| "inventory_manager".to_string());
    if !ROLES_PERMITIDOS.contains(&rol.as_str()) {
        return Err(AppError::BadRequest("Rol no válido".into()));
    }

    let existente = Usuarios::find()
        .filter(usuarios::Column::Email.eq(payload.email.clone()))
        .one(&state.orm)
        .await?;
    if existente.is_some() {
        return Err(AppError::Conflict("El email ya está registrado".into()));
    }

    let hash = auth_service::hash_password(&payload.password)?;

    let user: Usuario = sqlx::query_as(
        r#"
        INSERT INTO usuarios (nombre, email, password, rol, activo)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, nombre, email, rol, activo, fecha_creacion
        "#,
    )
    .bind(&payload.nombre)
    .bind(&payload.email)
    .bind(&hash)
    .bind(&rol)
    .bind(payload.activo.unwrap_or(true))
    .fetch_one(&state.pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(UsuarioCreado {
            success: true,
            message: "Usuario creado correctamente".into(),
            user,
        }),
    ))
}

/// Actualización parcial: solo se tocan los campos presentes en el cuerpo.
#[utoipa::path(put, path = "/api/usuarios", request_body = UpdateUsuarioRequest, tag = "Usuarios")]
pub async fn actualizar_usuario(
    State(state): State<AppState>,
    Query(query): Query<UsuarioQuery>,
    Json(payload): Json<UpdateUsuarioRequest>,
) -> AppResult<Json<Operacion>> {
    let id = payload
        .id
        .or(query.id)
        .ok_or_else(|| AppError::BadRequest("ID de usuario requerido".into()))?;

    let usuario = Usuarios::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuario no encontrado".into()))?;

    if let Some(email) = payload.email.as_deref() {
        let duplicado = Usuarios::find()
            .filter(usuarios::Column::Email.eq(email))
            .filter(usuarios::Column::Id.ne(id))
            .one(&state.orm)
            .await?;
        if duplicado.is_some() {
            return Err(AppError::Conflict("El email ya está registrado".into()));
        }
    }

    let mut activo: usuarios::ActiveModel = usuario.into();
    let mut cambios = false;

    if let Some(nombre) = payload.nombre {
        activo.nombre = Set(nombre);
        cambios = true;
    }
    if let Some(email) = payload.email {
        activo.email = Set(email);
        cambios = true;
    }
    if let Some(rol) = payload.rol {
        if !ROLES_PERMITIDOS.contains(&rol.as_str()) {
            return Err(AppError::BadRequest("Rol no válido".into()));
        }
        activo.rol = Set(rol);
        cambios = true;
    }
    if let Some(estado) = payload.activo {
        activo.activo = Set(estado);
        cambios = true;
    }
    if let Some(password) = payload.password.as_deref().filter(|p| !p.is_empty()) {
        if password.len() < 6 {
            return Err(AppError::BadRequest(
                "La contraseña debe tener al menos 6 caracteres".into(),
            ));
        }
        activo.password = Set(auth_service::hash_password(password)?);
        cambios = true;
    }

    if !cambios {
        return Err(AppError::BadRequest("No hay campos para actualizar".into()));
    }

    activo.update(&state.orm).await?;

    Ok(Json(Operacion::ok("Usuario actualizado correctamente")))
}
