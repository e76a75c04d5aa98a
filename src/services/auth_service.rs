use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use serde::Deserialize;
use sqlx::FromRow;

use crate::{
    audit::registrar_auditoria,
    db::DbPool,
    dto::auth::{AuthResponse, LoginRequest, RegisterRequest},
    error::{AppError, AppResult},
    models::Usuario,
};

pub const ROLES_PERMITIDOS: [&str; 2] = ["admin", "inventory_manager"];

#[derive(Debug, Deserialize, FromRow)]
struct UsuarioConPassword {
    id: i32,
    nombre: String,
    email: String,
    password: String,
    rol: String,
    activo: bool,
    fecha_creacion: chrono::DateTime<chrono::Utc>,
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// No emite token alguno: el cliente guarda el usuario devuelto y el rol
/// solo decide qué vistas se renderizan.
pub async fn login(pool: &DbPool, payload: LoginRequest) -> AppResult<AuthResponse> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email y contraseña son requeridos".into(),
        ));
    }

    let usuario: Option<UsuarioConPassword> = sqlx::query_as(
        "SELECT id, nombre, email, password, rol, activo, fecha_creacion FROM usuarios WHERE email = $1 AND activo = TRUE",
    )
    .bind(payload.email.as_str())
    .fetch_optional(pool)
    .await?;

    let usuario = match usuario {
        Some(u) => u,
        None => return Err(AppError::BadRequest("Credenciales inválidas".into())),
    };

    if !verify_password(&payload.password, &usuario.password) {
        return Err(AppError::BadRequest("Credenciales inválidas".into()));
    }

    if let Err(err) = registrar_auditoria(
        pool,
        Some(usuario.id),
        &usuario.nombre,
        "Inicio de sesión",
        "Usuario",
        &usuario.id.to_string(),
        "Login exitoso",
    )
    .await
    {
        tracing::warn!(error = %err, "fallo al registrar auditoría");
    }

    Ok(AuthResponse {
        success: true,
        user: Usuario {
            id: usuario.id,
            nombre: usuario.nombre,
            email: usuario.email,
            rol: usuario.rol,
            activo: usuario.activo,
            fecha_creacion: usuario.fecha_creacion,
        },
        message: "Login exitoso".to_string(),
    })
}

pub async fn register(pool: &DbPool, payload: RegisterRequest) -> AppResult<AuthResponse> {
    if payload.nombre.is_empty()
        || payload.email.is_empty()
        || payload.password.is_empty()
        || payload.confirm_password.is_empty()
    {
        return Err(AppError::BadRequest("Todos los campos son requeridos".into()));
    }

    if payload.password != payload.confirm_password {
        return Err(AppError::BadRequest("Las contraseñas no coinciden".into()));
    }

    if payload.password.chars().count() < 6 {
        return Err(AppError::BadRequest(
            "La contraseña debe tener al menos 6 caracteres".into(),
        ));
    }

    let existe: Option<(i32,)> = sqlx::query_as("SELECT id FROM usuarios WHERE email = $1")
        .bind(payload.email.as_str())
        .fetch_optional(pool)
        .await?;

    if existe.is_some() {
        return Err(AppError::BadRequest("Este email ya está registrado".into()));
    }

    let hash = hash_password(&payload.password)?;

    let usuario: Usuario = sqlx::query_as(
        r#"
        INSERT INTO usuarios (nombre, email, password, rol, activo)
        VALUES ($1, $2, $3, 'inventory_manager', TRUE)
        RETURNING id, nombre, email, rol, activo, fecha_creacion
        "#,
    )
    .bind(payload.nombre.trim())
    .bind(payload.email.trim())
    .bind(hash)
    .fetch_one(pool)
    .await?;

    if let Err(err) = registrar_auditoria(
        pool,
        Some(usuario.id),
        &usuario.nombre,
        "Registro de usuario",
        "Usuario",
        &usuario.id.to_string(),
        &format!("Nuevo usuario: {}", usuario.nombre),
    )
    .await
    {
        tracing::warn!(error = %err, "fallo al registrar auditoría");
    }

    Ok(AuthResponse {
        success: true,
        user: usuario,
        message: "Usuario registrado exitosamente".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};

    #[test]
    fn hash_y_verificacion() {
        let hash = hash_password("secreto123").expect("hash");
        assert!(verify_password("secreto123", &hash));
        assert!(!verify_password("otro", &hash));
    }

    #[test]
    fn hash_invalido_no_verifica() {
        assert!(!verify_password("secreto123", "no-es-un-hash"));
    }
}
