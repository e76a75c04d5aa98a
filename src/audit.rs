use crate::{db::DbPool, error::AppResult};

/// Inserta una fila en `auditoria`. Los llamadores la invocan después de
/// confirmar la operación principal y tragan el error con un `warn`:
///
/// ```ignore
/// if let Err(err) = registrar_auditoria(&state.pool, ...).await {
///     tracing::warn!(error = %err, "fallo al registrar auditoria");
/// }
/// ```
pub async fn registrar_auditoria(
    pool: &DbPool,
    usuario_id: Option<i32>,
    nombre_usuario: &str,
    accion: &str,
    entidad: &str,
    entidad_id: &str,
    cambios: &str,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO auditoria (usuario_id, nombre_usuario, accion, entidad, entidad_id, cambios)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(usuario_id)
    .bind(nombre_usuario)
    .bind(accion)
    .bind(entidad)
    .bind(entidad_id)
    .bind(cambios)
    .execute(pool)
    .await?;

    Ok(())
}

/// Nombre para mostrar del usuario actuante; "Sistema" cuando el usuario no
/// existe o la consulta falla. Solo se usa para el texto de auditoría.
pub async fn nombre_de_usuario(pool: &DbPool, usuario_id: i32) -> String {
    let nombre: Option<(String,)> = sqlx::query_as("SELECT nombre FROM usuarios WHERE id = $1")
        .bind(usuario_id)
        .fetch_optional(pool)
        .await
        .ok()
        .flatten();

    nombre
        .map(|(n,)| n)
        .unwrap_or_else(|| "Sistema".to_string())
}
