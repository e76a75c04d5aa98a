use axum_inventario_api::{
    config::AppConfig,
    db::{MIGRATOR, create_pool},
    services::auth_service::hash_password,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    MIGRATOR.run(&pool).await?;

    let admin_id = ensure_usuario(&pool, "Administrador", "admin@example.com", "admin123", "admin").await?;
    ensure_usuario(
        &pool,
        "Encargado de Almacén",
        "almacen@example.com",
        "almacen123",
        "inventory_manager",
    )
    .await?;

    seed_catalogo(&pool).await?;

    println!("Seed completado. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_usuario(
    pool: &sqlx::PgPool,
    nombre: &str,
    email: &str,
    password: &str,
    rol: &str,
) -> anyhow::Result<i32> {
    let hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let row: Option<(i32,)> = sqlx::query_as(
        r#"
        INSERT INTO usuarios (nombre, email, password, rol)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET rol = EXCLUDED.rol
        RETURNING id
        "#,
    )
    .bind(nombre)
    .bind(email)
    .bind(&hash)
    .bind(rol)
    .fetch_optional(pool)
    .await?;

    let usuario_id = match row {
        Some((id,)) => id,
        None => {
            let existente: (i32,) = sqlx::query_as("SELECT id FROM usuarios WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existente.0
        }
    };

    println!("Usuario {email} (rol={rol}) listo");
    Ok(usuario_id)
}

async fn seed_catalogo(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let categorias = ["Electrónica", "Oficina", "Limpieza"];
    for nombre in categorias {
        sqlx::query("INSERT INTO categorias (nombre) VALUES ($1) ON CONFLICT (nombre) DO NOTHING")
            .bind(nombre)
            .execute(pool)
            .await?;
    }

    // proveedores no tiene restricción de unicidad; el guard evita duplicados
    // en corridas repetidas del seed.
    sqlx::query(
        r#"
        INSERT INTO proveedores (nombre, contacto, email, telefono, direccion)
        SELECT 'Distribuidora Central', 'María López', 'ventas@distcentral.example', '555-0101', 'Av. Industrial 42'
        WHERE NOT EXISTS (SELECT 1 FROM proveedores WHERE nombre = 'Distribuidora Central')
        "#,
    )
    .execute(pool)
    .await?;

    let productos = [
        ("PROD-0001", "Monitor 24\"", "Monitor LED 24 pulgadas", 15, 5, 189.99),
        ("PROD-0002", "Teclado mecánico", "Teclado con switches rojos", 30, 10, 64.50),
        ("PROD-0003", "Papel A4 (caja)", "Caja de 5 resmas", 8, 12, 22.00),
    ];
    for (sku, nombre, descripcion, stock, stock_minimo, precio) in productos {
        sqlx::query(
            r#"
            INSERT INTO productos (sku, nombre, descripcion, stock, stock_minimo, precio)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (sku) DO NOTHING
            "#,
        )
        .bind(sku)
        .bind(nombre)
        .bind(descripcion)
        .bind(stock)
        .bind(stock_minimo)
        .bind(precio)
        .execute(pool)
        .await?;
    }

    println!("Catálogo de ejemplo listo");
    Ok(())
}
