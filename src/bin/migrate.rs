use axum_inventario_api::{
    config::AppConfig,
    db::{MIGRATOR, create_pool},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    MIGRATOR.run(&pool).await?;

    println!("Migrations applied");
    Ok(())
}
