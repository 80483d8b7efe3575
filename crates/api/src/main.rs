use anyhow::Result;
use tracing::info;

use freight_erp_api::{app, config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    middleware::logging::init_logging(&config.logging);

    info!(
        environment = %config.app.environment,
        "Starting Freight ERP platform core v{}",
        env!("CARGO_PKG_VERSION")
    );

    middleware::init_metrics()?;

    // Create database pool
    let db_config: persistence::db::DatabaseConfig = (&config.database).into();
    let pool = persistence::db::create_pool(&db_config).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    if config.security.admin_api_key_hash.is_empty() {
        tracing::warn!("No admin API key configured; admin routes are disabled");
    }

    // Build application
    let addr = config.socket_addr()?;
    let app = app::create_app(config, pool);

    // Start server
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
