//! kedai-api server binary.

use tracing::info;

use kedai_api::{build_router, init_tracing, ApiConfig, AppState};
use kedai_db::{create_pool_with_config, log_pool_metrics, Database, PoolConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let _log_guard = init_tracing();

    let config = ApiConfig::from_env();
    config.ranking.validate()?;

    info!(
        "Rate limiting: {} ({} requests per {} seconds)",
        if config.rate_limit_enabled {
            "enabled"
        } else {
            "disabled"
        },
        config.rate_limit_requests,
        config.rate_limit_period_secs
    );

    // Connect to database
    info!("Connecting to database...");
    let pool_config = PoolConfig::new()
        .max_connections(config.db_max_connections)
        .trigram_threshold(config.ranking.trigram_threshold);
    let pool = create_pool_with_config(&config.database_url, pool_config).await?;
    let db = Database::with_ranking(pool, config.ranking);
    info!("Database connected");

    if config.run_migrations {
        info!("Running database migrations...");
        db.migrate().await?;
        info!("Database migrations complete");
    }
    log_pool_metrics(db.pool());

    let addr = config.bind_addr()?;
    let state = AppState::new(db, config);
    let app = build_router(state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
