use ferrous_zones_domain::DatabaseConfig;
use ferrous_zones_infrastructure::database::{create_pool, database_url};
use sqlx::SqlitePool;
use tracing::{error, info};

pub async fn init_database(cfg: &DatabaseConfig) -> anyhow::Result<SqlitePool> {
    let url = database_url(&cfg.path);
    info!(database = %url, "Initializing database");

    let pool = create_pool(&url, cfg.max_connections).await.map_err(|e| {
        error!(error = %e, "Failed to initialize database");
        anyhow::anyhow!(e)
    })?;

    info!(max_connections = cfg.max_connections, "Database initialized");
    Ok(pool)
}
