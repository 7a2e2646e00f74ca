use ferrous_zones_infrastructure::repositories::{
    SqliteConfigRepository, SqliteSlaveRepository, SqliteZoneRepository,
};
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct Repositories {
    pub zones: Arc<SqliteZoneRepository>,
    pub slaves: Arc<SqliteSlaveRepository>,
    pub config: Arc<SqliteConfigRepository>,
}

impl Repositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            zones: Arc::new(SqliteZoneRepository::new(pool.clone())),
            slaves: Arc::new(SqliteSlaveRepository::new(pool.clone())),
            config: Arc::new(SqliteConfigRepository::new(pool)),
        }
    }
}
