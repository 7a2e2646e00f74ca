use async_trait::async_trait;
use ferrous_zones_application::ports::ConfigRepository;
use ferrous_zones_domain::DomainError;
use sqlx::SqlitePool;
use tracing::{error, instrument};

use super::now_text;

pub struct SqliteConfigRepository {
    pool: SqlitePool,
}

impl SqliteConfigRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConfigRepository for SqliteConfigRepository {
    #[instrument(skip(self))]
    async fn get_config(&self, key: &str) -> Result<Option<String>, DomainError> {
        let row = sqlx::query_as::<_, (String,)>("SELECT value FROM config WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to read config value");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(row.map(|(value,)| value))
    }

    // Values can be secrets; keep them out of spans.
    #[instrument(skip(self, value))]
    async fn set_config(&self, key: &str, value: &str) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO config (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(now_text())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to write config value");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }
}
