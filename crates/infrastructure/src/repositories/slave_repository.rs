use async_trait::async_trait;
use ferrous_zones_application::ports::SlaveRepository;
use ferrous_zones_domain::{DomainError, SlaveNode, SlaveRegistration};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{error, instrument};

use super::now_text;

type SlaveRow = (i64, String, String, i64, Option<i64>, i64, i64);

pub struct SqliteSlaveRepository {
    pool: SqlitePool,
}

impl SqliteSlaveRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_slave(row: SlaveRow) -> SlaveNode {
        let (id, name, ip_address, port, last_heartbeat_at, connected, synced_zone_count) = row;
        SlaveNode {
            id: Some(id),
            name: Arc::from(name.as_str()),
            ip_address: Arc::from(ip_address.as_str()),
            port: u16::try_from(port).unwrap_or_default(),
            last_heartbeat_at,
            connected: connected != 0,
            synced_zone_count,
        }
    }
}

#[async_trait]
impl SlaveRepository for SqliteSlaveRepository {
    #[instrument(skip(self))]
    async fn list_slaves(&self) -> Result<Vec<SlaveNode>, DomainError> {
        let rows = sqlx::query_as::<_, SlaveRow>(
            "SELECT id, name, ip_address, port, last_heartbeat_at, connected, synced_zone_count
             FROM slave_nodes ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to list slaves");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(Self::row_to_slave).collect())
    }

    #[instrument(skip(self))]
    async fn get_slave(&self, id: i64) -> Result<Option<SlaveNode>, DomainError> {
        let row = sqlx::query_as::<_, SlaveRow>(
            "SELECT id, name, ip_address, port, last_heartbeat_at, connected, synced_zone_count
             FROM slave_nodes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to query slave by id");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(Self::row_to_slave))
    }

    #[instrument(skip(self))]
    async fn register_slave(
        &self,
        registration: &SlaveRegistration,
    ) -> Result<SlaveNode, DomainError> {
        let now = chrono::Utc::now().timestamp();

        let row = sqlx::query_as::<_, SlaveRow>(
            "INSERT INTO slave_nodes (name, ip_address, port, last_heartbeat_at, connected, synced_zone_count, created_at)
             VALUES (?, ?, ?, ?, 1, 0, ?)
             ON CONFLICT(ip_address, port) DO UPDATE SET
                 name = excluded.name,
                 last_heartbeat_at = excluded.last_heartbeat_at,
                 connected = 1
             RETURNING id, name, ip_address, port, last_heartbeat_at, connected, synced_zone_count",
        )
        .bind(&registration.name)
        .bind(&registration.ip_address)
        .bind(registration.port as i64)
        .bind(now)
        .bind(now_text())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to register slave");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(Self::row_to_slave(row))
    }

    #[instrument(skip(self))]
    async fn update_slave_heartbeat(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE slave_nodes SET last_heartbeat_at = ?, connected = 1 WHERE id = ?",
        )
        .bind(chrono::Utc::now().timestamp())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to update slave heartbeat");
            DomainError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::SlaveNotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_slave_sync_status(
        &self,
        id: i64,
        synced_zone_count: i64,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE slave_nodes SET synced_zone_count = ?, last_heartbeat_at = ?, connected = 1
             WHERE id = ?",
        )
        .bind(synced_zone_count)
        .bind(chrono::Utc::now().timestamp())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to update slave sync status");
            DomainError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::SlaveNotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn mark_stale_slaves(&self, timeout_secs: i64) -> Result<u64, DomainError> {
        let cutoff = chrono::Utc::now().timestamp() - timeout_secs;

        let result = sqlx::query(
            "UPDATE slave_nodes SET connected = 0
             WHERE connected = 1 AND (last_heartbeat_at IS NULL OR last_heartbeat_at < ?)",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to mark stale slaves");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete_slave(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM slave_nodes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to delete slave");
                DomainError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::SlaveNotFound(id));
        }
        Ok(())
    }
}
