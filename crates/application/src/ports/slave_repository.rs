use async_trait::async_trait;
use ferrous_zones_domain::{DomainError, SlaveNode, SlaveRegistration};

#[async_trait]
pub trait SlaveRepository: Send + Sync {
    async fn list_slaves(&self) -> Result<Vec<SlaveNode>, DomainError>;

    async fn get_slave(&self, id: i64) -> Result<Option<SlaveNode>, DomainError>;

    /// Create or refresh the slave keyed by `(ip_address, port)`.
    async fn register_slave(&self, registration: &SlaveRegistration)
        -> Result<SlaveNode, DomainError>;

    /// Fails with `SlaveNotFound` for an unknown id.
    async fn update_slave_heartbeat(&self, id: i64) -> Result<(), DomainError>;

    /// Fails with `SlaveNotFound` for an unknown id.
    async fn update_slave_sync_status(
        &self,
        id: i64,
        synced_zone_count: i64,
    ) -> Result<(), DomainError>;

    /// Mark connected slaves without a heartbeat in `timeout_secs` as disconnected.
    async fn mark_stale_slaves(&self, timeout_secs: i64) -> Result<u64, DomainError>;

    async fn delete_slave(&self, id: i64) -> Result<(), DomainError>;
}
