use async_trait::async_trait;
use ferrous_zones_domain::{DomainError, ZoneSyncPayload};

/// Slave-side view of the master's replication API.
///
/// An unknown slave id surfaces as `DomainError::SlaveNotFound`; a rejected
/// token as `DomainError::SyncUnauthorized`.
#[async_trait]
pub trait MasterClient: Send + Sync {
    async fn register(
        &self,
        name: &str,
        ip_address: Option<&str>,
        port: u16,
    ) -> Result<i64, DomainError>;

    async fn heartbeat(&self, slave_id: i64) -> Result<(), DomainError>;

    async fn fetch_zones(
        &self,
        slave_id: i64,
        since_version: i64,
    ) -> Result<ZoneSyncPayload, DomainError>;
}
