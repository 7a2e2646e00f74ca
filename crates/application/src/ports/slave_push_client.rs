use async_trait::async_trait;
use ferrous_zones_domain::{DomainError, SlaveNode, ZoneSyncPayload};

#[async_trait]
pub trait SlavePushClient: Send + Sync {
    async fn push(&self, slave: &SlaveNode, payload: &ZoneSyncPayload) -> Result<(), DomainError>;
}
