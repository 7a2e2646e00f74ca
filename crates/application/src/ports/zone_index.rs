use async_trait::async_trait;
use ferrous_zones_domain::DomainError;

#[async_trait]
pub trait ZoneIndexPort: Send + Sync {
    /// Rebuild the index from storage and publish it; returns the number of owner names.
    async fn reload(&self) -> Result<usize, DomainError>;
}
