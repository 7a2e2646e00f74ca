use async_trait::async_trait;
use ferrous_zones_domain::DomainError;

/// Key/value settings persisted next to the zones (sync token, version counter).
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    async fn get_config(&self, key: &str) -> Result<Option<String>, DomainError>;
    async fn set_config(&self, key: &str, value: &str) -> Result<(), DomainError>;
}
