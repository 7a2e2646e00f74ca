use async_trait::async_trait;
use ferrous_zones_domain::{DomainError, Record, Zone};

/// Zone and record storage.
///
/// Local writes (`create_zone`, `update_zone`, `create_record`, `delete_record`,
/// `replace_records`) stamp the zone with the next value of the repository-wide
/// version counter in the same transaction. `apply_synced_zone` keeps the
/// incoming version untouched.
#[async_trait]
pub trait ZoneRepository: Send + Sync {
    async fn list_zones(&self) -> Result<Vec<Zone>, DomainError>;

    async fn get_zone(&self, id: i64) -> Result<Option<Zone>, DomainError>;

    async fn get_zone_by_name(&self, name: &str) -> Result<Option<Zone>, DomainError>;

    async fn create_zone(&self, zone: &Zone) -> Result<Zone, DomainError>;

    async fn update_zone(&self, zone: &Zone) -> Result<Zone, DomainError>;

    async fn delete_zone(&self, id: i64) -> Result<(), DomainError>;

    async fn list_records_by_zone(&self, zone_id: i64) -> Result<Vec<Record>, DomainError>;

    async fn create_record(&self, record: &Record) -> Result<Record, DomainError>;

    async fn delete_record(&self, id: i64) -> Result<(), DomainError>;

    /// Zones whose version is strictly greater than `version`.
    async fn zones_since(&self, version: i64) -> Result<Vec<Zone>, DomainError>;

    /// Replace the whole record set of a zone; returns the re-versioned zone.
    async fn replace_records(&self, zone_id: i64, records: &[Record])
        -> Result<Zone, DomainError>;

    /// Upsert a zone received from the master (matched by name) and replace its
    /// records, atomically.
    async fn apply_synced_zone(&self, zone: &Zone, records: &[Record])
        -> Result<Zone, DomainError>;
}
