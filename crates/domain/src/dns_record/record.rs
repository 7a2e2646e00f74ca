use super::{RecordData, RecordType};
use crate::errors::DomainError;
use std::sync::Arc;

/// A resource record owned by a zone.
///
/// `name` is relative to the zone (`"www"`), the apex marker `"@"`, or an absolute
/// name with a trailing dot. `ttl == 0` inherits the zone TTL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: Option<i64>,

    pub zone_id: i64,

    pub name: Arc<str>,

    pub record_type: RecordType,

    pub value: Arc<str>,

    pub ttl: u32,

    pub priority: Option<u16>,
}

impl Record {
    pub fn new(
        zone_id: i64,
        name: &str,
        record_type: RecordType,
        value: &str,
        ttl: u32,
        priority: Option<u16>,
    ) -> Self {
        Self {
            id: None,
            zone_id,
            name: Arc::from(name),
            record_type,
            value: Arc::from(value),
            ttl,
            priority,
        }
    }

    /// Owner name of this record as a lower-cased FQDN within `zone_name`.
    pub fn owner_fqdn(&self, zone_name: &str) -> String {
        let name = self.name.trim();
        let zone = zone_name.trim_end_matches('.').to_lowercase();

        if name.is_empty() || name == "@" {
            return format!("{}.", zone);
        }
        if name.ends_with('.') {
            return name.to_lowercase();
        }
        format!("{}.{}.", name.to_lowercase(), zone)
    }

    pub fn effective_ttl(&self, zone_ttl: u32) -> u32 {
        if self.ttl == 0 {
            zone_ttl
        } else {
            self.ttl
        }
    }

    pub fn data(&self) -> Result<RecordData, DomainError> {
        RecordData::parse(self.record_type, &self.value, self.priority)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.record_type.is_storable() {
            return Err(DomainError::InvalidRecord(format!(
                "{} records cannot be stored explicitly",
                self.record_type
            )));
        }
        if self.name.len() > 253 {
            return Err(DomainError::InvalidRecord(format!(
                "Record name '{}' exceeds 253 characters",
                self.name
            )));
        }
        self.data().map(|_| ())
    }

    /// Same content, ignoring identifiers.
    pub fn same_content(&self, other: &Record) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && self.record_type == other.record_type
            && self.value == other.value
            && self.ttl == other.ttl
            && self.priority == other.priority
    }
}
