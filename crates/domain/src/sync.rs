//! Replication wire payloads shared by master and slave.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::dns_record::{Record, RecordType};
use crate::errors::DomainError;
use crate::zone::Zone;

/// Config key holding the node's active sync token.
pub const SYNC_TOKEN_KEY: &str = "sync_token";

/// Config key holding the repository-wide zone version counter.
pub const ZONE_VERSION_SEQ_KEY: &str = "zone_version_seq";

/// A record as carried over the wire. Kept loose so one bad record does not
/// poison the whole payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPayload {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub zone_id: Option<i64>,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub value: String,
    #[serde(default)]
    pub ttl: u32,
    #[serde(default)]
    pub priority: Option<u16>,
}

impl From<&Record> for RecordPayload {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id,
            zone_id: Some(record.zone_id),
            name: record.name.to_string(),
            record_type: record.record_type.as_str().to_string(),
            value: record.value.to_string(),
            ttl: record.ttl,
            priority: record.priority,
        }
    }
}

impl RecordPayload {
    pub fn into_record(&self, zone_id: i64) -> Result<Record, DomainError> {
        let record_type: RecordType = self
            .record_type
            .parse()
            .map_err(DomainError::InvalidRecord)?;
        let record = Record::new(
            zone_id,
            &self.name,
            record_type,
            &self.value,
            self.ttl,
            self.priority,
        );
        record.validate()?;
        Ok(record)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    pub zone: Zone,
    #[serde(default)]
    pub records: Vec<RecordPayload>,
}

/// Body of `GET /api/sync/zones` and `POST /api/replication/push`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSyncPayload {
    #[serde(default)]
    pub zones: Vec<ZoneSnapshot>,
    pub timestamp: i64,
    /// Every zone the master holds. Required: an absent list would read as
    /// "no zones" and wipe the slave.
    pub zone_names: Vec<String>,
}

impl ZoneSyncPayload {
    /// Normalized master zone names; unparsable names are dropped.
    pub fn master_zone_names(&self) -> HashSet<String> {
        self.zone_names
            .iter()
            .filter_map(|n| Zone::normalize_name(n).ok())
            .collect()
    }
}

/// Body of `POST /api/sync/register`. Omitted fields default to the peer address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSlaveRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSlaveResponse {
    pub message: String,
    pub slave_id: i64,
}

/// Slave-side replication state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Unregistered,
    Registering,
    Synced,
    Degraded,
}

impl SyncState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncState::Unregistered => "unregistered",
            SyncState::Registering => "registering",
            SyncState::Synced => "synced",
            SyncState::Degraded => "degraded",
        }
    }
}
