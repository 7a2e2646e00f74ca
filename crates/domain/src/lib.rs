//! Ferrous Zones Domain Layer
pub mod config;
pub mod dns_record;
pub mod errors;
pub mod slave_node;
pub mod sync;
pub mod zone;

pub use config::{
    CliOverrides, Config, ConfigError, DatabaseConfig, DnsConfig, LoggingConfig, NodeRole,
    ServerConfig, StaticRecordConfig, StaticZoneConfig, SyncConfig,
};
pub use dns_record::{Record, RecordData, RecordType};
pub use errors::DomainError;
pub use slave_node::{SlaveNode, SlaveRegistration};
pub use sync::{
    RecordPayload, RegisterSlaveRequest, RegisterSlaveResponse, SyncState, ZoneSnapshot,
    ZoneSyncPayload, SYNC_TOKEN_KEY, ZONE_VERSION_SEQ_KEY,
};
pub use zone::Zone;
