pub mod database;
pub mod dns;
pub mod errors;
pub mod logging;
pub mod root;
pub mod server;
pub mod sync;
pub mod zones;

pub use database::DatabaseConfig;
pub use dns::DnsConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use sync::{NodeRole, SyncConfig};
pub use zones::{StaticRecordConfig, StaticZoneConfig};
