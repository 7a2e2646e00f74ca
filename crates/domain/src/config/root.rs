use serde::Deserialize;
use std::path::Path;

use super::database::DatabaseConfig;
use super::dns::DnsConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::sync::{NodeRole, SyncConfig};
use super::zones::StaticZoneConfig;

/// Config files probed, in order, when no path is given.
pub const SEARCH_PATHS: [&str; 2] = ["ferrous-zones.toml", "/etc/ferrous-zones/config.toml"];

/// Top-level node configuration, one table per concern.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstreams for names outside every hosted zone.
    #[serde(default)]
    pub dns: DnsConfig,

    /// Replication role and master/slave settings
    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    /// Zones imported at boot
    #[serde(default)]
    pub zones: Vec<StaticZoneConfig>,
}

impl Config {
    /// Reads `path` when given, otherwise the first of [`SEARCH_PATHS`] that
    /// exists, falling back to built-in defaults. CLI overrides apply last.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let source = path.map(Path::new).or_else(|| Self::discover());
        let mut config = match source {
            Some(file) => {
                let contents = std::fs::read_to_string(file).map_err(|e| {
                    ConfigError::FileRead(file.display().to_string(), e.to_string())
                })?;
                Self::from_toml(&contents)?
            }
            None => Self::default(),
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn discover() -> Option<&'static Path> {
        SEARCH_PATHS.iter().map(Path::new).find(|p| p.is_file())
    }

    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(port) = overrides.web_port {
            self.server.web_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(db) = overrides.database_path {
            self.database.path = db;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(role) = overrides.role {
            self.sync.role = role;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if let Err(e) = self.dns.forwarder_addrs() {
            return Err(ConfigError::Validation(e));
        }

        if self.sync.role == NodeRole::Slave {
            if self.sync.master_url.as_deref().is_none_or(str::is_empty) {
                return Err(ConfigError::Validation(
                    "Slave role requires sync.master_url".to_string(),
                ));
            }
            if self.sync.token.as_deref().is_none_or(str::is_empty) {
                return Err(ConfigError::Validation(
                    "Slave role requires sync.token".to_string(),
                ));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for zone in &self.zones {
            let key = zone.name.trim_end_matches('.').to_ascii_lowercase();
            if !seen.insert(key) {
                return Err(ConfigError::StaticZone {
                    zone: zone.name.clone(),
                    reason: "declared more than once".to_string(),
                });
            }
        }

        if self.sync.sync_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "sync.sync_interval_secs cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Port the master should push to.
    pub fn advertised_port(&self) -> u16 {
        self.sync.advertise_port.unwrap_or(self.server.web_port)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub web_port: Option<u16>,
    pub bind_address: Option<String>,
    pub database_path: Option<String>,
    pub log_level: Option<String>,
    pub role: Option<NodeRole>,
}
