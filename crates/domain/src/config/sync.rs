use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Replication role of this node. Fixed at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    #[default]
    Standalone,
    Master,
    Slave,
}

impl NodeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::Standalone => "standalone",
            NodeRole::Master => "master",
            NodeRole::Slave => "slave",
        }
    }

    pub fn is_master(&self) -> bool {
        matches!(self, NodeRole::Master)
    }

    pub fn is_slave(&self) -> bool {
        matches!(self, NodeRole::Slave)
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standalone" => Ok(NodeRole::Standalone),
            "master" => Ok(NodeRole::Master),
            "slave" => Ok(NodeRole::Slave),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub role: NodeRole,

    /// Base URL of the master, e.g. `http://10.0.0.1:8080` (slave only).
    #[serde(default)]
    pub master_url: Option<String>,

    #[serde(default)]
    pub token: Option<String>,

    /// Name announced on registration. Defaults to the host name.
    #[serde(default)]
    pub slave_name: Option<String>,

    /// Address the master should push to. Defaults to the peer address it observes.
    #[serde(default)]
    pub advertise_address: Option<String>,

    /// Port the master should push to. Defaults to `server.web_port`.
    #[serde(default)]
    pub advertise_port: Option<u16>,

    #[serde(default = "default_sync_interval_secs")]
    pub sync_interval_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_heartbeat_timeout_secs")]
    pub heartbeat_timeout_secs: u64,

    #[serde(default = "default_stale_check_interval_secs")]
    pub stale_check_interval_secs: u64,

    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,

    #[serde(default = "default_resync_delay_ms")]
    pub resync_delay_ms: u64,

    #[serde(default = "default_max_forced_resyncs")]
    pub max_forced_resyncs: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            role: NodeRole::default(),
            master_url: None,
            token: None,
            slave_name: None,
            advertise_address: None,
            advertise_port: None,
            sync_interval_secs: default_sync_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            heartbeat_timeout_secs: default_heartbeat_timeout_secs(),
            stale_check_interval_secs: default_stale_check_interval_secs(),
            max_backoff_secs: default_max_backoff_secs(),
            resync_delay_ms: default_resync_delay_ms(),
            max_forced_resyncs: default_max_forced_resyncs(),
        }
    }
}

fn default_sync_interval_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_heartbeat_timeout_secs() -> u64 {
    120
}

fn default_stale_check_interval_secs() -> u64 {
    30
}

fn default_max_backoff_secs() -> u64 {
    300
}

fn default_resync_delay_ms() -> u64 {
    500
}

fn default_max_forced_resyncs() -> u32 {
    3
}
