use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A slave known to the master.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaveNode {
    pub id: Option<i64>,
    pub name: Arc<str>,
    pub ip_address: Arc<str>,
    pub port: u16,
    /// Unix seconds of the last heartbeat or sync pull.
    pub last_heartbeat_at: Option<i64>,
    pub connected: bool,
    pub synced_zone_count: i64,
}

impl SlaveNode {
    /// Base URL of the slave's replication API.
    pub fn push_url(&self) -> String {
        let host = if self.ip_address.contains(':') {
            format!("[{}]", self.ip_address)
        } else {
            self.ip_address.to_string()
        };
        format!("http://{}:{}/api/replication/push", host, self.port)
    }

    pub fn is_stale(&self, now: i64, timeout_secs: i64) -> bool {
        match self.last_heartbeat_at {
            Some(at) => now - at > timeout_secs,
            None => true,
        }
    }
}

/// Registration request after peer-address defaults were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlaveRegistration {
    pub name: String,
    pub ip_address: String,
    pub port: u16,
}
