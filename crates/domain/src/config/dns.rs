use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// Upstream resolvers in priority order (`ip` or `ip:port`).
    #[serde(default)]
    pub forwarders: Vec<String>,

    #[serde(default = "default_forward_timeout_ms")]
    pub forward_timeout_ms: u64,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            forwarders: vec![],
            forward_timeout_ms: default_forward_timeout_ms(),
        }
    }
}

impl DnsConfig {
    /// Parse every forwarder entry, defaulting the port to 53.
    pub fn forwarder_addrs(&self) -> Result<Vec<SocketAddr>, String> {
        self.forwarders
            .iter()
            .map(|entry| parse_forwarder(entry))
            .collect()
    }
}

pub fn parse_forwarder(entry: &str) -> Result<SocketAddr, String> {
    let entry = entry.trim();
    if let Ok(addr) = entry.parse::<SocketAddr>() {
        return Ok(addr);
    }
    entry
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<std::net::IpAddr>()
        .map(|ip| SocketAddr::new(ip, 53))
        .map_err(|_| format!("Invalid forwarder address: {}", entry))
}

fn default_forward_timeout_ms() -> u64 {
    2000
}
