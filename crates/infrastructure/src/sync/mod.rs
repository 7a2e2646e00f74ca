//! HTTP transport for zone replication.

mod http_master_client;
mod http_push_client;

pub use http_master_client::HttpMasterClient;
pub use http_push_client::HttpPushClient;

use ferrous_zones_domain::DomainError;
use reqwest::StatusCode;
use std::time::Duration;

const USER_AGENT: &str = concat!("ferrous-zones/", env!("CARGO_PKG_VERSION"), " (replication)");

pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, DomainError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| DomainError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}

/// Map a non-success status into the error the sync state machine reacts to.
pub(crate) fn status_error(endpoint: &str, status: StatusCode, slave_id: Option<i64>) -> DomainError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DomainError::SyncUnauthorized,
        StatusCode::NOT_FOUND => match slave_id {
            Some(id) => DomainError::SlaveNotFound(id),
            None => DomainError::SyncTransport {
                endpoint: endpoint.to_string(),
                reason: "HTTP 404".to_string(),
            },
        },
        other => DomainError::SyncTransport {
            endpoint: endpoint.to_string(),
            reason: format!("HTTP {}", other.as_u16()),
        },
    }
}

pub(crate) fn transport_error(endpoint: &str, e: reqwest::Error) -> DomainError {
    let reason = if e.is_timeout() {
        "request timed out".to_string()
    } else {
        e.to_string()
    };
    DomainError::SyncTransport {
        endpoint: endpoint.to_string(),
        reason,
    }
}
