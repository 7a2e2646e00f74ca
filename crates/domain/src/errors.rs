use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid zone: {0}")]
    InvalidZone(String),

    #[error("Zone '{zone}' rejected at load time: {reason}")]
    ZoneLoad { zone: String, reason: String },

    #[error("Invalid DNS message: {0}")]
    InvalidDnsMessage(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Zone not found: {0}")]
    ZoneNotFound(i64),

    #[error("Zone already exists: {0}")]
    ZoneAlreadyExists(String),

    #[error("Slave not found: {0}")]
    SlaveNotFound(i64),

    #[error("Missing sync token")]
    MissingSyncToken,

    #[error("Invalid sync token")]
    InvalidSyncToken,

    #[error("Node is not a master")]
    NotMaster,

    #[error("Node is not a slave")]
    NotSlave,

    #[error("Invalid sync payload: {0}")]
    InvalidSyncPayload(String),

    #[error("Sync request to {endpoint} failed: {reason}")]
    SyncTransport { endpoint: String, reason: String },

    #[error("Master rejected the sync token")]
    SyncUnauthorized,

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("All upstream servers are unreachable")]
    TransportAllServersUnreachable,

    #[error("No upstream servers configured")]
    NoUpstreamServers,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// Errors that a slave should answer by dropping its slave id and registering again.
    pub fn requires_reregistration(&self) -> bool {
        matches!(self, DomainError::SlaveNotFound(_) | DomainError::NotFound(_))
    }
}
