use ferrous_zones_domain::{DomainError, SlaveNode, SlaveRegistration};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::SlaveRepository;

pub struct RegisterSlaveUseCase {
    repo: Arc<dyn SlaveRepository>,
}

impl RegisterSlaveUseCase {
    pub fn new(repo: Arc<dyn SlaveRepository>) -> Self {
        Self { repo }
    }

    /// Register a slave. Missing name or address fall back to the peer address.
    #[instrument(skip(self))]
    pub async fn execute(
        &self,
        name: Option<String>,
        ip_address: Option<String>,
        port: u16,
        peer: IpAddr,
    ) -> Result<SlaveNode, DomainError> {
        let ip_address = match ip_address.map(|s| s.trim().to_string()) {
            Some(ip) if !ip.is_empty() => {
                ip.parse::<IpAddr>()
                    .map_err(|_| DomainError::InvalidIpAddress(ip.clone()))?;
                ip
            }
            _ => peer.to_string(),
        };
        let name = match name.map(|s| s.trim().to_string()) {
            Some(n) if !n.is_empty() => n,
            _ => peer.to_string(),
        };
        if port == 0 {
            return Err(DomainError::InvalidSyncPayload(
                "slave port cannot be 0".to_string(),
            ));
        }

        let registration = SlaveRegistration {
            name,
            ip_address,
            port,
        };
        let slave = self.repo.register_slave(&registration).await?;

        info!(
            slave_id = ?slave.id,
            name = %slave.name,
            ip = %slave.ip_address,
            port = slave.port,
            "Slave registered"
        );

        Ok(slave)
    }
}
