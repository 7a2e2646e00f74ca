//! Single-shot UDP exchange with an upstream resolver.

use async_trait::async_trait;
use ferrous_zones_domain::DomainError;
use std::io::ErrorKind;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Upstream replies larger than this are cut off by the kernel.
const RECV_BUFFER: usize = 4096;

/// Sends one encoded query to `server` and returns the raw reply.
#[async_trait]
pub trait UpstreamExchange: Send + Sync {
    async fn exchange(
        &self,
        server: SocketAddr,
        query: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError>;
}

/// Binds a fresh ephemeral socket per exchange, so a straggling reply to an
/// earlier attempt never lands on the current one.
#[derive(Debug, Default, Clone, Copy)]
pub struct UdpExchange;

fn unspecified_for(server: SocketAddr) -> SocketAddr {
    match server {
        SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
        SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
    }
}

fn classify(server: SocketAddr, err: std::io::Error) -> DomainError {
    if matches!(
        err.kind(),
        ErrorKind::ConnectionRefused | ErrorKind::ConnectionReset
    ) {
        DomainError::TransportConnectionRefused {
            server: server.to_string(),
        }
    } else {
        DomainError::IoError(format!("udp exchange with {server}: {err}"))
    }
}

#[async_trait]
impl UpstreamExchange for UdpExchange {
    async fn exchange(
        &self,
        server: SocketAddr,
        query: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        let timed_out = || DomainError::TransportTimeout {
            server: server.to_string(),
        };

        let socket = UdpSocket::bind(unspecified_for(server))
            .await
            .map_err(|e| DomainError::IoError(format!("cannot bind udp socket: {e}")))?;
        socket.connect(server).await.map_err(|e| classify(server, e))?;

        tokio::time::timeout(timeout, socket.send(query))
            .await
            .map_err(|_| timed_out())?
            .map_err(|e| classify(server, e))?;

        let mut reply = vec![0u8; RECV_BUFFER];
        let len = tokio::time::timeout(timeout, socket.recv(&mut reply))
            .await
            .map_err(|_| timed_out())?
            .map_err(|e| classify(server, e))?;
        reply.truncate(len);

        if len < 12 {
            warn!(%server, len, "Upstream reply shorter than a DNS header");
            return Err(DomainError::InvalidDnsMessage(format!(
                "{len}-byte reply from {server}"
            )));
        }

        debug!(%server, sent = query.len(), received = len, "Upstream exchange complete");
        Ok(reply)
    }
}
