use super::message_builder::MessageBuilder;
use crate::dns::transport::{UdpExchange, UpstreamExchange};
use arc_swap::ArcSwap;
use ferrous_zones_domain::DomainError;
use hickory_proto::op::{Message, Query, ResponseCode};
use hickory_proto::rr::Record;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Reply relayed from the first upstream that answered.
#[derive(Debug, Clone)]
pub struct ForwardedResponse {
    pub answers: Vec<Record>,

    pub response_code: ResponseCode,

    pub upstream: SocketAddr,
}

/// Sequential failover across the configured upstreams.
///
/// Upstreams are tried in order with the same per-attempt timeout; the first one
/// that returns any well-formed reply wins, negative replies included.
pub struct UpstreamForwarder {
    upstreams: ArcSwap<Vec<SocketAddr>>,
    timeout: Duration,
    exchange: Arc<dyn UpstreamExchange>,
}

impl UpstreamForwarder {
    pub fn new(upstreams: Vec<SocketAddr>, timeout: Duration) -> Self {
        Self::with_exchange(upstreams, timeout, Arc::new(UdpExchange))
    }

    pub fn with_exchange(
        upstreams: Vec<SocketAddr>,
        timeout: Duration,
        exchange: Arc<dyn UpstreamExchange>,
    ) -> Self {
        Self {
            upstreams: ArcSwap::from_pointee(upstreams),
            timeout,
            exchange,
        }
    }

    pub fn replace_upstreams(&self, upstreams: Vec<SocketAddr>) {
        debug!(count = upstreams.len(), "Upstream list replaced");
        self.upstreams.store(Arc::new(upstreams));
    }

    pub fn upstreams(&self) -> Arc<Vec<SocketAddr>> {
        self.upstreams.load_full()
    }

    pub fn has_upstreams(&self) -> bool {
        !self.upstreams.load().is_empty()
    }

    pub async fn forward(
        &self,
        query: &Query,
        recursion_desired: bool,
    ) -> Result<ForwardedResponse, DomainError> {
        let upstreams = self.upstreams.load_full();
        if upstreams.is_empty() {
            return Err(DomainError::NoUpstreamServers);
        }

        debug!(
            strategy = "failover",
            servers = upstreams.len(),
            domain = %query.name(),
            "Trying sequentially"
        );

        for (position, server) in upstreams.iter().enumerate() {
            let start = Instant::now();
            match self.query_upstream(*server, query, recursion_desired).await {
                Ok(response) => {
                    debug!(
                        server = %server,
                        latency_ms = start.elapsed().as_millis() as u64,
                        position,
                        rcode = ?response.response_code,
                        "Server responded"
                    );
                    return Ok(response);
                }
                Err(e) => {
                    warn!(server = %server, error = %e, position, "Failing over");
                }
            }
        }

        Err(DomainError::TransportAllServersUnreachable)
    }

    async fn query_upstream(
        &self,
        server: SocketAddr,
        query: &Query,
        recursion_desired: bool,
    ) -> Result<ForwardedResponse, DomainError> {
        let (id, bytes) = MessageBuilder::build_query(query, recursion_desired)?;

        let reply = self.exchange.exchange(server, &bytes, self.timeout).await?;

        let message = Message::from_vec(&reply).map_err(|e| {
            DomainError::InvalidDnsMessage(format!("Failed to parse reply from {}: {}", server, e))
        })?;

        if message.id() != id {
            return Err(DomainError::InvalidDnsMessage(format!(
                "reply from {} carries id {} instead of {}",
                server,
                message.id(),
                id
            )));
        }

        Ok(ForwardedResponse {
            answers: message.answers().to_vec(),
            response_code: message.response_code(),
            upstream: server,
        })
    }
}
