use super::Repositories;
use ferrous_zones_domain::Config;
use ferrous_zones_infrastructure::dns::{
    DnsRequestHandler, UpstreamForwarder, ZoneIndex, ZoneResolver,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct DnsServices {
    pub index: Arc<ZoneIndex>,
    pub handler: Arc<DnsRequestHandler>,
}

impl DnsServices {
    pub fn new(config: &Config, repos: &Repositories) -> anyhow::Result<Self> {
        let upstreams = config.dns.forwarder_addrs().map_err(anyhow::Error::msg)?;
        let timeout = Duration::from_millis(config.dns.forward_timeout_ms);

        info!(
            forwarders = upstreams.len(),
            timeout_ms = config.dns.forward_timeout_ms,
            "Configuring forwarder"
        );

        let index = Arc::new(ZoneIndex::new(repos.zones.clone()));
        let forwarder = Arc::new(UpstreamForwarder::new(upstreams, timeout));
        let resolver = Arc::new(ZoneResolver::new(index.clone(), forwarder));

        Ok(Self {
            index,
            handler: Arc::new(DnsRequestHandler::new(resolver)),
        })
    }
}
