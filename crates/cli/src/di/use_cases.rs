use super::{DnsServices, Repositories};
use ferrous_zones_application::services::{SlaveIdentity, SlaveSyncService};
use ferrous_zones_application::use_cases::{
    ApplyZoneSyncUseCase, ExportZonesUseCase, HeartbeatUseCase, ImportStaticZonesUseCase,
    MarkStaleSlavesUseCase, PushZonesUseCase, RegisterSlaveUseCase, ValidateSyncTokenUseCase,
};
use ferrous_zones_domain::Config;
use ferrous_zones_infrastructure::sync::{HttpMasterClient, HttpPushClient};
use std::sync::Arc;
use std::time::Duration;

pub struct UseCases {
    pub import_zones: Arc<ImportStaticZonesUseCase>,
    pub validate_token: Arc<ValidateSyncTokenUseCase>,
    pub register_slave: Arc<RegisterSlaveUseCase>,
    pub heartbeat: Arc<HeartbeatUseCase>,
    pub export_zones: Arc<ExportZonesUseCase>,
    pub push_zones: Arc<PushZonesUseCase>,
    pub mark_stale: Arc<MarkStaleSlavesUseCase>,
    pub slave_sync: Option<Arc<SlaveSyncService>>,
}

impl UseCases {
    pub fn new(
        config: &Config,
        repos: &Repositories,
        dns: &DnsServices,
        sync_token: Option<&str>,
    ) -> anyhow::Result<Self> {
        let sync = &config.sync;
        let timeout = Duration::from_secs(sync.request_timeout_secs);
        let token = sync_token.unwrap_or_default();

        let export_zones = Arc::new(ExportZonesUseCase::new(
            repos.zones.clone(),
            repos.slaves.clone(),
        ));
        let push_client = Arc::new(HttpPushClient::new(token, timeout)?);

        let slave_sync = if sync.role.is_slave() {
            let master_url = sync.master_url.as_deref().unwrap_or_default();
            let master = Arc::new(HttpMasterClient::new(master_url, token, timeout)?);
            let apply = Arc::new(ApplyZoneSyncUseCase::new(
                repos.zones.clone(),
                dns.index.clone(),
            ));
            Some(Arc::new(SlaveSyncService::new(
                master,
                apply,
                slave_identity(config),
            )))
        } else {
            None
        };

        Ok(Self {
            import_zones: Arc::new(ImportStaticZonesUseCase::new(
                repos.zones.clone(),
                dns.index.clone(),
            )),
            validate_token: Arc::new(ValidateSyncTokenUseCase::new(repos.config.clone())),
            register_slave: Arc::new(RegisterSlaveUseCase::new(repos.slaves.clone())),
            heartbeat: Arc::new(HeartbeatUseCase::new(repos.slaves.clone())),
            push_zones: Arc::new(PushZonesUseCase::new(
                repos.slaves.clone(),
                export_zones.clone(),
                push_client,
            )),
            export_zones,
            mark_stale: Arc::new(MarkStaleSlavesUseCase::new(
                repos.slaves.clone(),
                sync.heartbeat_timeout_secs,
            )),
            slave_sync,
        })
    }
}

fn slave_identity(config: &Config) -> SlaveIdentity {
    let name = config.sync.slave_name.clone().unwrap_or_else(|| {
        hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "ferrous-zones".to_string())
    });

    SlaveIdentity {
        name,
        advertise_address: config.sync.advertise_address.clone(),
        port: config.advertised_port(),
    }
}
