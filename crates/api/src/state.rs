use ferrous_zones_application::services::SlaveSyncService;
use ferrous_zones_application::use_cases::{
    ExportZonesUseCase, HeartbeatUseCase, RegisterSlaveUseCase, ValidateSyncTokenUseCase,
};
use ferrous_zones_domain::NodeRole;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub role: NodeRole,
    pub validate_token: Arc<ValidateSyncTokenUseCase>,
    pub master: MasterUseCases,
    /// Present only on a slave.
    pub slave_sync: Option<Arc<SlaveSyncService>>,
}

#[derive(Clone)]
pub struct MasterUseCases {
    pub register: Arc<RegisterSlaveUseCase>,
    pub heartbeat: Arc<HeartbeatUseCase>,
    pub export: Arc<ExportZonesUseCase>,
}
