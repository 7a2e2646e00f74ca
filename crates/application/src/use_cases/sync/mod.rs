mod apply_zone_sync;
mod export_zones;
mod heartbeat;
mod mark_stale_slaves;
mod push_zones;
mod register_slave;
mod sync_token;

pub use apply_zone_sync::{ApplyReport, ApplyZoneSyncUseCase};
pub use export_zones::ExportZonesUseCase;
pub use heartbeat::HeartbeatUseCase;
pub use mark_stale_slaves::MarkStaleSlavesUseCase;
pub use push_zones::{PushSummary, PushZonesUseCase};
pub use register_slave::RegisterSlaveUseCase;
pub use sync_token::{EnsureSyncTokenUseCase, SyncTokenStatus, ValidateSyncTokenUseCase};
