pub mod sync;
pub mod zones;

pub use sync::{
    ApplyReport, ApplyZoneSyncUseCase, EnsureSyncTokenUseCase, ExportZonesUseCase,
    HeartbeatUseCase, MarkStaleSlavesUseCase, PushSummary, PushZonesUseCase, RegisterSlaveUseCase,
    SyncTokenStatus, ValidateSyncTokenUseCase,
};
pub use zones::{ImportReport, ImportStaticZonesUseCase};
