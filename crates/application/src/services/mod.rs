mod slave_sync_service;

pub use slave_sync_service::{SlaveIdentity, SlaveSyncService, SyncOutcome};
