pub mod runner;
pub mod slave_sync;
pub mod stale_slaves;

pub use runner::JobRunner;
pub use slave_sync::SlaveSyncJob;
pub use stale_slaves::StaleSlaveJob;
