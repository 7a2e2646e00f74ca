use crate::{SlaveSyncJob, StaleSlaveJob};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub trait SpawnableJob: Send + Sync + 'static {
    fn with_cancellation(self, token: CancellationToken) -> Self;
    fn start_job(self: Arc<Self>) -> tokio::task::JoinHandle<()>;
}

macro_rules! impl_spawnable_job {
    ($t:ty) => {
        impl SpawnableJob for $t {
            fn with_cancellation(self, token: CancellationToken) -> Self {
                self.with_cancellation(token)
            }

            fn start_job(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
                tokio::spawn(async move { self.start().await })
            }
        }
    };
}

impl_spawnable_job!(SlaveSyncJob);
impl_spawnable_job!(StaleSlaveJob);

fn spawn_job<J: SpawnableJob>(job: Option<J>, shutdown: &Option<CancellationToken>) {
    if let Some(job) = job {
        let job = match shutdown {
            Some(token) => job.with_cancellation(token.clone()),
            None => job,
        };
        Arc::new(job).start_job();
    }
}

/// Starts the background jobs that apply to this node's role.
pub struct JobRunner {
    slave_sync: Option<SlaveSyncJob>,
    stale_slaves: Option<StaleSlaveJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            slave_sync: None,
            stale_slaves: None,
            shutdown: None,
        }
    }

    pub fn with_slave_sync(mut self, job: SlaveSyncJob) -> Self {
        self.slave_sync = Some(job);
        self
    }

    pub fn with_stale_slaves(mut self, job: StaleSlaveJob) -> Self {
        self.stale_slaves = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub async fn start(self) {
        info!("Starting background job runner");

        spawn_job(self.slave_sync, &self.shutdown);
        spawn_job(self.stale_slaves, &self.shutdown);

        info!("All background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
