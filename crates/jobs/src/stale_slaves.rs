use ferrous_zones_application::use_cases::MarkStaleSlavesUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Master-side sweep that disconnects slaves whose heartbeat went quiet.
pub struct StaleSlaveJob {
    mark_stale: Arc<MarkStaleSlavesUseCase>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl StaleSlaveJob {
    pub fn new(mark_stale: Arc<MarkStaleSlavesUseCase>) -> Self {
        Self {
            mark_stale,
            interval_secs: 30,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(interval_secs = self.interval_secs, "Starting stale slave job");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            // The first tick completes immediately; nothing can be stale at boot.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("StaleSlaveJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        if let Err(e) = self.mark_stale.execute().await {
                            error!(error = %e, "StaleSlaveJob: sweep failed");
                        }
                    }
                }
            }
        });
    }
}
