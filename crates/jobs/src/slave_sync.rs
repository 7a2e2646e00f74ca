use ferrous_zones_application::services::{SlaveSyncService, SyncOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Drives the slave's replication loop.
///
/// Registers once at start, then runs one sync cycle per interval. A cycle that
/// asks for a full resync is followed by up to `max_forced_resyncs` resyncs,
/// each after `resync_delay_ms`. Failed cycles back off exponentially up to
/// `max_backoff_secs`; the first successful cycle resets the backoff.
pub struct SlaveSyncJob {
    service: Arc<SlaveSyncService>,
    interval_secs: u64,
    max_backoff_secs: u64,
    resync_delay_ms: u64,
    max_forced_resyncs: u32,
    shutdown: CancellationToken,
}

impl SlaveSyncJob {
    pub fn new(service: Arc<SlaveSyncService>) -> Self {
        Self {
            service,
            interval_secs: 30,
            max_backoff_secs: 300,
            resync_delay_ms: 500,
            max_forced_resyncs: 3,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs.max(1);
        self
    }

    pub fn with_max_backoff(mut self, max_backoff_secs: u64) -> Self {
        self.max_backoff_secs = max_backoff_secs;
        self
    }

    pub fn with_resync_policy(mut self, resync_delay_ms: u64, max_forced_resyncs: u32) -> Self {
        self.resync_delay_ms = resync_delay_ms;
        self.max_forced_resyncs = max_forced_resyncs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// `min(interval × 2^failures, max_backoff)`, never shorter than the interval.
    pub fn next_delay(&self, consecutive_failures: u32) -> Duration {
        let factor = 1u64.checked_shl(consecutive_failures.min(32)).unwrap_or(u64::MAX);
        let secs = self
            .interval_secs
            .saturating_mul(factor)
            .min(self.max_backoff_secs.max(self.interval_secs));
        Duration::from_secs(secs)
    }

    /// One scheduled cycle plus its bounded forced resyncs. Returns whether the
    /// cycle succeeded.
    pub async fn run_once(&self) -> bool {
        let mut outcome = match self.service.tick().await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, state = self.service.state().as_str(), "Sync cycle failed");
                return false;
            }
        };

        let mut forced = 0;
        while matches!(outcome, SyncOutcome::ResyncRequested) {
            if forced >= self.max_forced_resyncs {
                warn!(
                    forced,
                    "Forced resync limit reached, deferring to next cycle"
                );
                return true;
            }
            forced += 1;

            tokio::select! {
                _ = self.shutdown.cancelled() => return true,
                _ = tokio::time::sleep(Duration::from_millis(self.resync_delay_ms)) => {}
            }

            info!(attempt = forced, "Running forced full resync");
            outcome = match self.service.resync().await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(error = %e, "Forced resync failed");
                    return false;
                }
            };
        }

        if let SyncOutcome::Synced(report) = outcome {
            if report.applied > 0 || report.deleted > 0 {
                info!(
                    applied = report.applied,
                    deleted = report.deleted,
                    skipped_records = report.skipped_records,
                    version = self.service.last_sync_version(),
                    "Zones synchronized from master"
                );
            }
        }
        true
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.interval_secs,
            max_backoff_secs = self.max_backoff_secs,
            "Starting slave sync job"
        );

        tokio::spawn(async move {
            if let Err(e) = self.service.register().await {
                error!(error = %e, "Initial registration with master failed");
            }

            let mut failures: u32 = 0;
            loop {
                if self.shutdown.is_cancelled() {
                    break;
                }

                if self.run_once().await {
                    failures = 0;
                } else {
                    failures = failures.saturating_add(1);
                }

                let delay = self.next_delay(failures);
                tokio::select! {
                    _ = self.shutdown.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            info!("SlaveSyncJob: shutting down");
        });
    }
}
