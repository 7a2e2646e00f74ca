use ferrous_zones_domain::DomainError;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

use super::ExportZonesUseCase;
use crate::ports::{SlavePushClient, SlaveRepository};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushSummary {
    pub attempted: usize,
    pub failed: usize,
}

/// Pushes a full snapshot to every connected slave, one task per slave.
/// Failures are logged and not retried; slaves catch up on their next pull.
pub struct PushZonesUseCase {
    slaves: Arc<dyn SlaveRepository>,
    export: Arc<ExportZonesUseCase>,
    client: Arc<dyn SlavePushClient>,
}

impl PushZonesUseCase {
    pub fn new(
        slaves: Arc<dyn SlaveRepository>,
        export: Arc<ExportZonesUseCase>,
        client: Arc<dyn SlavePushClient>,
    ) -> Self {
        Self {
            slaves,
            export,
            client,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self) -> Result<PushSummary, DomainError> {
        let targets: Vec<_> = self
            .slaves
            .list_slaves()
            .await?
            .into_iter()
            .filter(|s| s.connected)
            .collect();

        if targets.is_empty() {
            return Ok(PushSummary::default());
        }

        let payload = Arc::new(self.export.build_payload(0).await?);
        let mut tasks = JoinSet::new();

        for slave in targets {
            let client = Arc::clone(&self.client);
            let payload = Arc::clone(&payload);
            tasks.spawn(async move {
                let result = client.push(&slave, &payload).await;
                (slave, result)
            });
        }

        let mut summary = PushSummary::default();
        while let Some(joined) = tasks.join_next().await {
            summary.attempted += 1;
            match joined {
                Ok((slave, Ok(()))) => {
                    info!(slave = %slave.name, url = %slave.push_url(), "Zones pushed");
                }
                Ok((slave, Err(e))) => {
                    summary.failed += 1;
                    warn!(slave = %slave.name, url = %slave.push_url(), error = %e, "Push failed");
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!(error = %e, "Push task panicked");
                }
            }
        }

        Ok(summary)
    }
}
