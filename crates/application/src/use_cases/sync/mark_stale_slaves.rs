use ferrous_zones_domain::DomainError;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::SlaveRepository;

pub struct MarkStaleSlavesUseCase {
    repo: Arc<dyn SlaveRepository>,
    timeout_secs: i64,
}

impl MarkStaleSlavesUseCase {
    pub fn new(repo: Arc<dyn SlaveRepository>, timeout_secs: u64) -> Self {
        Self {
            repo,
            timeout_secs: timeout_secs as i64,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self) -> Result<u64, DomainError> {
        let marked = self.repo.mark_stale_slaves(self.timeout_secs).await?;
        if marked > 0 {
            info!(
                marked,
                timeout_secs = self.timeout_secs,
                "Marked slaves as disconnected"
            );
        }
        Ok(marked)
    }
}
