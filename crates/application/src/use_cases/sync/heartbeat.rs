use ferrous_zones_domain::DomainError;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::ports::SlaveRepository;

pub struct HeartbeatUseCase {
    repo: Arc<dyn SlaveRepository>,
}

impl HeartbeatUseCase {
    pub fn new(repo: Arc<dyn SlaveRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, slave_id: i64) -> Result<(), DomainError> {
        self.repo.update_slave_heartbeat(slave_id).await?;
        debug!(slave_id, "Heartbeat received");
        Ok(())
    }
}
