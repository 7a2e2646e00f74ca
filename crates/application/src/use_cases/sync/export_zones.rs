use ferrous_zones_domain::{DomainError, RecordPayload, ZoneSnapshot, ZoneSyncPayload};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::{SlaveRepository, ZoneRepository};

/// Builds version-filtered zone snapshots for slaves.
pub struct ExportZonesUseCase {
    zones: Arc<dyn ZoneRepository>,
    slaves: Arc<dyn SlaveRepository>,
}

impl ExportZonesUseCase {
    pub fn new(zones: Arc<dyn ZoneRepository>, slaves: Arc<dyn SlaveRepository>) -> Self {
        Self { zones, slaves }
    }

    /// Serve a slave pull. The slave must be registered.
    #[instrument(skip(self))]
    pub async fn execute(
        &self,
        slave_id: i64,
        since_version: i64,
    ) -> Result<ZoneSyncPayload, DomainError> {
        if self.slaves.get_slave(slave_id).await?.is_none() {
            return Err(DomainError::SlaveNotFound(slave_id));
        }

        let payload = self.build_payload(since_version).await?;

        self.slaves
            .update_slave_sync_status(slave_id, payload.zone_names.len() as i64)
            .await?;

        info!(
            slave_id,
            since_version,
            exported = payload.zones.len(),
            total = payload.zone_names.len(),
            "Zones exported"
        );

        Ok(payload)
    }

    /// Zones newer than `since_version` with their records, plus every zone name.
    pub async fn build_payload(&self, since_version: i64) -> Result<ZoneSyncPayload, DomainError> {
        let all = self.zones.list_zones().await?;
        let changed = self.zones.zones_since(since_version).await?;

        let mut zones = Vec::with_capacity(changed.len());
        for zone in changed {
            let zone_id = zone.id.ok_or_else(|| {
                DomainError::InvalidZone(format!("Zone '{}' has no id", zone.name))
            })?;
            let records = self
                .zones
                .list_records_by_zone(zone_id)
                .await?
                .iter()
                .map(RecordPayload::from)
                .collect();
            zones.push(ZoneSnapshot { zone, records });
        }

        Ok(ZoneSyncPayload {
            zones,
            timestamp: chrono::Utc::now().timestamp(),
            zone_names: all.iter().map(|z| z.name.to_string()).collect(),
        })
    }
}
