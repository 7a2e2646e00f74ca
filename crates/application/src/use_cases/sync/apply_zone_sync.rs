use ferrous_zones_domain::{DomainError, Record, Zone, ZoneSyncPayload};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::ports::{ZoneIndexPort, ZoneRepository};

/// Result of applying one payload on a slave.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: usize,
    pub deleted: usize,
    pub skipped_records: usize,
    /// Master zones that are neither stored locally nor carried by the payload.
    /// Non-empty means nothing was applied.
    pub missing: Vec<String>,
    /// Highest version the slave cursor may move to. Never reaches a zone
    /// that was refused, so that zone is fetched again on the next pull.
    pub high_water: Option<i64>,
}

impl ApplyReport {
    pub fn needs_full_resync(&self) -> bool {
        !self.missing.is_empty() || self.deleted > 0
    }
}

/// Applies a master payload to local storage: upsert, replace records,
/// reconcile deletions, reload the index.
pub struct ApplyZoneSyncUseCase {
    zones: Arc<dyn ZoneRepository>,
    index: Arc<dyn ZoneIndexPort>,
}

impl ApplyZoneSyncUseCase {
    pub fn new(zones: Arc<dyn ZoneRepository>, index: Arc<dyn ZoneIndexPort>) -> Self {
        Self { zones, index }
    }

    #[instrument(skip(self, payload), fields(zones = payload.zones.len(), names = payload.zone_names.len()))]
    pub async fn execute(&self, payload: &ZoneSyncPayload) -> Result<ApplyReport, DomainError> {
        let mut report = ApplyReport::default();

        let local: HashSet<String> = self
            .zones
            .list_zones()
            .await?
            .into_iter()
            .map(|z| z.name.to_string())
            .collect();
        let master_names = payload.master_zone_names();

        let mut accepted: Vec<(Zone, usize)> = Vec::with_capacity(payload.zones.len());
        let mut refused_floor: Option<i64> = None;
        let mut carried: HashSet<String> = HashSet::with_capacity(payload.zones.len());
        for (position, snapshot) in payload.zones.iter().enumerate() {
            if let Ok(name) = Zone::normalize_name(&snapshot.zone.name) {
                carried.insert(name);
            }
            match snapshot.zone.canonicalized() {
                Ok(zone) => accepted.push((zone, position)),
                Err(e) => {
                    warn!(zone = %snapshot.zone.name, error = %e, "Skipping invalid zone from master");
                    let version = snapshot.zone.version;
                    refused_floor = Some(refused_floor.map_or(version, |v| v.min(version)));
                }
            }
        }

        report.missing = master_names
            .iter()
            .filter(|n| !local.contains(n.as_str()) && !carried.contains(n.as_str()))
            .cloned()
            .collect();
        if !report.missing.is_empty() {
            warn!(missing = ?report.missing, "Master zones absent locally, full resync needed");
            return Ok(report);
        }

        let mut applied_max: Option<i64> = None;
        for (zone, position) in &accepted {
            let snapshot = &payload.zones[*position];
            let mut records: Vec<Record> = Vec::with_capacity(snapshot.records.len());
            for payload_record in &snapshot.records {
                // Zone id is assigned by the repository on apply.
                match payload_record.into_record(0) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        report.skipped_records += 1;
                        warn!(
                            zone = %zone.name,
                            name = %payload_record.name,
                            record_type = %payload_record.record_type,
                            error = %e,
                            "Skipping unparsable record"
                        );
                    }
                }
            }

            self.zones.apply_synced_zone(zone, &records).await?;
            report.applied += 1;
            applied_max = applied_max.max(Some(zone.version));
        }

        report.high_water = match (applied_max, refused_floor) {
            (Some(applied), Some(floor)) => Some(applied.min(floor - 1)),
            (applied, None) => applied,
            (None, Some(_)) => None,
        };

        // A zone carried by the payload is never deleted even if the name list omits it.
        for zone in self.zones.list_zones().await? {
            if master_names.contains(&*zone.name) || carried.contains(&*zone.name) {
                continue;
            }
            let Some(id) = zone.id else { continue };
            self.zones.delete_zone(id).await?;
            report.deleted += 1;
            info!(zone = %zone.name, "Deleted zone no longer present on master");
        }

        if report.applied > 0 || report.deleted > 0 {
            if let Err(e) = self.index.reload().await {
                error!(error = %e, "Failed to reload zone index after sync");
            }
        }

        info!(
            applied = report.applied,
            deleted = report.deleted,
            skipped_records = report.skipped_records,
            "Sync payload applied"
        );

        Ok(report)
    }
}
