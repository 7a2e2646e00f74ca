use ferrous_zones_domain::{DomainError, Record, StaticZoneConfig, Zone};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::ports::{ZoneIndexPort, ZoneRepository};

#[derive(Debug, Default)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// One `ZoneLoad` error per refused zone.
    pub failed: Vec<DomainError>,
}

impl ImportReport {
    pub fn changed(&self) -> bool {
        self.created > 0 || self.updated > 0
    }
}

/// Imports `[[zones]]` from the configuration file.
pub struct ImportStaticZonesUseCase {
    zones: Arc<dyn ZoneRepository>,
    index: Arc<dyn ZoneIndexPort>,
}

impl ImportStaticZonesUseCase {
    pub fn new(zones: Arc<dyn ZoneRepository>, index: Arc<dyn ZoneIndexPort>) -> Self {
        Self { zones, index }
    }

    #[instrument(skip(self, definitions), fields(count = definitions.len()))]
    pub async fn execute(&self, definitions: &[StaticZoneConfig]) -> ImportReport {
        let mut report = ImportReport::default();

        for definition in definitions {
            match self.import_one(definition).await {
                Ok(Outcome::Created) => report.created += 1,
                Ok(Outcome::Updated) => report.updated += 1,
                Ok(Outcome::Unchanged) => report.unchanged += 1,
                Err(e) => {
                    error!(zone = %definition.name, error = %e, "Static zone refused");
                    report.failed.push(match e {
                        DomainError::ZoneLoad { .. } => e,
                        other => DomainError::ZoneLoad {
                            zone: definition.name.clone(),
                            reason: other.to_string(),
                        },
                    });
                }
            }
        }

        if report.changed() {
            if let Err(e) = self.index.reload().await {
                warn!(error = %e, "Failed to reload zone index after static import");
            }
        }

        info!(
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            failed = report.failed.len(),
            "Static zones imported"
        );

        report
    }

    async fn import_one(&self, definition: &StaticZoneConfig) -> Result<Outcome, DomainError> {
        let (zone, records) = definition.to_zone()?;

        let Some(existing) = self.zones.get_zone_by_name(&zone.name).await? else {
            let created = self.zones.create_zone(&zone).await?;
            let zone_id = require_id(&created)?;
            self.zones
                .replace_records(zone_id, &with_zone_id(records, zone_id))
                .await?;
            info!(zone = %zone.name, "Static zone created");
            return Ok(Outcome::Created);
        };

        let zone_id = require_id(&existing)?;
        let current = self.zones.list_records_by_zone(zone_id).await?;
        let records = with_zone_id(records, zone_id);
        let metadata_changed = existing.metadata_differs(&zone);
        let records_changed = !same_record_set(&current, &records);

        if !metadata_changed && !records_changed {
            return Ok(Outcome::Unchanged);
        }

        if metadata_changed {
            let mut updated = zone.clone();
            updated.id = Some(zone_id);
            self.zones.update_zone(&updated).await?;
        }
        if records_changed {
            self.zones.replace_records(zone_id, &records).await?;
        }

        info!(
            zone = %zone.name,
            metadata_changed,
            records_changed,
            "Static zone updated"
        );
        Ok(Outcome::Updated)
    }
}

enum Outcome {
    Created,
    Updated,
    Unchanged,
}

fn require_id(zone: &Zone) -> Result<i64, DomainError> {
    zone.id
        .ok_or_else(|| DomainError::InvalidZone(format!("Zone '{}' has no id", zone.name)))
}

fn with_zone_id(mut records: Vec<Record>, zone_id: i64) -> Vec<Record> {
    for record in &mut records {
        record.zone_id = zone_id;
    }
    records
}

/// Order-insensitive comparison of record content.
fn same_record_set(a: &[Record], b: &[Record]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    a.iter().all(|ra| {
        match b
            .iter()
            .enumerate()
            .position(|(i, rb)| !used[i] && ra.same_content(rb))
        {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}
