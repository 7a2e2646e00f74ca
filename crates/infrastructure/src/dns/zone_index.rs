//! In-memory authoritative index.
//!
//! The index maps lower-cased owner FQDNs to their wire records. It is rebuilt
//! from the repository as a whole and published with a single `ArcSwap::store`;
//! readers always see either the previous snapshot or the new one.

use super::record_builder::{ns_record, soa_record, to_wire_record};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use ferrous_zones_application::ports::{ZoneIndexPort, ZoneRepository};
use ferrous_zones_domain::{DomainError, Record as ZoneRecord, Zone};
use hickory_proto::rr::Record;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Debug, Default)]
pub struct IndexSnapshot {
    entries: HashMap<String, Arc<[Record]>>,
    zone_count: usize,
}

impl IndexSnapshot {
    /// Build a snapshot from enabled zones and their stored records.
    ///
    /// Apex SOA and NS come first for each zone, followed by explicit records in
    /// stored order. Records that cannot be turned into RDATA are skipped.
    pub fn build(zones: &[(Zone, Vec<ZoneRecord>)]) -> Self {
        let mut entries: HashMap<String, Vec<Record>> = HashMap::new();
        let mut zone_count = 0;

        for (zone, _) in zones.iter().filter(|(zone, _)| zone.enabled) {
            let apex = zone.name.to_ascii_lowercase();
            match (soa_record(zone), ns_record(zone)) {
                (Ok(soa), Ok(ns)) => {
                    let slot = entries.entry(apex).or_default();
                    slot.push(soa);
                    slot.push(ns);
                    zone_count += 1;
                }
                (Err(e), _) | (_, Err(e)) => {
                    warn!(zone = %zone.name, error = %e, "Skipping zone with unusable SOA data");
                }
            }
        }

        for (zone, records) in zones.iter().filter(|(zone, _)| zone.enabled) {
            for record in records {
                match to_wire_record(zone, record) {
                    Ok(wire) => {
                        let owner = record.owner_fqdn(&zone.name);
                        entries.entry(owner).or_default().push(wire);
                    }
                    Err(e) => {
                        warn!(
                            zone = %zone.name,
                            name = %record.name,
                            record_type = %record.record_type,
                            error = %e,
                            "Skipping record that cannot be served"
                        );
                    }
                }
            }
        }

        Self {
            entries: entries
                .into_iter()
                .map(|(name, records)| (name, Arc::from(records)))
                .collect(),
            zone_count,
        }
    }

    pub fn lookup(&self, fqdn: &str) -> Option<&Arc<[Record]>> {
        self.entries.get(fqdn)
    }

    /// Number of owner names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn zone_count(&self) -> usize {
        self.zone_count
    }
}

pub struct ZoneIndex {
    repository: Arc<dyn ZoneRepository>,
    snapshot: ArcSwap<IndexSnapshot>,
}

impl ZoneIndex {
    pub fn new(repository: Arc<dyn ZoneRepository>) -> Self {
        Self {
            repository,
            snapshot: ArcSwap::from_pointee(IndexSnapshot::default()),
        }
    }

    /// Records owned by `fqdn`, which must already be lower-cased with a trailing dot.
    pub fn lookup(&self, fqdn: &str) -> Option<Arc<[Record]>> {
        self.snapshot.load().lookup(fqdn).cloned()
    }

    pub fn publish(&self, snapshot: IndexSnapshot) {
        self.snapshot.store(Arc::new(snapshot));
    }

    async fn load_zones(&self) -> Result<Vec<(Zone, Vec<ZoneRecord>)>, DomainError> {
        let zones = self.repository.list_zones().await?;
        let mut loaded = Vec::with_capacity(zones.len());

        for zone in zones.into_iter().filter(|z| z.enabled) {
            let Some(zone_id) = zone.id else {
                continue;
            };
            let records = self.repository.list_records_by_zone(zone_id).await?;
            loaded.push((zone, records));
        }

        Ok(loaded)
    }
}

#[async_trait]
impl ZoneIndexPort for ZoneIndex {
    #[instrument(skip(self))]
    async fn reload(&self) -> Result<usize, DomainError> {
        let zones = self.load_zones().await?;
        let snapshot = IndexSnapshot::build(&zones);
        let names = snapshot.len();
        let zone_count = snapshot.zone_count();

        self.publish(snapshot);

        info!(zones = zone_count, names, "Zone index rebuilt");
        Ok(names)
    }
}
