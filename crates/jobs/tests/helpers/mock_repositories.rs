#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_zones_application::ports::{
    MasterClient, SlaveRepository, ZoneIndexPort, ZoneRepository,
};
use ferrous_zones_domain::{
    DomainError, Record, RecordPayload, RecordType, SlaveNode, SlaveRegistration, Zone,
    ZoneSnapshot, ZoneSyncPayload,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

pub fn zone(name: &str, version: i64) -> Zone {
    let mut zone = Zone::new(name, &format!("ns1.{}", name), &format!("admin.{}", name), 300)
        .unwrap();
    zone.version = version;
    zone
}

pub fn snapshot(name: &str, version: i64, ip: &str) -> ZoneSnapshot {
    let record = Record::new(0, "www", RecordType::A, ip, 0, None);
    ZoneSnapshot {
        zone: zone(name, version),
        records: vec![RecordPayload::from(&record)],
    }
}

// ── Zones ──────────────────────────────────────────────────────────────────

/// Slave-side storage; only the calls made by the apply path do real work.
#[derive(Clone, Default)]
pub struct MockZoneRepository {
    zones: Arc<RwLock<HashMap<i64, (Zone, Vec<Record>)>>>,
    next_id: Arc<AtomicU64>,
}

impl MockZoneRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .zones
            .read()
            .await
            .values()
            .map(|(z, _)| z.name.to_string())
            .collect();
        names.sort();
        names
    }
}

#[async_trait]
impl ZoneRepository for MockZoneRepository {
    async fn list_zones(&self) -> Result<Vec<Zone>, DomainError> {
        Ok(self.zones.read().await.values().map(|(z, _)| z.clone()).collect())
    }

    async fn get_zone(&self, id: i64) -> Result<Option<Zone>, DomainError> {
        Ok(self.zones.read().await.get(&id).map(|(z, _)| z.clone()))
    }

    async fn get_zone_by_name(&self, name: &str) -> Result<Option<Zone>, DomainError> {
        let name = Zone::normalize_name(name)?;
        Ok(self
            .zones
            .read()
            .await
            .values()
            .find(|(z, _)| *z.name == *name)
            .map(|(z, _)| z.clone()))
    }

    async fn create_zone(&self, zone: &Zone) -> Result<Zone, DomainError> {
        self.apply_synced_zone(zone, &[]).await
    }

    async fn update_zone(&self, zone: &Zone) -> Result<Zone, DomainError> {
        let id = zone.id.ok_or(DomainError::ZoneNotFound(0))?;
        let mut zones = self.zones.write().await;
        let entry = zones.get_mut(&id).ok_or(DomainError::ZoneNotFound(id))?;
        entry.0 = zone.clone();
        Ok(zone.clone())
    }

    async fn delete_zone(&self, id: i64) -> Result<(), DomainError> {
        self.zones
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::ZoneNotFound(id))
    }

    async fn list_records_by_zone(&self, zone_id: i64) -> Result<Vec<Record>, DomainError> {
        Ok(self
            .zones
            .read()
            .await
            .get(&zone_id)
            .map(|(_, r)| r.clone())
            .unwrap_or_default())
    }

    async fn create_record(&self, record: &Record) -> Result<Record, DomainError> {
        let mut zones = self.zones.write().await;
        let entry = zones
            .get_mut(&record.zone_id)
            .ok_or(DomainError::ZoneNotFound(record.zone_id))?;
        entry.1.push(record.clone());
        Ok(record.clone())
    }

    async fn delete_record(&self, id: i64) -> Result<(), DomainError> {
        Err(DomainError::NotFound(format!("record {}", id)))
    }

    async fn zones_since(&self, version: i64) -> Result<Vec<Zone>, DomainError> {
        Ok(self
            .list_zones()
            .await?
            .into_iter()
            .filter(|z| z.version > version)
            .collect())
    }

    async fn replace_records(
        &self,
        zone_id: i64,
        records: &[Record],
    ) -> Result<Zone, DomainError> {
        let mut zones = self.zones.write().await;
        let entry = zones.get_mut(&zone_id).ok_or(DomainError::ZoneNotFound(zone_id))?;
        entry.1 = records.to_vec();
        Ok(entry.0.clone())
    }

    async fn apply_synced_zone(
        &self,
        zone: &Zone,
        records: &[Record],
    ) -> Result<Zone, DomainError> {
        let mut zones = self.zones.write().await;
        let id = zones
            .values()
            .find(|(z, _)| z.name == zone.name)
            .and_then(|(z, _)| z.id)
            .unwrap_or_else(|| self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1);
        let mut stored = zone.clone();
        stored.id = Some(id);
        zones.insert(id, (stored.clone(), records.to_vec()));
        Ok(stored)
    }
}

// ── Index ──────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockZoneIndex {
    reloads: Arc<AtomicU64>,
}

impl MockZoneIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reloads(&self) -> u64 {
        self.reloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ZoneIndexPort for MockZoneIndex {
    async fn reload(&self) -> Result<usize, DomainError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(0)
    }
}

// ── Master ─────────────────────────────────────────────────────────────────

/// Master with a fixed zone set; `fetch_zones` filters it by version.
#[derive(Clone, Default)]
pub struct ScriptedMaster {
    zones: Arc<RwLock<Vec<ZoneSnapshot>>>,
    extra_names: Arc<RwLock<Vec<String>>>,
    fail: Arc<AtomicBool>,
    registers: Arc<AtomicU64>,
    heartbeats: Arc<AtomicU64>,
    fetches: Arc<RwLock<Vec<i64>>>,
}

impl ScriptedMaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_zones(&self, zones: Vec<ZoneSnapshot>) {
        *self.zones.write().await = zones;
    }

    /// Names listed in `zone_names` whose data is never exported.
    pub async fn add_phantom_name(&self, name: &str) {
        self.extra_names.write().await.push(name.to_string());
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn registers(&self) -> u64 {
        self.registers.load(Ordering::SeqCst)
    }

    pub fn heartbeats(&self) -> u64 {
        self.heartbeats.load(Ordering::SeqCst)
    }

    pub async fn fetches(&self) -> Vec<i64> {
        self.fetches.read().await.clone()
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(DomainError::SyncTransport {
                endpoint: "mock".to_string(),
                reason: "connection refused".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MasterClient for ScriptedMaster {
    async fn register(
        &self,
        _name: &str,
        _ip_address: Option<&str>,
        _port: u16,
    ) -> Result<i64, DomainError> {
        self.registers.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(1)
    }

    async fn heartbeat(&self, _slave_id: i64) -> Result<(), DomainError> {
        self.heartbeats.fetch_add(1, Ordering::SeqCst);
        self.check()
    }

    async fn fetch_zones(
        &self,
        _slave_id: i64,
        since_version: i64,
    ) -> Result<ZoneSyncPayload, DomainError> {
        self.fetches.write().await.push(since_version);
        self.check()?;

        let all = self.zones.read().await.clone();
        let mut zone_names: Vec<String> = all.iter().map(|s| s.zone.name.to_string()).collect();
        zone_names.extend(self.extra_names.read().await.iter().cloned());

        Ok(ZoneSyncPayload {
            zones: all
                .into_iter()
                .filter(|s| s.zone.version > since_version)
                .collect(),
            timestamp: 1_700_000_000,
            zone_names,
        })
    }
}

// ── Slaves ─────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockSlaveRepository {
    sweeps: Arc<AtomicU64>,
    timeouts: Arc<RwLock<Vec<i64>>>,
}

impl MockSlaveRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sweeps(&self) -> u64 {
        self.sweeps.load(Ordering::SeqCst)
    }

    pub async fn timeouts(&self) -> Vec<i64> {
        self.timeouts.read().await.clone()
    }
}

#[async_trait]
impl SlaveRepository for MockSlaveRepository {
    async fn list_slaves(&self) -> Result<Vec<SlaveNode>, DomainError> {
        Ok(vec![])
    }

    async fn get_slave(&self, _id: i64) -> Result<Option<SlaveNode>, DomainError> {
        Ok(None)
    }

    async fn register_slave(
        &self,
        registration: &SlaveRegistration,
    ) -> Result<SlaveNode, DomainError> {
        Ok(SlaveNode {
            id: Some(1),
            name: Arc::from(registration.name.as_str()),
            ip_address: Arc::from(registration.ip_address.as_str()),
            port: registration.port,
            last_heartbeat_at: None,
            connected: true,
            synced_zone_count: 0,
        })
    }

    async fn update_slave_heartbeat(&self, _id: i64) -> Result<(), DomainError> {
        Ok(())
    }

    async fn update_slave_sync_status(
        &self,
        _id: i64,
        _synced_zone_count: i64,
    ) -> Result<(), DomainError> {
        Ok(())
    }

    async fn mark_stale_slaves(&self, timeout_secs: i64) -> Result<u64, DomainError> {
        self.sweeps.fetch_add(1, Ordering::SeqCst);
        self.timeouts.write().await.push(timeout_secs);
        Ok(0)
    }

    async fn delete_slave(&self, _id: i64) -> Result<(), DomainError> {
        Ok(())
    }
}
