#![allow(dead_code)]
#![allow(unused_imports)]

use async_trait::async_trait;
use ferrous_zones_application::ports::{
    ConfigRepository, MasterClient, SlavePushClient, SlaveRepository, ZoneIndexPort,
    ZoneRepository,
};
use ferrous_zones_domain::{
    DomainError, Record, RecordPayload, RecordType, SlaveNode, SlaveRegistration, Zone,
    ZoneSnapshot, ZoneSyncPayload,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

pub fn zone(name: &str, version: i64) -> Zone {
    let mut zone = Zone::new(name, &format!("ns1.{}", name), &format!("admin.{}", name), 300)
        .unwrap();
    zone.version = version;
    zone
}

pub fn record(name: &str, record_type: RecordType, value: &str) -> Record {
    Record::new(0, name, record_type, value, 0, None)
}

// ── Zones ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct ZoneStore {
    zones: HashMap<i64, Zone>,
    records: HashMap<i64, Vec<Record>>,
    next_zone_id: i64,
    next_record_id: i64,
    seq: i64,
}

impl ZoneStore {
    fn bump(&mut self, zone_id: i64) -> Zone {
        self.seq += 1;
        let seq = self.seq;
        let zone = self.zones.get_mut(&zone_id).unwrap();
        zone.version = seq;
        zone.clone()
    }

    fn insert_records(&mut self, zone_id: i64, records: &[Record]) {
        let mut stored = Vec::with_capacity(records.len());
        for r in records {
            self.next_record_id += 1;
            let mut r = r.clone();
            r.id = Some(self.next_record_id);
            r.zone_id = zone_id;
            stored.push(r);
        }
        self.records.insert(zone_id, stored);
    }
}

#[derive(Clone, Default)]
pub struct MockZoneRepository {
    store: Arc<RwLock<ZoneStore>>,
    should_fail: Arc<AtomicBool>,
    apply_calls: Arc<AtomicU64>,
    delete_calls: Arc<AtomicU64>,
}

impl MockZoneRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn apply_calls(&self) -> u64 {
        self.apply_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> u64 {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Seed a zone with records, bumping the version counter like a local write.
    pub async fn seed(&self, zone: Zone, records: Vec<Record>) -> Zone {
        let created = self.create_zone(&zone).await.unwrap();
        self.replace_records(created.id.unwrap(), &records)
            .await
            .unwrap()
    }

    /// Seed a zone keeping the given version.
    pub async fn seed_synced(&self, zone: Zone, records: Vec<Record>) -> Zone {
        self.apply_synced_zone(&zone, &records).await.unwrap()
    }

    pub async fn zone_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .store
            .read()
            .await
            .zones
            .values()
            .map(|z| z.name.to_string())
            .collect();
        names.sort();
        names
    }

    pub async fn records_of(&self, name: &str) -> Vec<Record> {
        let store = self.store.read().await;
        store
            .zones
            .values()
            .find(|z| &*z.name == name)
            .and_then(|z| store.records.get(&z.id.unwrap()).cloned())
            .unwrap_or_default()
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            Err(DomainError::DatabaseError("mock failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ZoneRepository for MockZoneRepository {
    async fn list_zones(&self) -> Result<Vec<Zone>, DomainError> {
        self.check()?;
        let mut zones: Vec<Zone> = self.store.read().await.zones.values().cloned().collect();
        zones.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(zones)
    }

    async fn get_zone(&self, id: i64) -> Result<Option<Zone>, DomainError> {
        self.check()?;
        Ok(self.store.read().await.zones.get(&id).cloned())
    }

    async fn get_zone_by_name(&self, name: &str) -> Result<Option<Zone>, DomainError> {
        self.check()?;
        let name = Zone::normalize_name(name)?;
        Ok(self
            .store
            .read()
            .await
            .zones
            .values()
            .find(|z| *z.name == *name)
            .cloned())
    }

    async fn create_zone(&self, zone: &Zone) -> Result<Zone, DomainError> {
        self.check()?;
        let mut store = self.store.write().await;
        if store.zones.values().any(|z| z.name == zone.name) {
            return Err(DomainError::ZoneAlreadyExists(zone.name.to_string()));
        }
        store.next_zone_id += 1;
        let id = store.next_zone_id;
        let mut zone = zone.clone();
        zone.id = Some(id);
        store.zones.insert(id, zone);
        store.records.insert(id, vec![]);
        Ok(store.bump(id))
    }

    async fn update_zone(&self, zone: &Zone) -> Result<Zone, DomainError> {
        self.check()?;
        let id = zone.id.ok_or(DomainError::ZoneNotFound(0))?;
        let mut store = self.store.write().await;
        let existing = store.zones.get_mut(&id).ok_or(DomainError::ZoneNotFound(id))?;
        let mut updated = zone.clone();
        updated.version = existing.version;
        *existing = updated;
        Ok(store.bump(id))
    }

    async fn delete_zone(&self, id: i64) -> Result<(), DomainError> {
        self.check()?;
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let mut store = self.store.write().await;
        store.zones.remove(&id).ok_or(DomainError::ZoneNotFound(id))?;
        store.records.remove(&id);
        Ok(())
    }

    async fn list_records_by_zone(&self, zone_id: i64) -> Result<Vec<Record>, DomainError> {
        self.check()?;
        Ok(self
            .store
            .read()
            .await
            .records
            .get(&zone_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_record(&self, record: &Record) -> Result<Record, DomainError> {
        self.check()?;
        let mut store = self.store.write().await;
        if !store.zones.contains_key(&record.zone_id) {
            return Err(DomainError::ZoneNotFound(record.zone_id));
        }
        store.next_record_id += 1;
        let mut record = record.clone();
        record.id = Some(store.next_record_id);
        store
            .records
            .entry(record.zone_id)
            .or_default()
            .push(record.clone());
        store.bump(record.zone_id);
        Ok(record)
    }

    async fn delete_record(&self, id: i64) -> Result<(), DomainError> {
        self.check()?;
        let mut store = self.store.write().await;
        let zone_id = store
            .records
            .iter()
            .find(|(_, rs)| rs.iter().any(|r| r.id == Some(id)))
            .map(|(zid, _)| *zid)
            .ok_or_else(|| DomainError::NotFound(format!("record {}", id)))?;
        if let Some(rs) = store.records.get_mut(&zone_id) {
            rs.retain(|r| r.id != Some(id));
        }
        store.bump(zone_id);
        Ok(())
    }

    async fn zones_since(&self, version: i64) -> Result<Vec<Zone>, DomainError> {
        let mut zones: Vec<Zone> = self
            .list_zones()
            .await?
            .into_iter()
            .filter(|z| z.version > version)
            .collect();
        zones.sort_by_key(|z| z.version);
        Ok(zones)
    }

    async fn replace_records(
        &self,
        zone_id: i64,
        records: &[Record],
    ) -> Result<Zone, DomainError> {
        self.check()?;
        let mut store = self.store.write().await;
        if !store.zones.contains_key(&zone_id) {
            return Err(DomainError::ZoneNotFound(zone_id));
        }
        store.insert_records(zone_id, records);
        Ok(store.bump(zone_id))
    }

    async fn apply_synced_zone(
        &self,
        zone: &Zone,
        records: &[Record],
    ) -> Result<Zone, DomainError> {
        self.check()?;
        self.apply_calls.fetch_add(1, Ordering::SeqCst);
        let mut store = self.store.write().await;
        let existing_id = store
            .zones
            .values()
            .find(|z| z.name == zone.name)
            .and_then(|z| z.id);
        let id = match existing_id {
            Some(id) => id,
            None => {
                store.next_zone_id += 1;
                store.next_zone_id
            }
        };
        let mut stored = zone.clone();
        stored.id = Some(id);
        store.zones.insert(id, stored.clone());
        store.insert_records(id, records);
        Ok(stored)
    }
}

// ── Slaves ─────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockSlaveRepository {
    slaves: Arc<RwLock<HashMap<i64, SlaveNode>>>,
    next_id: Arc<AtomicU64>,
    now: Arc<RwLock<i64>>,
}

impl MockSlaveRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_now(&self, now: i64) {
        *self.now.write().await = now;
    }

    pub async fn insert(&self, slave: SlaveNode) {
        let id = slave.id.unwrap();
        self.slaves.write().await.insert(id, slave);
    }
}

#[async_trait]
impl SlaveRepository for MockSlaveRepository {
    async fn list_slaves(&self) -> Result<Vec<SlaveNode>, DomainError> {
        let mut slaves: Vec<SlaveNode> = self.slaves.read().await.values().cloned().collect();
        slaves.sort_by_key(|s| s.id);
        Ok(slaves)
    }

    async fn get_slave(&self, id: i64) -> Result<Option<SlaveNode>, DomainError> {
        Ok(self.slaves.read().await.get(&id).cloned())
    }

    async fn register_slave(
        &self,
        registration: &SlaveRegistration,
    ) -> Result<SlaveNode, DomainError> {
        let now = *self.now.read().await;
        let mut slaves = self.slaves.write().await;
        if let Some(existing) = slaves.values_mut().find(|s| {
            &*s.ip_address == registration.ip_address.as_str() && s.port == registration.port
        }) {
            existing.name = Arc::from(registration.name.as_str());
            existing.last_heartbeat_at = Some(now);
            existing.connected = true;
            return Ok(existing.clone());
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        let slave = SlaveNode {
            id: Some(id),
            name: Arc::from(registration.name.as_str()),
            ip_address: Arc::from(registration.ip_address.as_str()),
            port: registration.port,
            last_heartbeat_at: Some(now),
            connected: true,
            synced_zone_count: 0,
        };
        slaves.insert(id, slave.clone());
        Ok(slave)
    }

    async fn update_slave_heartbeat(&self, id: i64) -> Result<(), DomainError> {
        let now = *self.now.read().await;
        let mut slaves = self.slaves.write().await;
        let slave = slaves.get_mut(&id).ok_or(DomainError::SlaveNotFound(id))?;
        slave.last_heartbeat_at = Some(now);
        slave.connected = true;
        Ok(())
    }

    async fn update_slave_sync_status(
        &self,
        id: i64,
        synced_zone_count: i64,
    ) -> Result<(), DomainError> {
        let now = *self.now.read().await;
        let mut slaves = self.slaves.write().await;
        let slave = slaves.get_mut(&id).ok_or(DomainError::SlaveNotFound(id))?;
        slave.synced_zone_count = synced_zone_count;
        slave.last_heartbeat_at = Some(now);
        Ok(())
    }

    async fn mark_stale_slaves(&self, timeout_secs: i64) -> Result<u64, DomainError> {
        let now = *self.now.read().await;
        let mut marked = 0;
        for slave in self.slaves.write().await.values_mut() {
            if slave.connected && slave.is_stale(now, timeout_secs) {
                slave.connected = false;
                marked += 1;
            }
        }
        Ok(marked)
    }

    async fn delete_slave(&self, id: i64) -> Result<(), DomainError> {
        self.slaves
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::SlaveNotFound(id))
    }
}

// ── Config ─────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockConfigRepository {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MockConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigRepository for MockConfigRepository {
    async fn get_config(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
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

// ── Master client ──────────────────────────────────────────────────────────

/// Serves payloads from an in-process "master" repository, like the real
/// export endpoint would.
#[derive(Clone)]
pub struct MockMasterClient {
    pub master: MockZoneRepository,
    known_ids: Arc<RwLock<Vec<i64>>>,
    next_id: Arc<AtomicU64>,
    pub fail_transport: Arc<AtomicBool>,
    pub register_calls: Arc<AtomicU64>,
    pub heartbeat_calls: Arc<AtomicU64>,
    pub fetch_calls: Arc<RwLock<Vec<i64>>>,
}

impl MockMasterClient {
    pub fn new(master: MockZoneRepository) -> Self {
        Self {
            master,
            known_ids: Arc::new(RwLock::new(vec![])),
            next_id: Arc::new(AtomicU64::new(0)),
            fail_transport: Arc::new(AtomicBool::new(false)),
            register_calls: Arc::new(AtomicU64::new(0)),
            heartbeat_calls: Arc::new(AtomicU64::new(0)),
            fetch_calls: Arc::new(RwLock::new(vec![])),
        }
    }

    /// Simulate the master dropping its slave table.
    pub async fn forget_slaves(&self) {
        self.known_ids.write().await.clear();
    }

    pub fn set_fail_transport(&self, fail: bool) {
        self.fail_transport.store(fail, Ordering::SeqCst);
    }

    pub async fn fetches(&self) -> Vec<i64> {
        self.fetch_calls.read().await.clone()
    }

    fn transport(&self) -> Result<(), DomainError> {
        if self.fail_transport.load(Ordering::SeqCst) {
            Err(DomainError::SyncTransport {
                endpoint: "mock".to_string(),
                reason: "connection refused".to_string(),
            })
        } else {
            Ok(())
        }
    }

    async fn known(&self, slave_id: i64) -> Result<(), DomainError> {
        if self.known_ids.read().await.contains(&slave_id) {
            Ok(())
        } else {
            Err(DomainError::SlaveNotFound(slave_id))
        }
    }
}

#[async_trait]
impl MasterClient for MockMasterClient {
    async fn register(
        &self,
        _name: &str,
        _ip_address: Option<&str>,
        _port: u16,
    ) -> Result<i64, DomainError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        self.transport()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        self.known_ids.write().await.push(id);
        Ok(id)
    }

    async fn heartbeat(&self, slave_id: i64) -> Result<(), DomainError> {
        self.heartbeat_calls.fetch_add(1, Ordering::SeqCst);
        self.transport()?;
        self.known(slave_id).await
    }

    async fn fetch_zones(
        &self,
        slave_id: i64,
        since_version: i64,
    ) -> Result<ZoneSyncPayload, DomainError> {
        self.fetch_calls.write().await.push(since_version);
        self.transport()?;
        self.known(slave_id).await?;
        Ok(self.payload_since(since_version).await)
    }
}

impl MockMasterClient {
    /// What the master would export for `since_version`, without slave checks.
    pub async fn payload_since(&self, since_version: i64) -> ZoneSyncPayload {
        let mut zones = vec![];
        for zone in self.master.zones_since(since_version).await.unwrap() {
            let records = self
                .master
                .list_records_by_zone(zone.id.unwrap())
                .await
                .unwrap()
                .iter()
                .map(RecordPayload::from)
                .collect();
            zones.push(ZoneSnapshot { zone, records });
        }
        ZoneSyncPayload {
            zones,
            timestamp: 1_700_000_000,
            zone_names: self.master.zone_names().await,
        }
    }
}

// ── Push client ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockPushClient {
    pushed_to: Arc<RwLock<Vec<String>>>,
    failing_ips: Arc<RwLock<Vec<String>>>,
}

impl MockPushClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_for(&self, ip: &str) {
        self.failing_ips.write().await.push(ip.to_string());
    }

    pub async fn pushed_to(&self) -> Vec<String> {
        let mut v = self.pushed_to.read().await.clone();
        v.sort();
        v
    }
}

#[async_trait]
impl SlavePushClient for MockPushClient {
    async fn push(&self, slave: &SlaveNode, _payload: &ZoneSyncPayload) -> Result<(), DomainError> {
        if self
            .failing_ips
            .read()
            .await
            .iter()
            .any(|ip| ip.as_str() == &*slave.ip_address)
        {
            return Err(DomainError::SyncTransport {
                endpoint: slave.push_url(),
                reason: "connection refused".to_string(),
            });
        }
        self.pushed_to
            .write()
            .await
            .push(slave.ip_address.to_string());
        Ok(())
    }
}
