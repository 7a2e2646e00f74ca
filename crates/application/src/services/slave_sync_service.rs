use ferrous_zones_domain::{DomainError, SyncState, ZoneSyncPayload};
use std::sync::atomic::{AtomicI64, AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::ports::MasterClient;
use crate::use_cases::{ApplyReport, ApplyZoneSyncUseCase};

const NO_SLAVE_ID: i64 = 0;

/// What a slave announces when registering.
#[derive(Debug, Clone)]
pub struct SlaveIdentity {
    pub name: String,
    pub advertise_address: Option<String>,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced(ApplyReport),
    /// The cursor was reset to 0; the caller should run one full resync.
    ResyncRequested,
}

/// Slave side of the replication protocol.
///
/// Holds the slave id assigned by the master and the highest zone version
/// applied so far. Every cycle (pull, forced resync, push receive) runs under
/// one async mutex.
pub struct SlaveSyncService {
    master: Arc<dyn MasterClient>,
    apply: Arc<ApplyZoneSyncUseCase>,
    identity: SlaveIdentity,
    state: AtomicU8,
    slave_id: AtomicI64,
    last_sync_version: AtomicI64,
    cycle: Mutex<()>,
}

impl SlaveSyncService {
    pub fn new(
        master: Arc<dyn MasterClient>,
        apply: Arc<ApplyZoneSyncUseCase>,
        identity: SlaveIdentity,
    ) -> Self {
        Self {
            master,
            apply,
            identity,
            state: AtomicU8::new(encode_state(SyncState::Unregistered)),
            slave_id: AtomicI64::new(NO_SLAVE_ID),
            last_sync_version: AtomicI64::new(0),
            cycle: Mutex::new(()),
        }
    }

    pub fn state(&self) -> SyncState {
        decode_state(self.state.load(Ordering::Acquire))
    }

    pub fn slave_id(&self) -> Option<i64> {
        match self.slave_id.load(Ordering::Acquire) {
            NO_SLAVE_ID => None,
            id => Some(id),
        }
    }

    pub fn last_sync_version(&self) -> i64 {
        self.last_sync_version.load(Ordering::Acquire)
    }

    /// Register with the master. Success moves to `Synced`, failure to `Degraded`.
    #[instrument(skip(self))]
    pub async fn register(&self) -> Result<i64, DomainError> {
        let _guard = self.cycle.lock().await;
        self.register_locked().await
    }

    /// One scheduled cycle: heartbeat (registering first if needed), then an
    /// incremental pull.
    #[instrument(skip(self))]
    pub async fn tick(&self) -> Result<SyncOutcome, DomainError> {
        let _guard = self.cycle.lock().await;

        let slave_id = match self.slave_id() {
            Some(id) => id,
            None => self.register_locked().await?,
        };

        if let Err(e) = self.master.heartbeat(slave_id).await {
            return Err(self.fail(e));
        }

        self.pull_locked(slave_id).await
    }

    /// Follow-up pull after `ResyncRequested`; the cursor is already 0.
    #[instrument(skip(self))]
    pub async fn resync(&self) -> Result<SyncOutcome, DomainError> {
        let _guard = self.cycle.lock().await;

        let slave_id = match self.slave_id() {
            Some(id) => id,
            None => self.register_locked().await?,
        };
        self.pull_locked(slave_id).await
    }

    /// Apply a payload pushed by the master, exactly like a pulled one.
    #[instrument(skip(self, payload))]
    pub async fn receive_push(&self, payload: &ZoneSyncPayload) -> Result<ApplyReport, DomainError> {
        let _guard = self.cycle.lock().await;
        // A diverged zone set only resets the cursor; the next scheduled pull starts from 0.
        self.apply_locked(payload).await
    }

    async fn register_locked(&self) -> Result<i64, DomainError> {
        self.set_state(SyncState::Registering);
        match self
            .master
            .register(
                &self.identity.name,
                self.identity.advertise_address.as_deref(),
                self.identity.port,
            )
            .await
        {
            Ok(id) => {
                self.slave_id.store(id, Ordering::Release);
                self.set_state(SyncState::Synced);
                info!(slave_id = id, name = %self.identity.name, "Registered with master");
                Ok(id)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    async fn pull_locked(&self, slave_id: i64) -> Result<SyncOutcome, DomainError> {
        let since = self.last_sync_version();
        let payload = match self.master.fetch_zones(slave_id, since).await {
            Ok(payload) => payload,
            Err(e) => return Err(self.fail(e)),
        };

        debug!(
            since,
            zones = payload.zones.len(),
            master_zones = payload.zone_names.len(),
            "Fetched zones from master"
        );

        let report = self
            .apply_locked(&payload)
            .await
            .map_err(|e| self.fail(e))?;
        self.set_state(SyncState::Synced);

        if report.needs_full_resync() {
            Ok(SyncOutcome::ResyncRequested)
        } else {
            Ok(SyncOutcome::Synced(report))
        }
    }

    async fn apply_locked(&self, payload: &ZoneSyncPayload) -> Result<ApplyReport, DomainError> {
        let report = self.apply.execute(payload).await?;

        if report.needs_full_resync() {
            self.last_sync_version.store(0, Ordering::Release);
            info!(
                missing = report.missing.len(),
                deleted = report.deleted,
                "Zone set diverged from master, requesting full resync"
            );
        } else if let Some(max) = report.high_water {
            self.last_sync_version.fetch_max(max, Ordering::AcqRel);
        }

        Ok(report)
    }

    fn fail(&self, error: DomainError) -> DomainError {
        if error.requires_reregistration() {
            warn!(error = %error, "Master does not know this slave, will re-register");
            self.slave_id.store(NO_SLAVE_ID, Ordering::Release);
        }
        self.set_state(SyncState::Degraded);
        error
    }

    fn set_state(&self, state: SyncState) {
        self.state.store(encode_state(state), Ordering::Release);
    }
}

fn encode_state(state: SyncState) -> u8 {
    match state {
        SyncState::Unregistered => 0,
        SyncState::Registering => 1,
        SyncState::Synced => 2,
        SyncState::Degraded => 3,
    }
}

fn decode_state(raw: u8) -> SyncState {
    match raw {
        0 => SyncState::Unregistered,
        1 => SyncState::Registering,
        2 => SyncState::Synced,
        _ => SyncState::Degraded,
    }
}
