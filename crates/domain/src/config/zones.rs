use serde::{Deserialize, Serialize};

use crate::dns_record::{Record, RecordType};
use crate::errors::DomainError;
use crate::zone::Zone;

/// A zone declared in the configuration file and imported at boot.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticZoneConfig {
    pub name: String,

    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_zone_ttl")]
    pub ttl: u32,

    pub ns: String,

    pub admin: String,

    #[serde(default = "default_serial")]
    pub serial: u32,

    #[serde(default = "default_refresh")]
    pub refresh: u32,

    #[serde(default = "default_retry")]
    pub retry: u32,

    #[serde(default = "default_expire")]
    pub expire: u32,

    #[serde(default)]
    pub records: Vec<StaticRecordConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticRecordConfig {
    pub name: String,

    #[serde(rename = "type")]
    pub record_type: String,

    pub value: String,

    #[serde(default)]
    pub ttl: u32,

    #[serde(default)]
    pub priority: Option<u16>,
}

impl StaticZoneConfig {
    /// Validate and convert into a zone plus its records (zone id left at 0).
    ///
    /// Any invalid field yields `DomainError::ZoneLoad` naming this zone.
    pub fn to_zone(&self) -> Result<(Zone, Vec<Record>), DomainError> {
        let load_err = |reason: String| DomainError::ZoneLoad {
            zone: self.name.clone(),
            reason,
        };

        let mut zone = Zone::new(&self.name, &self.ns, &self.admin, self.ttl)
            .map_err(|e| load_err(e.to_string()))?;
        zone.enabled = self.enabled;
        zone.serial = self.serial;
        zone.refresh = self.refresh;
        zone.retry = self.retry;
        zone.expire = self.expire;

        let mut records = Vec::with_capacity(self.records.len());
        for (idx, rc) in self.records.iter().enumerate() {
            let record_type: RecordType = rc
                .record_type
                .parse()
                .map_err(|e: String| load_err(format!("record #{}: {}", idx + 1, e)))?;
            let record = Record::new(0, &rc.name, record_type, &rc.value, rc.ttl, rc.priority);
            record
                .validate()
                .map_err(|e| load_err(format!("record #{} ({}): {}", idx + 1, rc.name, e)))?;
            records.push(record);
        }

        Ok((zone, records))
    }
}

fn default_true() -> bool {
    true
}

fn default_zone_ttl() -> u32 {
    3600
}

fn default_serial() -> u32 {
    1
}

fn default_refresh() -> u32 {
    3600
}

fn default_retry() -> u32 {
    600
}

fn default_expire() -> u32 {
    604800
}
