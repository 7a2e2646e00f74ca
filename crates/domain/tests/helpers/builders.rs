#![allow(dead_code)]
use ferrous_zones_domain::{Record, RecordType, Zone};

pub struct ZoneBuilder {
    name: String,
    ns: String,
    admin: String,
    ttl: u32,
    version: i64,
    enabled: bool,
}

impl ZoneBuilder {
    pub fn new() -> Self {
        Self {
            name: "example.com".to_string(),
            ns: "ns1.example.com".to_string(),
            admin: "hostmaster.example.com".to_string(),
            ttl: 3600,
            version: 0,
            enabled: true,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn build(self) -> Zone {
        let mut zone = Zone::new(&self.name, &self.ns, &self.admin, self.ttl).unwrap();
        zone.version = self.version;
        zone.enabled = self.enabled;
        zone
    }
}

impl Default for ZoneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn record(name: &str, record_type: RecordType, value: &str) -> Record {
    Record::new(1, name, record_type, value, 0, None)
}
