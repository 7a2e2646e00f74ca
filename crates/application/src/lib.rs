//! Ferrous Zones Application Layer
//!
//! Ports consumed by the replication and zone-loading use cases, plus the
//! slave-side sync state machine.

pub mod ports;
pub mod services;
pub mod use_cases;
