//! Ferrous Zones infrastructure: SQLite storage, the DNS answer path and the
//! HTTP replication clients.

pub mod database;
pub mod dns;
pub mod repositories;
pub mod sync;
