pub mod health;
pub mod replication;
pub mod sync;

pub use health::health_check;
