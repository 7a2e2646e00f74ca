pub mod health;
pub mod sync;

pub use health::HealthResponse;
pub use sync::{PushResponse, SlaveQuery, StatusResponse, ZonesQuery};
