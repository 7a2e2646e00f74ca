//! HTTP surface of a Ferrous Zones node: the master's sync endpoints, the
//! slave's push receiver and a health probe.

pub mod dto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use errors::ApiError;
pub use routes::{create_api_routes, create_app};
pub use state::{AppState, MasterUseCases};
