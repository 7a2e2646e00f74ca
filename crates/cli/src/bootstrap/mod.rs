mod config;
mod database;
mod logging;
mod sync_token;
mod zones;

pub use config::load_config;
pub use database::init_database;
pub use logging::init_logging;
pub use sync_token::seed_sync_token;
pub use zones::load_zones;
