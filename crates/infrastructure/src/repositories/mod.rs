pub mod config_repository;
pub mod slave_repository;
pub mod zone_repository;

pub use config_repository::SqliteConfigRepository;
pub use slave_repository::SqliteSlaveRepository;
pub use zone_repository::SqliteZoneRepository;

pub(crate) fn now_text() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
