mod config_repository;
mod master_client;
mod slave_push_client;
mod slave_repository;
mod zone_index;
mod zone_repository;

pub use config_repository::ConfigRepository;
pub use master_client::MasterClient;
pub use slave_push_client::SlavePushClient;
pub use slave_repository::SlaveRepository;
pub use zone_index::ZoneIndexPort;
pub use zone_repository::ZoneRepository;
