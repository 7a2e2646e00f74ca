mod import_static_zones;

pub use import_static_zones::{ImportReport, ImportStaticZonesUseCase};
