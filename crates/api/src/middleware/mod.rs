pub mod role;
pub mod sync_token;

pub use role::{require_master, require_slave};
pub use sync_token::{bearer_token, require_sync_token};
