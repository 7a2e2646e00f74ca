use ferrous_zones_application::ports::ConfigRepository;
use ferrous_zones_application::use_cases::{EnsureSyncTokenUseCase, SyncTokenStatus};
use ferrous_zones_domain::{Config, NodeRole, SYNC_TOKEN_KEY};
use tracing::{info, warn};

use crate::di::Repositories;

/// Make sure the node has its sync token stored; returns the active token.
pub async fn seed_sync_token(
    config: &Config,
    repos: &Repositories,
) -> anyhow::Result<Option<String>> {
    let ensure = EnsureSyncTokenUseCase::new(repos.config.clone());
    let role = config.sync.role;

    match ensure.execute(config.sync.token.as_deref(), role).await? {
        SyncTokenStatus::Configured => info!("Sync token taken from configuration"),
        SyncTokenStatus::Stored => info!("Using previously stored sync token"),
        SyncTokenStatus::Generated(token) => {
            warn!(
                token = %token,
                "Generated a sync token for this master; configure it as sync.token on every slave"
            );
        }
        SyncTokenStatus::Absent if role != NodeRole::Standalone => {
            warn!("No sync token available; replication endpoints will reject every request");
        }
        SyncTokenStatus::Absent => {}
    }

    Ok(repos.config.get_config(SYNC_TOKEN_KEY).await?)
}
