use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ferrous_zones_domain::{DomainError, NodeRole, SYNC_TOKEN_KEY};
use ring::rand::{SecureRandom, SystemRandom};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{info, instrument, warn};

use crate::ports::ConfigRepository;

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncTokenStatus {
    /// Written from the configuration file.
    Configured,
    /// Already stored from a previous run.
    Stored,
    /// Freshly generated for a master.
    Generated(String),
    /// No token; sync endpoints reject every request.
    Absent,
}

/// Seeds the active sync token at boot.
pub struct EnsureSyncTokenUseCase {
    config: Arc<dyn ConfigRepository>,
}

impl EnsureSyncTokenUseCase {
    pub fn new(config: Arc<dyn ConfigRepository>) -> Self {
        Self { config }
    }

    #[instrument(skip(self, configured))]
    pub async fn execute(
        &self,
        configured: Option<&str>,
        role: NodeRole,
    ) -> Result<SyncTokenStatus, DomainError> {
        if let Some(token) = configured.map(str::trim).filter(|t| !t.is_empty()) {
            self.config.set_config(SYNC_TOKEN_KEY, token).await?;
            return Ok(SyncTokenStatus::Configured);
        }

        if let Some(stored) = self.config.get_config(SYNC_TOKEN_KEY).await? {
            if !stored.is_empty() {
                return Ok(SyncTokenStatus::Stored);
            }
        }

        if role != NodeRole::Master {
            return Ok(SyncTokenStatus::Absent);
        }

        let token = generate_token()?;
        self.config.set_config(SYNC_TOKEN_KEY, &token).await?;
        info!("Generated a new sync token for this master");
        Ok(SyncTokenStatus::Generated(token))
    }
}

fn generate_token() -> Result<String, DomainError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| DomainError::ConfigError("system RNG unavailable".to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Checks a presented bearer token against the stored one.
pub struct ValidateSyncTokenUseCase {
    config: Arc<dyn ConfigRepository>,
}

impl ValidateSyncTokenUseCase {
    pub fn new(config: Arc<dyn ConfigRepository>) -> Self {
        Self { config }
    }

    pub async fn execute(&self, presented: Option<&str>) -> Result<(), DomainError> {
        let presented = presented
            .filter(|t| !t.is_empty())
            .ok_or(DomainError::MissingSyncToken)?;

        let Some(expected) = self.config.get_config(SYNC_TOKEN_KEY).await? else {
            warn!("Sync request rejected: no sync token configured on this node");
            return Err(DomainError::InvalidSyncToken);
        };

        if expected.is_empty() {
            return Err(DomainError::InvalidSyncToken);
        }

        if bool::from(presented.as_bytes().ct_eq(expected.as_bytes())) {
            Ok(())
        } else {
            Err(DomainError::InvalidSyncToken)
        }
    }
}
