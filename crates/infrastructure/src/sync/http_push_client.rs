use super::{build_http_client, status_error, transport_error};
use async_trait::async_trait;
use ferrous_zones_application::ports::SlavePushClient;
use ferrous_zones_domain::{DomainError, SlaveNode, ZoneSyncPayload};
use std::time::Duration;
use tracing::{debug, instrument};

/// Master-side client for a slave's `/api/replication/push` endpoint.
pub struct HttpPushClient {
    token: String,
    client: reqwest::Client,
}

impl HttpPushClient {
    pub fn new(token: &str, timeout: Duration) -> Result<Self, DomainError> {
        Ok(Self {
            token: token.to_string(),
            client: build_http_client(timeout)?,
        })
    }
}

#[async_trait]
impl SlavePushClient for HttpPushClient {
    #[instrument(skip(self, slave, payload), fields(slave = %slave.name, zones = payload.zones.len()))]
    async fn push(&self, slave: &SlaveNode, payload: &ZoneSyncPayload) -> Result<(), DomainError> {
        let url = slave.push_url();

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(payload)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        if !response.status().is_success() {
            return Err(status_error(&url, response.status(), None));
        }

        debug!(url = %url, "Push accepted");
        Ok(())
    }
}
