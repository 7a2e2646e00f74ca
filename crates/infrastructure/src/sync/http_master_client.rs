use super::{build_http_client, status_error, transport_error};
use async_trait::async_trait;
use ferrous_zones_application::ports::MasterClient;
use ferrous_zones_domain::{
    DomainError, RegisterSlaveRequest, RegisterSlaveResponse, ZoneSyncPayload,
};
use std::time::Duration;
use tracing::{debug, instrument};

/// Talks to a master's `/api/sync/*` endpoints with the shared bearer token.
pub struct HttpMasterClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl HttpMasterClient {
    pub fn new(master_url: &str, token: &str, timeout: Duration) -> Result<Self, DomainError> {
        let base_url = master_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(DomainError::ConfigError("master URL is empty".to_string()));
        }
        Ok(Self {
            base_url,
            token: token.to_string(),
            client: build_http_client(timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl MasterClient for HttpMasterClient {
    #[instrument(skip(self))]
    async fn register(
        &self,
        name: &str,
        ip_address: Option<&str>,
        port: u16,
    ) -> Result<i64, DomainError> {
        let url = self.url("/api/sync/register");
        let body = RegisterSlaveRequest {
            name: Some(name.to_string()),
            ip_address: ip_address.map(str::to_string),
            port,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        if !response.status().is_success() {
            return Err(status_error(&url, response.status(), None));
        }

        let registered: RegisterSlaveResponse = response
            .json()
            .await
            .map_err(|e| DomainError::InvalidSyncPayload(e.to_string()))?;

        debug!(slave_id = registered.slave_id, "Registered with master");
        Ok(registered.slave_id)
    }

    #[instrument(skip(self))]
    async fn heartbeat(&self, slave_id: i64) -> Result<(), DomainError> {
        let url = self.url(&format!("/api/sync/heartbeat?slave_id={}", slave_id));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        if !response.status().is_success() {
            return Err(status_error(&url, response.status(), Some(slave_id)));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_zones(
        &self,
        slave_id: i64,
        since_version: i64,
    ) -> Result<ZoneSyncPayload, DomainError> {
        let url = self.url(&format!(
            "/api/sync/zones?slave_id={}&since_version={}",
            slave_id, since_version
        ));

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        if !response.status().is_success() {
            return Err(status_error(&url, response.status(), Some(slave_id)));
        }

        let payload: ZoneSyncPayload = response
            .json()
            .await
            .map_err(|e| DomainError::InvalidSyncPayload(e.to_string()))?;

        debug!(
            zones = payload.zones.len(),
            master_zones = payload.zone_names.len(),
            "Fetched zone payload"
        );
        Ok(payload)
    }
}
