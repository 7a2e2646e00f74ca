use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SlaveQuery {
    pub slave_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ZonesQuery {
    pub slave_id: i64,
    #[serde(default)]
    pub since_version: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PushResponse {
    pub status: String,
    pub applied: usize,
    pub deleted: usize,
}
