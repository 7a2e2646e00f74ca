#![allow(dead_code)]

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Method, Request},
    response::Response,
    Router,
};
use ferrous_zones_api::{create_app, AppState, MasterUseCases};
use ferrous_zones_application::ports::ConfigRepository;
use ferrous_zones_application::services::{SlaveIdentity, SlaveSyncService};
use ferrous_zones_application::use_cases::{
    ApplyZoneSyncUseCase, ExportZonesUseCase, HeartbeatUseCase, RegisterSlaveUseCase,
    ValidateSyncTokenUseCase,
};
use ferrous_zones_domain::{NodeRole, SYNC_TOKEN_KEY};
use ferrous_zones_infrastructure::dns::ZoneIndex;
use ferrous_zones_infrastructure::repositories::{
    SqliteConfigRepository, SqliteSlaveRepository, SqliteZoneRepository,
};
use ferrous_zones_infrastructure::sync::HttpMasterClient;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

pub const TOKEN: &str = "s3cret-sync-token";

pub const PEER: &str = "10.1.2.3:40000";

pub struct TestNode {
    pub state: AppState,
    pub zones: Arc<SqliteZoneRepository>,
    pub slaves: Arc<SqliteSlaveRepository>,
    pub index: Arc<ZoneIndex>,
}

impl TestNode {
    pub fn app(&self) -> Router {
        create_app(self.state.clone())
    }
}

pub async fn create_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    for statement in [
        "CREATE TABLE zones (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            enabled INTEGER NOT NULL DEFAULT 1,
            ttl INTEGER NOT NULL DEFAULT 3600,
            ns TEXT NOT NULL,
            admin TEXT NOT NULL,
            serial INTEGER NOT NULL DEFAULT 1,
            refresh INTEGER NOT NULL DEFAULT 3600,
            retry INTEGER NOT NULL DEFAULT 600,
            expire INTEGER NOT NULL DEFAULT 604800,
            version INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE TABLE records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            zone_id INTEGER NOT NULL REFERENCES zones(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            value TEXT NOT NULL,
            ttl INTEGER NOT NULL DEFAULT 0,
            priority INTEGER
        )",
        "CREATE TABLE slave_nodes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            ip_address TEXT NOT NULL,
            port INTEGER NOT NULL,
            last_heartbeat_at INTEGER,
            connected INTEGER NOT NULL DEFAULT 0,
            synced_zone_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            UNIQUE (ip_address, port)
        )",
        "CREATE TABLE config (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    ] {
        sqlx::query(statement).execute(&pool).await.unwrap();
    }

    pool
}

pub async fn create_node(role: NodeRole) -> TestNode {
    let pool = create_test_db().await;
    let zones = Arc::new(SqliteZoneRepository::new(pool.clone()));
    let slaves = Arc::new(SqliteSlaveRepository::new(pool.clone()));
    let config = Arc::new(SqliteConfigRepository::new(pool));
    config.set_config(SYNC_TOKEN_KEY, TOKEN).await.unwrap();

    let index = Arc::new(ZoneIndex::new(zones.clone()));

    let slave_sync = if role.is_slave() {
        let master = HttpMasterClient::new("http://127.0.0.1:9", TOKEN, Duration::from_secs(1))
            .unwrap();
        let apply = Arc::new(ApplyZoneSyncUseCase::new(zones.clone(), index.clone()));
        Some(Arc::new(SlaveSyncService::new(
            Arc::new(master),
            apply,
            SlaveIdentity {
                name: "edge-1".to_string(),
                advertise_address: None,
                port: 8080,
            },
        )))
    } else {
        None
    };

    let state = AppState {
        role,
        validate_token: Arc::new(ValidateSyncTokenUseCase::new(config)),
        master: MasterUseCases {
            register: Arc::new(RegisterSlaveUseCase::new(slaves.clone())),
            heartbeat: Arc::new(HeartbeatUseCase::new(slaves.clone())),
            export: Arc::new(ExportZonesUseCase::new(zones.clone(), slaves.clone())),
        },
        slave_sync,
    };

    TestNode {
        state,
        zones,
        slaves,
        index,
    }
}

/// Request as it would arrive from `PEER`, optionally authenticated.
pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let mut request = builder.body(body).unwrap();
    let peer: SocketAddr = PEER.parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(peer));
    request
}

pub async fn json_body(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
