use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        ConnectInfo, Query, State,
    },
    response::Json,
    routing::{get, post},
    Router,
};
use ferrous_zones_domain::{RegisterSlaveRequest, RegisterSlaveResponse, ZoneSyncPayload};
use std::net::SocketAddr;
use tracing::{debug, instrument};

use crate::{
    dto::{SlaveQuery, StatusResponse, ZonesQuery},
    errors::ApiError,
    state::AppState,
};

/// Master-only endpoints; the caller layers role and token checks on top.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sync/register", post(register))
        .route("/sync/heartbeat", post(heartbeat))
        .route("/sync/zones", get(zones))
}

#[instrument(skip(state, body))]
async fn register(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    body: Result<Json<RegisterSlaveRequest>, JsonRejection>,
) -> Result<Json<RegisterSlaveResponse>, ApiError> {
    let Json(req) = body?;
    let slave = state
        .master
        .register
        .execute(req.name, req.ip_address, req.port, peer.ip())
        .await?;

    Ok(Json(RegisterSlaveResponse {
        message: format!("Slave '{}' registered", slave.name),
        slave_id: slave.id.unwrap_or_default(),
    }))
}

async fn heartbeat(
    State(state): State<AppState>,
    query: Result<Query<SlaveQuery>, QueryRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Query(q) = query?;
    state.master.heartbeat.execute(q.slave_id).await?;
    Ok(Json(StatusResponse::ok()))
}

async fn zones(
    State(state): State<AppState>,
    query: Result<Query<ZonesQuery>, QueryRejection>,
) -> Result<Json<ZoneSyncPayload>, ApiError> {
    let Query(q) = query?;
    let payload = state
        .master
        .export
        .execute(q.slave_id, q.since_version)
        .await?;
    debug!(
        slave_id = q.slave_id,
        since_version = q.since_version,
        zones = payload.zones.len(),
        "Serving zone pull"
    );
    Ok(Json(payload))
}
