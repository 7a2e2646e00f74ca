use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::post,
    Router,
};
use ferrous_zones_domain::{DomainError, ZoneSyncPayload};
use tracing::info;

use crate::{dto::PushResponse, errors::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/replication/push", post(receive_push))
}

async fn receive_push(
    State(state): State<AppState>,
    body: Result<Json<ZoneSyncPayload>, JsonRejection>,
) -> Result<Json<PushResponse>, ApiError> {
    let sync = state.slave_sync.as_ref().ok_or(DomainError::NotSlave)?;
    let Json(payload) = body?;

    let report = sync.receive_push(&payload).await?;
    info!(
        zones = payload.zones.len(),
        applied = report.applied,
        deleted = report.deleted,
        "Push from master applied"
    );

    Ok(Json(PushResponse {
        status: "ok".to_string(),
        applied: report.applied,
        deleted: report.deleted,
    }))
}
