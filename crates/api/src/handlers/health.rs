use axum::{extract::State, Json};
use tracing::instrument;

use crate::{dto::HealthResponse, state::AppState};

#[instrument(skip_all)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        role: state.role.as_str().to_string(),
    })
}
