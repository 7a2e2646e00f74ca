use crate::{errors::ApiError, state::AppState};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use ferrous_zones_domain::DomainError;

pub async fn require_master(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.role.is_master() {
        return Err(DomainError::NotMaster.into());
    }
    Ok(next.run(request).await)
}

pub async fn require_slave(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.role.is_slave() || state.slave_sync.is_none() {
        return Err(DomainError::NotSlave.into());
    }
    Ok(next.run(request).await)
}
