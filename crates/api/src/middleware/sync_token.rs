use crate::{errors::ApiError, state::AppState};
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

/// Rejects the request unless it carries the node's sync token as a bearer
/// credential. Runs before any handler touches a repository.
pub async fn require_sync_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = bearer_token(request.headers());
    if let Err(e) = state.validate_token.execute(presented).await {
        warn!(path = %request.uri().path(), error = %e, "Sync request rejected");
        return Err(e.into());
    }
    Ok(next.run(request).await)
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim())
}
