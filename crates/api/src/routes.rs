use crate::handlers;
use crate::middleware::{require_master, require_slave, require_sync_token};
use crate::state::AppState;
use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower_http::trace::TraceLayer;

/// Routes relative to `/api`. Role is checked before the token.
pub fn create_api_routes(state: AppState) -> Router {
    let master = handlers::sync::routes()
        .route_layer(from_fn_with_state(state.clone(), require_sync_token))
        .route_layer(from_fn_with_state(state.clone(), require_master));

    let slave = handlers::replication::routes()
        .route_layer(from_fn_with_state(state.clone(), require_sync_token))
        .route_layer(from_fn_with_state(state.clone(), require_slave));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(master)
        .merge(slave)
        .with_state(state)
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .nest("/api", create_api_routes(state))
        .layer(TraceLayer::new_for_http())
}
