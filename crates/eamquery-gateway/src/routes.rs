//! Route definitions for the gateway.

use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Create the gateway router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/healthz", get(handlers::healthz))
        .route("/run", post(handlers::run_query))
        .route("/csv", post(handlers::run_query_csv))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
