//! Route definitions for the dashboard API.

mod dashboard;

use axum::http::StatusCode;
use axum::{Router, extract::State, routing::get};

use crate::state::AppState;

/// Build the full application router, health endpoints included.
///
/// Kept separate from `main` so integration tests can serve the exact same
/// router against a stub upstream.
#[must_use]
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/api/dashboard", get(dashboard::dashboard))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the upstream feed is reachable (through the snapshot cache, so
/// probes do not multiply upstream traffic). Returns 503 when the feed
/// cannot be fetched.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.feed().dashboard().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
