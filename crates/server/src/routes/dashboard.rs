//! The aggregate dashboard endpoint.

use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/dashboard` - the fully assembled aggregate object.
///
/// Successful responses advertise the configured revalidation interval via
/// `Cache-Control` so edge caches revalidate on the same cadence as the
/// server-side feed cache.
#[instrument(skip_all)]
pub async fn dashboard(State(state): State<AppState>) -> Result<Response, AppError> {
    let snapshot = state.feed().dashboard().await?;

    let cache_control = format!(
        "s-maxage={}, stale-while-revalidate",
        state.config().feed.revalidate.as_secs()
    );

    Ok(([(header::CACHE_CONTROL, cache_control)], Json(&*snapshot)).into_response())
}
