//! Unified error handling for the dashboard API.

use std::sync::Arc;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::config::ConfigError;
use crate::feed::FeedError;

/// Application-level error type for the dashboard API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Upstream feed fetch or decode failed. The `Arc` comes from the
    /// coalescing cache: one failed refresh is shared by every waiter.
    #[error("Feed error: {0}")]
    Feed(#[from] Arc<FeedError>),

    /// Configuration problem surfaced at request time.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // All variants are server-side faults worth tracking.
        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Dashboard request error"
        );

        let status = match &self {
            Self::Feed(_) => StatusCode::BAD_GATEWAY,
            Self::Config(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let error = match &self {
            Self::Feed(_) => "Error fetching data from the marketplace feed",
            Self::Config(_) => "Server configuration error",
            Self::Internal(_) => "Internal server error",
        };

        let body = Json(json!({
            "error": error,
            "details": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_error_maps_to_bad_gateway() {
        let err = AppError::Feed(Arc::new(FeedError::Shape("oops".to_string())));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_config_error_maps_to_internal() {
        let err = AppError::Config(ConfigError::MissingEnvVar("APPS_SCRIPT_URL".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_display_carries_details() {
        let err = AppError::Feed(Arc::new(FeedError::Status {
            status: 503,
            body: "maintenance".to_string(),
        }));
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("maintenance"));
    }
}
