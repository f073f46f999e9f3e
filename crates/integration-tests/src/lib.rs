//! Shared helpers for Feria integration tests.
//!
//! Tests serve a stub upstream feed and the real dashboard router on
//! ephemeral loopback ports, then exercise the API over HTTP exactly as
//! the dashboard frontend would.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use secrecy::SecretString;

use feria_server::config::{FeedConfig, ServerConfig};
use feria_server::routes;
use feria_server::state::AppState;

/// Serve a router on an ephemeral loopback port and return its address.
///
/// The server task runs until the test process exits; tests are short-lived
/// so nothing is torn down explicitly.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("listener has an address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve test app");
    });

    addr
}

/// Build the real dashboard app pointed at the given upstream URL.
#[must_use]
pub fn dashboard_app(upstream_url: &str, revalidate: Duration) -> Router {
    let config = ServerConfig {
        host: "127.0.0.1".parse().expect("valid ip"),
        port: 0,
        feed: FeedConfig {
            url: SecretString::from(upstream_url),
            revalidate,
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
    };

    routes::app(AppState::new(config))
}
