//! Upstream feed client: fetch, normalize, aggregate, cache.
//!
//! The feed is a single endpoint returning either a bare JSON array of
//! order rows or an object `{"orders": [...], "stock": [...]}`. Responses
//! are aggregated once and cached with a TTL equal to the configured
//! revalidation interval, so at most one upstream call is in flight per
//! interval; concurrent requests coalesce onto the same refresh.

mod body;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local, Utc};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use feria_core::analytics::{DashboardSnapshot, build_dashboard};
use feria_core::normalize::{normalize_orders, normalize_stock};

use crate::config::FeedConfig;

pub use body::split_body;

/// How much of an upstream error body to keep in error messages.
const ERROR_BODY_PREVIEW: usize = 200;

/// Errors that can occur when talking to the upstream feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed (network, DNS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream returned a non-success status.
    #[error("Feed returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response body was JSON of an unexpected shape.
    #[error("Unexpected feed shape: {0}")]
    Shape(String),
}

/// One aggregated snapshot plus refresh metadata.
///
/// `generation` increases strictly with every completed refresh; a consumer
/// holding two snapshots can always tell which one is newer regardless of
/// response arrival order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    pub generation: u64,
    pub refreshed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub dashboard: DashboardSnapshot,
}

/// Client for the upstream feed endpoint.
///
/// Cheaply cloneable; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct FeedClient {
    inner: Arc<FeedClientInner>,
}

struct FeedClientInner {
    client: reqwest::Client,
    url: SecretString,
    cache: Cache<(), Arc<FeedSnapshot>>,
    generation: AtomicU64,
}

impl FeedClient {
    /// Create a new feed client with a TTL cache sized for one entry.
    #[must_use]
    pub fn new(config: &FeedConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.revalidate)
            .build();

        Self {
            inner: Arc::new(FeedClientInner {
                client: reqwest::Client::new(),
                url: config.url.clone(),
                cache,
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Get the current dashboard snapshot, refreshing from upstream if the
    /// cached one has expired.
    ///
    /// # Errors
    ///
    /// Returns the refresh error when the upstream fetch or decode fails.
    /// Errors are not cached: the next call retries.
    pub async fn dashboard(&self) -> Result<Arc<FeedSnapshot>, Arc<FeedError>> {
        self.inner
            .cache
            .try_get_with((), self.refresh())
            .await
    }

    /// Fetch the feed and run the full aggregation.
    #[instrument(skip(self))]
    async fn refresh(&self) -> Result<Arc<FeedSnapshot>, FeedError> {
        let response = self
            .inner
            .client
            .get(self.inner.url.expose_secret())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                body: text.chars().take(ERROR_BODY_PREVIEW).collect(),
            });
        }

        let value: serde_json::Value = serde_json::from_str(&text)?;
        let (order_rows, stock_rows) = split_body(value)?;

        let orders = normalize_orders(&order_rows);
        let stock = normalize_stock(&stock_rows);
        tracing::info!(
            orders = orders.len(),
            stock = stock.len(),
            "Feed fetched and normalized"
        );

        let today = Local::now().date_naive();
        let dashboard = build_dashboard(orders, stock, today);

        // Strictly increasing: a stale in-flight refresh can never be
        // mistaken for a newer one by snapshot consumers.
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        Ok(Arc::new(FeedSnapshot {
            generation,
            refreshed_at: Utc::now(),
            dashboard,
        }))
    }
}
