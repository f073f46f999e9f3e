//! CLI command implementations.

pub mod coverage;
pub mod snapshot;

use std::sync::Arc;

use feria_server::config::ServerConfig;
use feria_server::feed::{FeedClient, FeedSnapshot};

/// Load configuration from the environment and fetch a fresh snapshot.
pub async fn fetch_snapshot() -> Result<Arc<FeedSnapshot>, Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    let client = FeedClient::new(&config.feed);

    tracing::info!("Fetching feed...");
    let snapshot = client.dashboard().await.map_err(|e| e.to_string())?;
    tracing::info!(
        orders = snapshot.dashboard.orders.len(),
        stock = snapshot.dashboard.stock_coverage.len(),
        "Snapshot ready"
    );

    Ok(snapshot)
}
