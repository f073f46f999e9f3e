//! Stock coverage: sales velocity and days-of-stock per listing.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{Order, StockItem};

/// Tunables for the coverage calculation. The defaults match the dashboard
/// (90-day trailing window, 15-day reorder alert, 30-day watch band).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageConfig {
    /// Trailing order-history window, in days.
    pub window_days: i64,
    /// Coverage below this many days means "reorder now".
    pub alert_days: u32,
    /// Coverage below this many days (but above the alert band) bears
    /// watching.
    pub watch_days: u32,
    /// Sentinel for "stock but no recent sales" - displayed as ∞.
    pub infinite_coverage: u32,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            window_days: 90,
            alert_days: 15,
            watch_days: 30,
            infinite_coverage: 999,
        }
    }
}

/// Coverage classification for one listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoverageStatus {
    OutOfStock,
    Reorder,
    Watch,
    Healthy,
}

/// One listing with its computed velocity and coverage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockCoverageRow {
    pub item_id: String,
    pub sku: String,
    pub title: String,
    pub current_stock: u32,
    pub price: f64,
    /// Listing status as reported by the marketplace (distinct from the
    /// coverage classification below).
    pub listing_status: String,
    /// Calendar days inside the window with at least one matching sale.
    pub distinct_sale_days: u64,
    pub units_sold: u64,
    /// Units per active sales day. Dividing by distinct sale days rather
    /// than window days avoids understating velocity for items with
    /// intermittent demand or partial stockouts.
    pub daily_velocity: f64,
    /// Estimated days the current stock lasts; `infinite_coverage` when
    /// there is stock but no recent sales, 0 when there is no stock.
    pub days_of_coverage: u32,
    pub stock_value: f64,
    pub status: CoverageStatus,
}

/// Headline figures over the computed coverage rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub total_skus: u64,
    pub reorder_count: u64,
    pub out_of_stock: u64,
    pub stock_value: f64,
}

/// Sort order for the coverage table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockSortKey {
    /// Days of coverage, ascending - most urgent first.
    Coverage,
    /// Current stock, descending.
    Stock,
    /// Daily velocity, descending.
    Velocity,
    /// Title, ascending.
    Name,
}

/// Status bucket filter for the coverage table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatusFilter {
    All,
    /// Reorder band only (has stock, coverage under the alert threshold).
    Alert,
    OutOfStock,
    /// Everything at or above the alert threshold.
    Ok,
}

/// Cross-reference the inventory snapshot against the trailing order window.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn build_stock_coverage(
    stock: &[StockItem],
    orders: &[Order],
    today: NaiveDate,
    config: &CoverageConfig,
) -> Vec<StockCoverageRow> {
    let cutoff = today - Duration::days(config.window_days);

    stock
        .iter()
        .map(|item| {
            let matching: Vec<(&Order, NaiveDate)> = orders
                .iter()
                .filter_map(|o| o.date.map(|d| (o, d)))
                .filter(|(o, d)| *d >= cutoff && matches_item(o, item))
                .collect();

            let sale_days: HashSet<NaiveDate> = matching.iter().map(|(_, d)| *d).collect();
            let distinct_sale_days = sale_days.len() as u64;
            let units_sold: u64 = matching.iter().map(|(o, _)| u64::from(o.quantity)).sum();

            #[allow(clippy::cast_precision_loss)] // unit counts stay far below 2^52
            let daily_velocity = if distinct_sale_days > 0 {
                units_sold as f64 / distinct_sale_days as f64
            } else {
                0.0
            };

            let days_of_coverage = if daily_velocity > 0.0 {
                (f64::from(item.available_stock) / daily_velocity).round() as u32
            } else if item.available_stock > 0 {
                config.infinite_coverage
            } else {
                0
            };

            let status = if item.available_stock == 0 {
                CoverageStatus::OutOfStock
            } else if days_of_coverage < config.alert_days {
                CoverageStatus::Reorder
            } else if days_of_coverage < config.watch_days {
                CoverageStatus::Watch
            } else {
                CoverageStatus::Healthy
            };

            StockCoverageRow {
                item_id: item.item_id.clone(),
                sku: item.sku.clone(),
                title: item.title.clone(),
                current_stock: item.available_stock,
                price: item.price,
                listing_status: item.status.clone(),
                distinct_sale_days,
                units_sold,
                daily_velocity,
                days_of_coverage,
                stock_value: f64::from(item.available_stock) * item.price,
                status,
            }
        })
        .collect()
}

/// Match an order against a stock item by listing id or SKU.
///
/// Empty identifiers never match - an order with no SKU must not join to a
/// stock row that also has none.
fn matches_item(order: &Order, item: &StockItem) -> bool {
    (!item.item_id.is_empty() && order.item_id == item.item_id)
        || (!item.sku.is_empty() && order.sku == item.sku)
}

/// Headline figures for the coverage rows.
#[must_use]
pub fn summarize_stock(rows: &[StockCoverageRow]) -> StockSummary {
    StockSummary {
        total_skus: rows.len() as u64,
        reorder_count: rows
            .iter()
            .filter(|r| r.status == CoverageStatus::Reorder)
            .count() as u64,
        out_of_stock: rows
            .iter()
            .filter(|r| r.status == CoverageStatus::OutOfStock)
            .count() as u64,
        stock_value: rows.iter().map(|r| r.stock_value).sum(),
    }
}

/// Pure list filter over computed rows: text search on title/SKU plus a
/// status bucket. No recomputation happens here.
#[must_use]
pub fn filter_rows(
    rows: &[StockCoverageRow],
    query: &str,
    status: StockStatusFilter,
) -> Vec<StockCoverageRow> {
    let query = query.to_lowercase();

    rows.iter()
        .filter(|row| {
            query.is_empty()
                || row.title.to_lowercase().contains(&query)
                || row.sku.to_lowercase().contains(&query)
        })
        .filter(|row| match status {
            StockStatusFilter::All => true,
            StockStatusFilter::Alert => row.status == CoverageStatus::Reorder,
            StockStatusFilter::OutOfStock => row.status == CoverageStatus::OutOfStock,
            StockStatusFilter::Ok => {
                matches!(row.status, CoverageStatus::Watch | CoverageStatus::Healthy)
            }
        })
        .cloned()
        .collect()
}

/// Sort coverage rows in place.
pub fn sort_rows(rows: &mut [StockCoverageRow], key: StockSortKey) {
    match key {
        StockSortKey::Coverage => rows.sort_by_key(|r| r.days_of_coverage),
        StockSortKey::Stock => rows.sort_by(|a, b| b.current_stock.cmp(&a.current_stock)),
        StockSortKey::Velocity => {
            rows.sort_by(|a, b| b.daily_velocity.total_cmp(&a.daily_velocity));
        }
        StockSortKey::Name => rows.sort_by(|a, b| a.title.cmp(&b.title)),
    }
}
