//! Canonical inventory snapshot record.

use serde::{Deserialize, Serialize};

/// One listing from the inventory snapshot feed.
///
/// Joined against [`crate::types::Order`] history by `item_id` or `sku`
/// (either match is accepted; `item_id` is checked first).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    /// Marketplace listing id.
    pub item_id: String,
    /// Seller SKU; may be empty.
    pub sku: String,
    /// Listing title.
    pub title: String,
    /// Units currently available.
    pub available_stock: u32,
    /// Current listing price.
    pub price: f64,
    /// Listing status as reported by the marketplace.
    pub status: String,
}
