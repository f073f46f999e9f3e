//! Canonical record types for the aggregation engine.

mod order;
mod stock;

pub use order::{NO_SHIPPING, Order, payment_label};
pub use stock::StockItem;
