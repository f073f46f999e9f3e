//! Canonical order record and feed-level dictionaries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Classified-shipping sentinel used when the feed carries no value.
///
/// This is a real category in the feed data ("Tipo Envío (Clasificado)"),
/// so the default must surface as its own bucket in breakdowns rather than
/// being dropped.
pub const NO_SHIPPING: &str = "SIN ENVÍO";

/// One sold line item with its full financial breakdown.
///
/// Produced by [`crate::normalize::normalize_orders`]; immutable once
/// constructed. All monetary fields are in the account currency and default
/// to `0.0` when the source value was missing or failed coercion - `NaN`
/// never enters the aggregation pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Marketplace order id. Unique within a batch, not across re-fetches.
    pub order_id: String,
    /// Calendar date of the sale. `None` when the feed value was
    /// unparseable; such rows are kept but excluded from date-bucketed
    /// views.
    pub date: Option<NaiveDate>,
    /// Raw time-of-day string, only used for hour bucketing.
    pub time: String,
    /// Product display title.
    pub product: String,
    /// Seller SKU; may be empty for unlisted products.
    pub sku: String,
    /// Marketplace listing id, used for the stock join.
    pub item_id: String,
    /// Units sold on this line, always >= 1.
    pub quantity: u32,
    pub unit_price: f64,
    /// Gross revenue for the line.
    pub item_total: f64,
    /// Marketplace commission charged on the line.
    pub platform_fee: f64,
    /// Revenue net of fees, before shipping.
    pub net_without_shipping: f64,
    pub logistic_mode: String,
    pub logistic_type: String,
    /// Classified fulfillment channel; defaults to [`NO_SHIPPING`].
    pub shipping_type: String,
    pub shipment_id: String,
    /// Shipping cost charged to the seller.
    pub shipping_cost_seller: f64,
    /// Shipping rebate granted to the seller. Net shipping cost is
    /// `shipping_cost_seller - shipping_subsidy` and may be negative.
    pub shipping_subsidy: f64,
    /// Realized profit after fees and shipping; signed.
    pub realized_margin: f64,
    /// Raw payment-method code; display label via [`payment_label`].
    pub payment_method: String,
    /// Number of installments; 1 means full/cash payment.
    pub installments: u32,
    pub order_status: String,
    pub shipment_status: String,
    pub buyer: String,
    pub delivery_city: String,
    pub delivery_region: String,
}

impl Order {
    /// Net shipping cost to the seller after subsidies.
    ///
    /// Negative when the subsidy exceeds the cost (a net credit) - the
    /// sign is preserved, never clamped.
    #[must_use]
    pub fn net_shipping(&self) -> f64 {
        self.shipping_cost_seller - self.shipping_subsidy
    }
}

/// Payment method codes the marketplace emits, mapped to display labels.
const PAYMENT_LABELS: &[(&str, &str)] = &[
    ("account_money", "Cuenta ML"),
    ("visa", "Visa"),
    ("master", "Mastercard"),
    ("oca", "OCA"),
    ("debvisa", "Débito Visa"),
    ("debmaster", "Débito Master"),
    ("abitab", "Abitab"),
    ("redpagos", "Redpagos"),
    ("amex", "Amex"),
];

/// Map a raw payment-method code to its display label.
///
/// Unrecognized codes pass through unchanged so new methods still show up
/// in breakdowns instead of being lost.
#[must_use]
pub fn payment_label(code: &str) -> &str {
    PAYMENT_LABELS
        .iter()
        .find(|(raw, _)| *raw == code)
        .map_or(code, |(_, label)| label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_label_known_codes() {
        assert_eq!(payment_label("account_money"), "Cuenta ML");
        assert_eq!(payment_label("visa"), "Visa");
        assert_eq!(payment_label("redpagos"), "Redpagos");
    }

    #[test]
    fn test_payment_label_unknown_code_passes_through() {
        assert_eq!(payment_label("pix"), "pix");
        assert_eq!(payment_label(""), "");
    }

    #[test]
    fn test_net_shipping_preserves_credit_sign() {
        let order = Order {
            shipping_cost_seller: 100.0,
            shipping_subsidy: 150.0,
            ..Order::default()
        };
        assert!((order.net_shipping() - (-50.0)).abs() < f64::EPSILON);
    }
}
