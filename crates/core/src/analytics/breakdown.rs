//! Categorical rollups: shipping, payment, installments, products, SKUs.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::types::{Order, payment_label};

/// Share of total count below which a payment category folds into "Otros".
pub const MINOR_SHARE: f64 = 0.04;

/// Maximum entries kept in the product ranking.
pub const TOP_PRODUCTS: usize = 10;

/// Grouping key length for products without a SKU.
const DERIVED_SKU_LEN: usize = 20;

/// One category with its count and accumulated revenue, in input encounter
/// order until a caller sorts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBucket {
    pub category: String,
    pub count: u64,
    pub revenue: f64,
}

/// Installment-plan bucket. `installments == 1` is cash ("Contado").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentBucket {
    pub label: String,
    pub installments: u32,
    pub count: u64,
}

/// One product in the revenue ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRank {
    pub name: String,
    pub sku: String,
    pub units: u64,
    pub revenue: f64,
    pub margin: f64,
}

/// Per-SKU financial performance row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuPerformanceRow {
    pub sku: String,
    pub name: String,
    pub units: u64,
    pub revenue: f64,
    pub fees: f64,
    pub shipping: f64,
    pub margin: f64,
    pub margin_pct: f64,
}

/// Group orders by an arbitrary key, accumulating count and revenue.
///
/// Buckets come back in first-encounter order, which makes every sort
/// applied on top of this stable with respect to the input.
pub fn breakdown_by<F>(orders: &[Order], key: F) -> Vec<CategoryBucket>
where
    F: Fn(&Order) -> String,
{
    let mut buckets: Vec<CategoryBucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for order in orders {
        let category = key(order);
        let slot = *index.entry(category.clone()).or_insert_with(|| {
            buckets.push(CategoryBucket {
                category,
                count: 0,
                revenue: 0.0,
            });
            buckets.len() - 1
        });
        if let Some(bucket) = buckets.get_mut(slot) {
            bucket.count += 1;
            bucket.revenue += order.item_total;
        }
    }

    buckets
}

/// Orders per classified shipping type, descending by count.
///
/// The "SIN ENVÍO" default from normalization shows up here as its own
/// bucket.
#[must_use]
pub fn shipping_breakdown(orders: &[Order]) -> Vec<CategoryBucket> {
    let mut buckets = breakdown_by(orders, |o| o.shipping_type.clone());
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets
}

/// Orders per payment method label, with long-tail folding.
///
/// Categories below [`MINOR_SHARE`] of total count merge into a synthetic
/// "Otros" bucket (summed, not dropped). The result is sorted ascending by
/// count because the consuming chart draws smallest-first toward the
/// emphasized largest bar.
#[must_use]
#[allow(clippy::cast_precision_loss)] // order counts stay far below 2^52
pub fn payment_breakdown(orders: &[Order]) -> Vec<CategoryBucket> {
    let buckets = breakdown_by(orders, |o| payment_label(&o.payment_method).to_string());
    let total: u64 = buckets.iter().map(|b| b.count).sum();
    if total == 0 {
        return Vec::new();
    }

    let threshold = total as f64 * MINOR_SHARE;
    let mut majors: Vec<CategoryBucket> = Vec::new();
    let mut other = CategoryBucket {
        category: "Otros".to_string(),
        count: 0,
        revenue: 0.0,
    };

    for bucket in buckets {
        if (bucket.count as f64) < threshold {
            other.count += bucket.count;
            other.revenue += bucket.revenue;
        } else {
            majors.push(bucket);
        }
    }
    if other.count > 0 {
        majors.push(other);
    }

    majors.sort_by(|a, b| a.count.cmp(&b.count));
    majors
}

/// Orders per installment plan: cash first, then ascending plan size.
///
/// Numeric ordering matters here - sorted as labels, "10 cuotas" would come
/// before "2 cuotas".
#[must_use]
pub fn installments_breakdown(orders: &[Order]) -> Vec<InstallmentBucket> {
    let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
    for order in orders {
        *counts.entry(order.installments).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(installments, count)| InstallmentBucket {
            label: installment_label(installments),
            installments,
            count,
        })
        .collect()
}

/// Display label for an installment count.
#[must_use]
pub fn installment_label(installments: u32) -> String {
    if installments == 1 {
        "Contado".to_string()
    } else {
        format!("{installments} cuotas")
    }
}

/// Top products by revenue, descending, truncated to [`TOP_PRODUCTS`].
///
/// Ties keep input encounter order. Pre-filter the slice (e.g. with
/// [`super::heatmap::filter_by_month`]) for the month-scoped variant.
#[must_use]
pub fn top_products(orders: &[Order]) -> Vec<ProductRank> {
    let mut ranks: Vec<ProductRank> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for order in orders {
        let name = if order.product.is_empty() {
            "Sin título".to_string()
        } else {
            order.product.clone()
        };
        let slot = *index.entry(name.clone()).or_insert_with(|| {
            ranks.push(ProductRank {
                name,
                sku: order.sku.clone(),
                units: 0,
                revenue: 0.0,
                margin: 0.0,
            });
            ranks.len() - 1
        });
        if let Some(rank) = ranks.get_mut(slot) {
            rank.units += u64::from(order.quantity);
            rank.revenue += order.item_total;
            rank.margin += order.realized_margin;
        }
    }

    ranks.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    ranks.truncate(TOP_PRODUCTS);
    ranks
}

/// Per-SKU rollup with the full financial breakdown, descending by revenue.
///
/// Orders without a SKU group under a key derived from the product title so
/// distinct unlisted products do not collapse into one bucket.
#[must_use]
pub fn sku_performance(orders: &[Order]) -> Vec<SkuPerformanceRow> {
    let mut rows: Vec<SkuPerformanceRow> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for order in orders {
        let sku = sku_key(order);
        let slot = *index.entry(sku.clone()).or_insert_with(|| {
            rows.push(SkuPerformanceRow {
                sku,
                name: order.product.clone(),
                units: 0,
                revenue: 0.0,
                fees: 0.0,
                shipping: 0.0,
                margin: 0.0,
                margin_pct: 0.0,
            });
            rows.len() - 1
        });
        if let Some(row) = rows.get_mut(slot) {
            row.units += u64::from(order.quantity);
            row.revenue += order.item_total;
            row.fees += order.platform_fee;
            row.shipping += order.net_shipping();
            row.margin += order.realized_margin;
        }
    }

    for row in &mut rows {
        row.margin_pct = if row.revenue > 0.0 {
            row.margin / row.revenue * 100.0
        } else {
            0.0
        };
    }

    rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    rows
}

/// Grouping key for SKU rollups: the SKU itself, or a truncated product
/// title when the listing has none.
fn sku_key(order: &Order) -> String {
    if order.sku.is_empty() {
        order.product.chars().take(DERIVED_SKU_LEN).collect()
    } else {
        order.sku.clone()
    }
}
