//! Calendar-bucketed revenue series.
//!
//! Both series are sparse: only dates (or months) that actually have orders
//! appear. The dense, day-aligned series used for month-over-month overlays
//! live in [`super::compare`].

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::Order;

/// Aggregate for one calendar day with at least one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub revenue: f64,
    pub margin: f64,
    pub orders: u64,
}

/// Aggregate for one calendar month with at least one order.
///
/// The key is `YYYY-MM` with a zero-padded month so plain string ordering
/// matches chronological ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    pub month: String,
    pub revenue: f64,
    pub margin: f64,
    pub orders: u64,
}

#[derive(Default)]
struct Accumulator {
    revenue: f64,
    margin: f64,
    orders: u64,
}

impl Accumulator {
    fn push(&mut self, order: &Order) {
        self.revenue += order.item_total;
        self.margin += order.realized_margin;
        self.orders += 1;
    }
}

/// Group orders by calendar date, ascending. Rows without a parseable date
/// are excluded entirely - they do not count toward any bucket.
#[must_use]
pub fn revenue_by_day(orders: &[Order]) -> Vec<DailyPoint> {
    let mut buckets: BTreeMap<NaiveDate, Accumulator> = BTreeMap::new();
    for order in orders {
        let Some(date) = order.date else { continue };
        buckets.entry(date).or_default().push(order);
    }

    buckets
        .into_iter()
        .map(|(date, acc)| DailyPoint {
            date,
            revenue: acc.revenue,
            margin: acc.margin,
            orders: acc.orders,
        })
        .collect()
}

/// Group orders by calendar year-month, ascending.
#[must_use]
pub fn revenue_by_month(orders: &[Order]) -> Vec<MonthlyPoint> {
    let mut buckets: BTreeMap<String, Accumulator> = BTreeMap::new();
    for order in orders {
        let Some(date) = order.date else { continue };
        let key = month_key(date);
        buckets.entry(key).or_default().push(order);
    }

    buckets
        .into_iter()
        .map(|(month, acc)| MonthlyPoint {
            month,
            revenue: acc.revenue,
            margin: acc.margin,
            orders: acc.orders,
        })
        .collect()
}

/// Lexicographically sortable `YYYY-MM` key for a date.
#[must_use]
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}
