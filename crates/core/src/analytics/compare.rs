//! Month-over-month comparison against the same partial period.
//!
//! Comparing a running month against a *complete* previous month always
//! shows a misleading decline, so the previous window is cut at the same
//! day-of-month as `today`. The reference date is injected - nothing in
//! this module reads the clock.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::Order;

/// KPI set for one comparison window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub revenue: f64,
    pub margin: f64,
    pub fees: f64,
    /// Shipping cost net of subsidies; can be negative.
    pub shipping_net: f64,
    pub orders: u64,
    pub units: u64,
    /// Margin as a percentage of revenue; 0 when revenue is 0.
    pub margin_pct: f64,
    pub avg_margin: f64,
    pub avg_order_value: f64,
}

/// One day-of-month cell in a dense comparison series.
///
/// Unlike the sparse daily series, every day from 1 to the reference day is
/// present (zero-valued when there were no orders) so two windows overlay
/// on a shared day axis without misalignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAlignedPoint {
    pub day: u32,
    pub revenue: f64,
    pub margin: f64,
    pub orders: u64,
}

/// Current month vs the comparable slice of the previous month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthComparison {
    pub current: PeriodSummary,
    pub previous: PeriodSummary,
    pub current_by_day: Vec<DayAlignedPoint>,
    pub previous_by_day: Vec<DayAlignedPoint>,
}

/// Build the month-over-month comparison relative to `today`.
#[must_use]
pub fn month_comparison(orders: &[Order], today: NaiveDate) -> MonthComparison {
    let day_limit = today.day();
    let (prev_year, prev_month) = previous_month(today);

    let current: Vec<&Order> = orders
        .iter()
        .filter(|o| {
            o.date
                .is_some_and(|d| d.year() == today.year() && d.month() == today.month())
        })
        .collect();

    // Only the comparable slice: same day-of-month cutoff as today.
    let previous: Vec<&Order> = orders
        .iter()
        .filter(|o| {
            o.date.is_some_and(|d| {
                d.year() == prev_year && d.month() == prev_month && d.day() <= day_limit
            })
        })
        .collect();

    MonthComparison {
        current: summarize(&current),
        previous: summarize(&previous),
        current_by_day: day_aligned(&current, day_limit),
        previous_by_day: day_aligned(&previous, day_limit),
    }
}

/// Relative change in percent; `None` (not 0) when there is no previous
/// value to compare against, so callers can suppress the trend indicator
/// instead of showing a misleading 0%.
#[must_use]
pub fn pct_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        None
    } else {
        Some((current - previous) / previous * 100.0)
    }
}

fn previous_month(today: NaiveDate) -> (i32, u32) {
    let first_of_month = today.with_day(1).unwrap_or(today);
    let prev = first_of_month
        .checked_sub_months(Months::new(1))
        .unwrap_or(first_of_month);
    (prev.year(), prev.month())
}

#[allow(clippy::cast_precision_loss)] // order counts stay far below 2^52
fn summarize(orders: &[&Order]) -> PeriodSummary {
    let mut summary = PeriodSummary::default();
    for order in orders {
        summary.revenue += order.item_total;
        summary.margin += order.realized_margin;
        summary.fees += order.platform_fee;
        summary.shipping_net += order.net_shipping();
        summary.orders += 1;
        summary.units += u64::from(order.quantity);
    }

    if summary.revenue > 0.0 {
        summary.margin_pct = summary.margin / summary.revenue * 100.0;
    }
    if summary.orders > 0 {
        summary.avg_margin = summary.margin / summary.orders as f64;
        summary.avg_order_value = summary.revenue / summary.orders as f64;
    }
    summary
}

fn day_aligned(orders: &[&Order], day_limit: u32) -> Vec<DayAlignedPoint> {
    let mut series: Vec<DayAlignedPoint> = (1..=day_limit)
        .map(|day| DayAlignedPoint {
            day,
            revenue: 0.0,
            margin: 0.0,
            orders: 0,
        })
        .collect();

    for order in orders {
        let Some(date) = order.date else { continue };
        let day = date.day();
        if day == 0 || day > day_limit {
            continue;
        }
        if let Some(point) = series.get_mut(day as usize - 1) {
            point.revenue += order.item_total;
            point.margin += order.realized_margin;
            point.orders += 1;
        }
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(date: &str, revenue: f64, margin: f64) -> Order {
        Order {
            date: date.parse().ok(),
            item_total: revenue,
            realized_margin: margin,
            quantity: 1,
            ..Order::default()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 10).expect("valid date")
    }

    #[test]
    fn test_previous_window_cuts_at_same_day_of_month() {
        let orders = vec![
            order("2024-02-05", 1000.0, 100.0),
            order("2024-01-08", 500.0, 50.0),
            // Past the day-10 cutoff: not comparable, must be excluded.
            order("2024-01-25", 9999.0, 999.0),
        ];

        let cmp = month_comparison(&orders, today());
        assert!((cmp.current.revenue - 1000.0).abs() < 1e-9);
        assert!((cmp.previous.revenue - 500.0).abs() < 1e-9);
        assert_eq!(cmp.previous.orders, 1);
    }

    #[test]
    fn test_day_aligned_series_is_dense() {
        let orders = vec![order("2024-02-05", 1000.0, 100.0)];
        let cmp = month_comparison(&orders, today());

        assert_eq!(cmp.current_by_day.len(), 10);
        assert_eq!(cmp.previous_by_day.len(), 10);
        // Days without orders are present as zero entries, not omitted.
        assert_eq!(cmp.current_by_day[0].orders, 0);
        assert_eq!(cmp.current_by_day[4].orders, 1);
        assert!((cmp.current_by_day[4].revenue - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_previous_month_wraps_january() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");
        assert_eq!(previous_month(jan), (2023, 12));
    }

    #[test]
    fn test_summary_ratios_and_zero_guards() {
        let orders = vec![
            order("2024-02-05", 1000.0, 100.0),
            order("2024-02-06", 1000.0, 300.0),
        ];
        let cmp = month_comparison(&orders, today());

        assert!((cmp.current.margin_pct - 20.0).abs() < 1e-9);
        assert!((cmp.current.avg_order_value - 1000.0).abs() < 1e-9);
        assert!((cmp.current.avg_margin - 200.0).abs() < 1e-9);

        // Empty previous window: every ratio stays 0 instead of NaN.
        assert!((cmp.previous.margin_pct).abs() < f64::EPSILON);
        assert!((cmp.previous.avg_order_value).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pct_change_none_for_zero_previous() {
        assert_eq!(pct_change(100.0, 0.0), None);
        let change = pct_change(150.0, 100.0).expect("previous is non-zero");
        assert!((change - 50.0).abs() < 1e-9);
        let negative = pct_change(50.0, 100.0).expect("previous is non-zero");
        assert!((negative + 50.0).abs() < 1e-9);
    }
}
