//! The aggregation engine: every derived view the dashboard renders.
//!
//! [`build_dashboard`] is the single assembly point. The canonical order
//! list is fanned out, read-only, to each view builder; no view depends on
//! another view's output except stock coverage, which also reads the
//! normalized stock list. Everything is recomputed from scratch per call -
//! there is no incremental state anywhere in this crate.

pub mod breakdown;
pub mod compare;
pub mod geo;
pub mod heatmap;
pub mod series;
pub mod stock;
pub mod waterfall;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Order, StockItem};

use breakdown::{CategoryBucket, InstallmentBucket, ProductRank, SkuPerformanceRow};
use compare::{DayAlignedPoint, PeriodSummary};
use heatmap::HeatmapCell;
use series::{DailyPoint, MonthlyPoint};
use stock::{CoverageConfig, StockCoverageRow, StockSummary};
use waterfall::WaterfallStep;

/// All-time totals across the full order history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_revenue: f64,
    pub total_margin: f64,
    pub total_fees: f64,
    /// Shipping cost minus subsidies; negative means a net credit.
    pub total_shipping_net: f64,
    pub total_orders: u64,
    pub total_units: u64,
    pub avg_order_value: f64,
    pub avg_margin: f64,
    pub margin_pct: f64,
}

/// The fully assembled aggregate object returned to the presentation layer.
///
/// Field names serialize in camelCase to match what the dashboard consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// The canonical order list itself (the orders table renders it).
    pub orders: Vec<Order>,
    pub summary: Summary,
    pub revenue_by_day: Vec<DailyPoint>,
    pub revenue_by_month: Vec<MonthlyPoint>,
    pub revenue_current_month: Vec<DayAlignedPoint>,
    pub revenue_prev_month: Vec<DayAlignedPoint>,
    pub current_month: PeriodSummary,
    pub prev_month: PeriodSummary,
    pub top_products: Vec<ProductRank>,
    pub sku_performance: Vec<SkuPerformanceRow>,
    pub shipping_breakdown: Vec<CategoryBucket>,
    pub payment_breakdown: Vec<CategoryBucket>,
    pub installments_breakdown: Vec<InstallmentBucket>,
    pub heatmap: Vec<HeatmapCell>,
    pub waterfall: Vec<WaterfallStep>,
    pub region_breakdown: Vec<CategoryBucket>,
    pub stock_coverage: Vec<StockCoverageRow>,
    pub stock_summary: StockSummary,
}

/// Run the full aggregation over one batch.
///
/// `today` anchors the month comparison and the stock-coverage window;
/// injecting it keeps the whole pipeline a pure function of its inputs.
#[must_use]
pub fn build_dashboard(
    orders: Vec<Order>,
    stock: Vec<StockItem>,
    today: NaiveDate,
) -> DashboardSnapshot {
    let comparison = compare::month_comparison(&orders, today);
    let stock_coverage =
        stock::build_stock_coverage(&stock, &orders, today, &CoverageConfig::default());
    let stock_summary = stock::summarize_stock(&stock_coverage);

    DashboardSnapshot {
        summary: summarize(&orders),
        revenue_by_day: series::revenue_by_day(&orders),
        revenue_by_month: series::revenue_by_month(&orders),
        revenue_current_month: comparison.current_by_day,
        revenue_prev_month: comparison.previous_by_day,
        current_month: comparison.current,
        prev_month: comparison.previous,
        top_products: breakdown::top_products(&orders),
        sku_performance: breakdown::sku_performance(&orders),
        shipping_breakdown: breakdown::shipping_breakdown(&orders),
        payment_breakdown: breakdown::payment_breakdown(&orders),
        installments_breakdown: breakdown::installments_breakdown(&orders),
        heatmap: heatmap::build_heatmap(&orders),
        waterfall: waterfall::build_waterfall(&orders),
        region_breakdown: geo::region_breakdown(&orders),
        stock_coverage,
        stock_summary,
        orders,
    }
}

/// All-time totals with the usual zero-revenue / zero-order guards.
#[must_use]
#[allow(clippy::cast_precision_loss)] // order counts stay far below 2^52
pub fn summarize(orders: &[Order]) -> Summary {
    let mut summary = Summary::default();
    for order in orders {
        summary.total_revenue += order.item_total;
        summary.total_margin += order.realized_margin;
        summary.total_fees += order.platform_fee;
        summary.total_shipping_net += order.net_shipping();
        summary.total_orders += 1;
        summary.total_units += u64::from(order.quantity);
    }

    if summary.total_orders > 0 {
        summary.avg_order_value = summary.total_revenue / summary.total_orders as f64;
        summary.avg_margin = summary.total_margin / summary.total_orders as f64;
    }
    if summary.total_revenue > 0.0 {
        summary.margin_pct = summary.total_margin / summary.total_revenue * 100.0;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The three-order scenario exercised end to end: two January sales and
    /// one February sale, mixed payment methods and installment plans.
    fn fixture() -> Vec<Order> {
        vec![
            Order {
                order_id: "1".to_string(),
                date: "2024-01-05".parse().ok(),
                item_total: 1000.0,
                realized_margin: 200.0,
                platform_fee: 100.0,
                shipping_cost_seller: 50.0,
                shipping_subsidy: 0.0,
                payment_method: "visa".to_string(),
                installments: 1,
                quantity: 1,
                ..Order::default()
            },
            Order {
                order_id: "2".to_string(),
                date: "2024-01-05".parse().ok(),
                item_total: 500.0,
                realized_margin: -50.0,
                platform_fee: 50.0,
                shipping_cost_seller: 0.0,
                shipping_subsidy: 0.0,
                payment_method: "visa".to_string(),
                installments: 3,
                quantity: 1,
                ..Order::default()
            },
            Order {
                order_id: "3".to_string(),
                date: "2024-02-01".parse().ok(),
                item_total: 2000.0,
                realized_margin: 400.0,
                platform_fee: 200.0,
                shipping_cost_seller: 100.0,
                shipping_subsidy: 20.0,
                payment_method: "account_money".to_string(),
                installments: 1,
                quantity: 1,
                ..Order::default()
            },
        ]
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 10).expect("valid date")
    }

    #[test]
    fn test_end_to_end_scenario() {
        let snapshot = build_dashboard(fixture(), Vec::new(), today());

        // Daily series: exactly the two populated days.
        assert_eq!(snapshot.revenue_by_day.len(), 2);
        let jan5 = &snapshot.revenue_by_day[0];
        assert_eq!(jan5.date.to_string(), "2024-01-05");
        assert!((jan5.revenue - 1500.0).abs() < 1e-9);
        assert!((jan5.margin - 150.0).abs() < 1e-9);
        assert_eq!(jan5.orders, 2);
        let feb1 = &snapshot.revenue_by_day[1];
        assert!((feb1.revenue - 2000.0).abs() < 1e-9);
        assert!((feb1.margin - 400.0).abs() < 1e-9);
        assert_eq!(feb1.orders, 1);

        // Monthly series.
        assert_eq!(snapshot.revenue_by_month.len(), 2);
        assert_eq!(snapshot.revenue_by_month[0].month, "2024-01");
        assert!((snapshot.revenue_by_month[0].revenue - 1500.0).abs() < 1e-9);
        assert_eq!(snapshot.revenue_by_month[1].month, "2024-02");
        assert!((snapshot.revenue_by_month[1].revenue - 2000.0).abs() < 1e-9);

        // Installments: cash first, then the 3-installment plan.
        let labels: Vec<&str> = snapshot
            .installments_breakdown
            .iter()
            .map(|b| b.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Contado", "3 cuotas"]);
        assert_eq!(snapshot.installments_breakdown[0].count, 2);
        assert_eq!(snapshot.installments_breakdown[1].count, 1);

        // Waterfall head: gross revenue and fee deltas.
        assert!((snapshot.waterfall[0].value - 3500.0).abs() < 1e-9);
        assert!((snapshot.waterfall[1].value + 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_sparse_daily_vs_dense_comparison_on_same_data() {
        let snapshot = build_dashboard(fixture(), Vec::new(), today());

        // The daily series never fabricates zero-order days...
        assert!(snapshot.revenue_by_day.iter().all(|p| p.orders > 0));
        // ...while the comparison series has one entry per day 1..=10 even
        // though February only has one populated day.
        assert_eq!(snapshot.revenue_current_month.len(), 10);
        assert_eq!(
            snapshot
                .revenue_current_month
                .iter()
                .filter(|p| p.orders > 0)
                .count(),
            1
        );
        assert_eq!(snapshot.revenue_prev_month.len(), 10);
    }

    #[test]
    fn test_dashboard_is_idempotent() {
        let a = build_dashboard(fixture(), Vec::new(), today());
        let b = build_dashboard(fixture(), Vec::new(), today());

        let a_json = serde_json::to_string(&a).expect("serializable");
        let b_json = serde_json::to_string(&b).expect("serializable");
        assert_eq!(a_json, b_json);
    }

    #[test]
    fn test_empty_batch_yields_zero_state_views() {
        let snapshot = build_dashboard(Vec::new(), Vec::new(), today());

        assert!(snapshot.orders.is_empty());
        assert!(snapshot.revenue_by_day.is_empty());
        assert_eq!(snapshot.heatmap.len(), 168, "heatmap stays dense");
        assert_eq!(snapshot.waterfall.len(), 5);
        assert_eq!(snapshot.summary.total_orders, 0);
        assert!((snapshot.summary.margin_pct).abs() < f64::EPSILON);
        assert_eq!(snapshot.revenue_current_month.len(), 10);
    }

    #[test]
    fn test_summary_totals() {
        let summary = summarize(&fixture());

        assert!((summary.total_revenue - 3500.0).abs() < 1e-9);
        assert!((summary.total_margin - 550.0).abs() < 1e-9);
        assert!((summary.total_fees - 350.0).abs() < 1e-9);
        assert!((summary.total_shipping_net - 130.0).abs() < 1e-9);
        assert_eq!(summary.total_orders, 3);
        assert_eq!(summary.total_units, 3);
        assert!((summary.avg_order_value - 3500.0 / 3.0).abs() < 1e-9);
        assert!((summary.margin_pct - 550.0 / 3500.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_payment_breakdown_sum_conservation() {
        let snapshot = build_dashboard(fixture(), Vec::new(), today());

        let counts: u64 = snapshot.payment_breakdown.iter().map(|b| b.count).sum();
        let revenue: f64 = snapshot.payment_breakdown.iter().map(|b| b.revenue).sum();
        assert_eq!(counts, 3);
        assert!((revenue - 3500.0).abs() < 1e-9);
    }
}
