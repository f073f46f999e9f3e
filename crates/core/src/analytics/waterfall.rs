//! Sequential financial breakdown from gross revenue to realized margin.

use serde::{Deserialize, Serialize};

use crate::types::Order;

/// One bar of the financial waterfall.
///
/// Delta steps carry the stacked-bar encoding the chart needs: `base` is
/// the invisible spacer under the visible bar and `bar` its magnitude. The
/// final margin step is a standalone full-height bar from 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallStep {
    pub label: String,
    /// Signed contribution of this step.
    pub value: f64,
    /// Bottom of the visible bar.
    pub base: f64,
    /// Height of the visible bar.
    pub bar: f64,
    /// Running total after this step.
    pub cumulative: f64,
    /// True only for the final margin step.
    pub is_total: bool,
}

/// Compute the five waterfall steps over a (possibly pre-filtered) slice.
///
/// Step order is fixed: gross revenue, minus platform fees, minus shipping
/// cost, plus shipping subsidy, then the realized margin. The margin step
/// restates the independently-summed `realized_margin` - it is NOT forced
/// to equal the sum of the preceding deltas, which can include cost
/// categories the waterfall does not model.
#[must_use]
pub fn build_waterfall(orders: &[Order]) -> Vec<WaterfallStep> {
    let gross: f64 = orders.iter().map(|o| o.item_total).sum();
    let fees: f64 = orders.iter().map(|o| o.platform_fee).sum();
    let shipping: f64 = orders.iter().map(|o| o.shipping_cost_seller).sum();
    let subsidy: f64 = orders.iter().map(|o| o.shipping_subsidy).sum();
    let margin: f64 = orders.iter().map(|o| o.realized_margin).sum();

    let mut steps = Vec::with_capacity(5);
    let mut running = 0.0;

    for (label, value) in [
        ("Ingresos brutos", gross),
        ("Comisiones ML", -fees),
        ("Costo envíos", -shipping),
        ("Bonificación envíos", subsidy),
    ] {
        let base = if value < 0.0 { running + value } else { running };
        running += value;
        steps.push(WaterfallStep {
            label: label.to_string(),
            value,
            base,
            bar: value.abs(),
            cumulative: running,
            is_total: false,
        });
    }

    steps.push(WaterfallStep {
        label: "Margen real".to_string(),
        value: margin,
        base: 0.0,
        bar: margin,
        cumulative: margin,
        is_total: true,
    });

    steps
}
