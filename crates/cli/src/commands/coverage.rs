//! `feria coverage` - stock coverage table in the terminal.

use std::io::Write;

use feria_core::analytics::stock::{
    CoverageConfig, CoverageStatus, StockCoverageRow, StockSortKey, StockStatusFilter, filter_rows,
    sort_rows,
};

/// Fetch the snapshot and print the (filtered, sorted) coverage table.
pub async fn run(
    search: &str,
    filter: StockStatusFilter,
    sort: StockSortKey,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = super::fetch_snapshot().await?;

    let mut rows = filter_rows(&snapshot.dashboard.stock_coverage, search, filter);
    sort_rows(&mut rows, sort);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    writeln!(
        out,
        "{:<14} {:<38} {:>6} {:>9} {:>8} {:>10}  {}",
        "SKU", "Product", "Stock", "Vel/day", "Units", "Coverage", "Status"
    )?;
    for row in &rows {
        writeln!(
            out,
            "{:<14} {:<38} {:>6} {:>9} {:>8} {:>10}  {}",
            clip(&row.sku, 14),
            clip(&row.title, 38),
            row.current_stock,
            format_velocity(row.daily_velocity),
            row.units_sold,
            format_coverage(row),
            status_label(row.status),
        )?;
    }
    writeln!(
        out,
        "{} of {} listings",
        rows.len(),
        snapshot.dashboard.stock_coverage.len()
    )?;

    Ok(())
}

fn clip(value: &str, max: usize) -> String {
    if value.chars().count() > max {
        let truncated: String = value.chars().take(max.saturating_sub(1)).collect();
        format!("{truncated}…")
    } else {
        value.to_string()
    }
}

fn format_velocity(velocity: f64) -> String {
    if velocity > 0.0 {
        format!("{velocity:.2}")
    } else {
        "—".to_string()
    }
}

fn format_coverage(row: &StockCoverageRow) -> String {
    let infinite = CoverageConfig::default().infinite_coverage;
    match row.status {
        CoverageStatus::OutOfStock => "0d".to_string(),
        _ if row.days_of_coverage == infinite => "∞".to_string(),
        _ => format!("{}d", row.days_of_coverage),
    }
}

const fn status_label(status: CoverageStatus) -> &'static str {
    match status {
        CoverageStatus::OutOfStock => "OUT OF STOCK",
        CoverageStatus::Reorder => "REORDER",
        CoverageStatus::Watch => "WATCH",
        CoverageStatus::Healthy => "OK",
    }
}
