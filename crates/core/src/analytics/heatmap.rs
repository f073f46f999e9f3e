//! Day-of-week × hour-of-day activity grid.

use chrono::{DateTime, Datelike, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::types::Order;

/// Days in the grid (Sunday = 0, matching the dashboard's row order).
pub const GRID_DAYS: u32 = 7;
/// Hours in the grid.
pub const GRID_HOURS: u32 = 24;

/// One cell of the dense 7×24 grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    /// Day of week, 0 = Sunday through 6 = Saturday.
    pub day: u32,
    /// Hour of day, 0-23.
    pub hour: u32,
    pub count: u64,
    pub revenue: f64,
}

/// Bucket orders into the dense 7×24 grid.
///
/// All 168 cells are always present (zero-valued when empty), ordered
/// day-major. Rows without a parseable date cannot be placed on a weekday
/// and are skipped. Scope the grid by filtering the slice first, e.g. with
/// [`filter_by_month`] - the grid itself takes no filter parameters.
#[must_use]
pub fn build_heatmap(orders: &[Order]) -> Vec<HeatmapCell> {
    let mut cells: Vec<HeatmapCell> = (0..GRID_DAYS)
        .flat_map(|day| {
            (0..GRID_HOURS).map(move |hour| HeatmapCell {
                day,
                hour,
                count: 0,
                revenue: 0.0,
            })
        })
        .collect();

    for order in orders {
        let Some(date) = order.date else { continue };
        let day = date.weekday().num_days_from_sunday();
        let hour = parse_hour(&order.time);
        if let Some(cell) = cells.get_mut((day * GRID_HOURS + hour) as usize) {
            cell.count += 1;
            cell.revenue += order.item_total;
        }
    }

    cells
}

/// Extract the hour from the feed's time field.
///
/// The field is encoded either as a full timestamp or as an `HH:MM:SS`
/// style string, so timestamp interpretations are tried first, then the
/// leading integer of the string; anything else buckets into hour 0.
#[must_use]
pub fn parse_hour(raw: &str) -> u32 {
    let raw = raw.trim();

    let from_timestamp = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.hour())
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .map(|dt| dt.hour())
                .ok()
        })
        .or_else(|| NaiveTime::parse_from_str(raw, "%H:%M:%S").map(|t| t.hour()).ok());

    from_timestamp
        .or_else(|| {
            let digits: String = raw.chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<u32>().ok()
        })
        .filter(|hour| *hour < GRID_HOURS)
        .unwrap_or(0)
}

/// Orders whose date falls in the given calendar year and month.
#[must_use]
pub fn filter_by_month(orders: &[Order], year: i32, month: u32) -> Vec<Order> {
    orders
        .iter()
        .filter(|o| o.date.is_some_and(|d| d.year() == year && d.month() == month))
        .cloned()
        .collect()
}

/// Orders whose date falls in the given calendar year.
#[must_use]
pub fn filter_by_year(orders: &[Order], year: i32) -> Vec<Order> {
    orders
        .iter()
        .filter(|o| o.date.is_some_and(|d| d.year() == year))
        .cloned()
        .collect()
}

/// Distinct `YYYY-MM` keys present in the data, newest first.
///
/// Drives the month picker for the scoped product/heatmap views.
#[must_use]
pub fn available_months(orders: &[Order]) -> Vec<String> {
    let mut months: Vec<String> = orders
        .iter()
        .filter_map(|o| o.date)
        .map(super::series::month_key)
        .collect();
    months.sort_unstable();
    months.dedup();
    months.reverse();
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(date: &str, time: &str, revenue: f64) -> Order {
        Order {
            date: date.parse().ok(),
            time: time.to_string(),
            item_total: revenue,
            ..Order::default()
        }
    }

    #[test]
    fn test_grid_is_always_168_cells() {
        let empty = build_heatmap(&[]);
        assert_eq!(empty.len(), 168);
        assert!(empty.iter().all(|c| c.count == 0 && c.revenue.abs() < f64::EPSILON));

        let grid = build_heatmap(&[order("2024-01-05", "14:23:00", 100.0)]);
        assert_eq!(grid.len(), 168);
    }

    #[test]
    fn test_orders_land_in_the_right_cell() {
        // 2024-01-05 is a Friday (day 5 counting from Sunday).
        let grid = build_heatmap(&[order("2024-01-05", "14:23:00", 100.0)]);
        let cell = grid
            .iter()
            .find(|c| c.day == 5 && c.hour == 14)
            .expect("cell exists");
        assert_eq!(cell.count, 1);
        assert!((cell.revenue - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rows_without_date_are_skipped() {
        let grid = build_heatmap(&[order("bad", "14:00:00", 100.0)]);
        assert!(grid.iter().all(|c| c.count == 0));
    }

    #[test]
    fn test_parse_hour_timestamp_first_then_leading_integer() {
        assert_eq!(parse_hour("2024-01-05T09:30:00Z"), 9);
        assert_eq!(parse_hour("2024-01-05T09:30:00"), 9);
        assert_eq!(parse_hour("14:23:00"), 14);
        assert_eq!(parse_hour("14:23"), 14);
        assert_eq!(parse_hour("7"), 7);
        assert_eq!(parse_hour(""), 0);
        assert_eq!(parse_hour("mediodía"), 0);
        assert_eq!(parse_hour("99:00:00"), 0, "out-of-range hour defaults to 0");
    }

    #[test]
    fn test_filter_by_month_and_year() {
        let orders = vec![
            order("2024-01-05", "", 1.0),
            order("2024-02-01", "", 1.0),
            order("2023-01-10", "", 1.0),
        ];

        assert_eq!(filter_by_month(&orders, 2024, 1).len(), 1);
        assert_eq!(filter_by_year(&orders, 2024).len(), 2);
    }

    #[test]
    fn test_available_months_newest_first() {
        let orders = vec![
            order("2024-01-05", "", 1.0),
            order("2024-03-01", "", 1.0),
            order("2024-01-20", "", 1.0),
        ];
        assert_eq!(available_months(&orders), vec!["2024-03", "2024-01"]);
    }
}
