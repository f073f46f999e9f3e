//! Best-effort coercion of raw feed rows into canonical records.
//!
//! The upstream feed keys rows by human-readable column names and is loose
//! about typing (numbers arrive as strings, cells go missing, dates come in
//! several shapes). The policy here is best-effort coercion: every field
//! falls back to its documented default and a malformed row never fails the
//! batch.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use crate::types::{NO_SHIPPING, Order, StockItem};

/// Convert raw order rows into canonical [`Order`] records.
///
/// One-to-one and order-preserving: the output has the same length as the
/// input. Rows that are not JSON objects normalize to an all-defaults
/// record.
#[must_use]
pub fn normalize_orders(rows: &[Value]) -> Vec<Order> {
    rows.iter().map(normalize_order).collect()
}

/// Convert raw stock rows into canonical [`StockItem`] records.
#[must_use]
pub fn normalize_stock(rows: &[Value]) -> Vec<StockItem> {
    rows.iter().map(normalize_stock_item).collect()
}

fn normalize_order(row: &Value) -> Order {
    let empty = Map::new();
    let row = row.as_object().unwrap_or(&empty);

    Order {
        order_id: string_field(row, "Order ID"),
        date: date_field(row, "Fecha"),
        time: string_field(row, "Hora"),
        product: string_field(row, "Producto"),
        sku: string_field(row, "SKU"),
        item_id: string_field(row, "Item ID ML"),
        quantity: count_field(row, "Cantidad"),
        unit_price: number_field(row, "Precio Unitario"),
        item_total: number_field(row, "Total Item"),
        platform_fee: number_field(row, "Comisión Total ML"),
        net_without_shipping: number_field(row, "Neto Sin Envío"),
        logistic_mode: string_field(row, "Logistic Mode"),
        logistic_type: string_field(row, "Logistic Type (API)"),
        shipping_type: match string_field(row, "Tipo Envío (Clasificado)") {
            s if s.is_empty() => NO_SHIPPING.to_string(),
            s => s,
        },
        shipment_id: string_field(row, "Shipment ID"),
        shipping_cost_seller: number_field(row, "Shipping Cost Seller"),
        shipping_subsidy: number_field(row, "Bonificación Envío"),
        realized_margin: number_field(row, "Margen Real Final"),
        payment_method: string_field(row, "Medio de Pago"),
        installments: count_field(row, "Cuotas"),
        order_status: string_field(row, "Estado"),
        shipment_status: string_field(row, "Estado Envío"),
        buyer: string_field(row, "Buyer"),
        delivery_city: string_field(row, "Ciudad Entrega"),
        delivery_region: string_field(row, "Departamento Entrega"),
    }
}

fn normalize_stock_item(row: &Value) -> StockItem {
    let empty = Map::new();
    let row = row.as_object().unwrap_or(&empty);

    StockItem {
        item_id: string_field(row, "Item ID ML"),
        sku: string_field(row, "SKU"),
        title: string_field(row, "Título"),
        available_stock: units_field(row, "Stock Disponible"),
        price: number_field(row, "Precio"),
        status: string_field(row, "Estado"),
    }
}

/// Coerce a cell to a string. Absent, null, and structured values become
/// the empty string; scalar numbers and booleans are rendered.
fn string_field(row: &Map<String, Value>, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Coerce a cell to a finite number, defaulting to `0.0`.
fn number_field(row: &Map<String, Value>, key: &str) -> f64 {
    coerce_number(row.get(key)).unwrap_or(0.0)
}

/// Coerce a cell to a count that is always >= 1.
///
/// The feed writes 0 for "unknown" here, so values below 1 fall back to 1
/// alongside missing and non-numeric cells.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count_field(row: &Map<String, Value>, key: &str) -> u32 {
    match coerce_number(row.get(key)) {
        Some(n) if n >= 1.0 => n as u32,
        _ => 1,
    }
}

/// Coerce a cell to a unit count that is always >= 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn units_field(row: &Map<String, Value>, key: &str) -> u32 {
    match coerce_number(row.get(key)) {
        Some(n) if n >= 0.0 => n as u32,
        _ => 0,
    }
}

/// Numeric coercion shared by the field helpers.
///
/// JSON numbers pass through; strings are trimmed and parsed. Anything
/// non-finite is rejected so `NaN` never propagates into aggregates.
fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn date_field(row: &Map<String, Value>, key: &str) -> Option<NaiveDate> {
    match row.get(key) {
        Some(Value::String(s)) => parse_feed_date(s),
        _ => None,
    }
}

/// Parse the date shapes the feed is known to emit.
///
/// Tried in order: plain ISO date, RFC 3339 timestamp, bare timestamp
/// without offset, and the spreadsheet-style `dd/mm/yyyy`.
#[must_use]
pub fn parse_feed_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()).ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .map(|dt| dt.date())
                .ok()
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .map(|dt| dt.date())
                .ok()
        })
        .or_else(|| NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_full_row() {
        let rows = vec![json!({
            "Order ID": "2000001",
            "Fecha": "2024-01-05",
            "Hora": "14:23:00",
            "Producto": "Termo acero 1L",
            "SKU": "TRM-001",
            "Item ID ML": "MLU123",
            "Cantidad": 2,
            "Precio Unitario": 750.0,
            "Total Item": 1500.0,
            "Comisión Total ML": 150.0,
            "Neto Sin Envío": 1350.0,
            "Tipo Envío (Clasificado)": "FLEX",
            "Shipping Cost Seller": 120.0,
            "Bonificación Envío": 40.0,
            "Margen Real Final": 380.0,
            "Medio de Pago": "visa",
            "Cuotas": 3,
            "Estado": "paid",
            "Departamento Entrega": "Montevideo",
        })];

        let orders = normalize_orders(&rows);
        assert_eq!(orders.len(), 1);
        let order = &orders[0];
        assert_eq!(order.order_id, "2000001");
        assert_eq!(order.date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(order.quantity, 2);
        assert!((order.item_total - 1500.0).abs() < f64::EPSILON);
        assert_eq!(order.installments, 3);
        assert_eq!(order.shipping_type, "FLEX");
        assert_eq!(order.delivery_region, "Montevideo");
    }

    #[test]
    fn test_normalize_applies_defaults_per_field() {
        let orders = normalize_orders(&[json!({
            "Order ID": "1",
            "Cantidad": "not a number",
            "Total Item": null,
            "Cuotas": 0,
        })]);

        let order = &orders[0];
        assert_eq!(order.quantity, 1, "invalid quantity falls back to 1");
        assert_eq!(order.installments, 1, "zero installments falls back to 1");
        assert!((order.item_total).abs() < f64::EPSILON);
        assert!(order.date.is_none());
        assert_eq!(order.shipping_type, NO_SHIPPING);
    }

    #[test]
    fn test_normalize_numeric_strings_and_scalars() {
        let orders = normalize_orders(&[json!({
            "Total Item": " 1234.5 ",
            "Cantidad": "4",
            "Order ID": 987,
        })]);

        let order = &orders[0];
        assert!((order.item_total - 1234.5).abs() < f64::EPSILON);
        assert_eq!(order.quantity, 4);
        assert_eq!(order.order_id, "987");
    }

    #[test]
    fn test_normalize_rejects_nan_strings() {
        let orders = normalize_orders(&[json!({"Total Item": "NaN"})]);
        assert!((orders[0].item_total).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_non_object_row_yields_defaults() {
        let orders = normalize_orders(&[json!("garbage"), json!(42)]);
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0], Order {
            shipping_type: NO_SHIPPING.to_string(),
            ..Order::default()
        });
    }

    #[test]
    fn test_parse_feed_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(parse_feed_date("2024-03-09"), expected);
        assert_eq!(parse_feed_date("2024-03-09T15:04:05Z"), expected);
        assert_eq!(parse_feed_date("2024-03-09T15:04:05"), expected);
        assert_eq!(parse_feed_date("2024-03-09 15:04:05"), expected);
        assert_eq!(parse_feed_date("09/03/2024"), expected);
        assert_eq!(parse_feed_date("not a date"), None);
        assert_eq!(parse_feed_date(""), None);
    }

    #[test]
    fn test_normalize_stock_row() {
        let stock = normalize_stock(&[json!({
            "Item ID ML": "MLU123",
            "SKU": "TRM-001",
            "Título": "Termo acero 1L",
            "Stock Disponible": 37,
            "Precio": 990.0,
            "Estado": "active",
        })]);

        assert_eq!(stock[0].item_id, "MLU123");
        assert_eq!(stock[0].available_stock, 37);
        assert!((stock[0].price - 990.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_stock_negative_stock_clamps_to_zero() {
        let stock = normalize_stock(&[json!({"Stock Disponible": -3})]);
        assert_eq!(stock[0].available_stock, 0);
    }
}
