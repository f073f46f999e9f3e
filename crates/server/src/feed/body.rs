//! Tolerant decoding of the two response shapes the feed emits.

use serde_json::Value;

use super::FeedError;

/// Split a decoded feed body into raw order rows and stock rows.
///
/// Accepts either a bare array of order rows (older deployments) or an
/// object with `orders` and optional `stock` arrays.
///
/// # Errors
///
/// Returns [`FeedError::Shape`] for any other JSON shape - the row contents
/// themselves are never validated here, that is the normalizer's job.
pub fn split_body(value: Value) -> Result<(Vec<Value>, Vec<Value>), FeedError> {
    match value {
        Value::Array(rows) => Ok((rows, Vec::new())),
        Value::Object(mut map) => {
            let orders = match map.remove("orders") {
                Some(Value::Array(rows)) => rows,
                Some(_) => {
                    return Err(FeedError::Shape("\"orders\" is not an array".to_string()));
                }
                None => {
                    return Err(FeedError::Shape(
                        "object body is missing \"orders\"".to_string(),
                    ));
                }
            };
            let stock = match map.remove("stock") {
                Some(Value::Array(rows)) => rows,
                Some(_) => {
                    return Err(FeedError::Shape("\"stock\" is not an array".to_string()));
                }
                None => Vec::new(),
            };
            Ok((orders, stock))
        }
        other => Err(FeedError::Shape(format!(
            "expected array or object, got {}",
            json_kind(&other)
        ))),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
