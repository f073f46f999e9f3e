//! Free-text delivery locations mapped onto canonical administrative names.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::types::Order;

use super::breakdown::{CategoryBucket, breakdown_by};

/// The 19 departments of Uruguay, as the map layer names them.
pub const DEPARTMENTS: &[&str] = &[
    "Artigas",
    "Canelones",
    "Cerro Largo",
    "Colonia",
    "Durazno",
    "Flores",
    "Florida",
    "Lavalleja",
    "Maldonado",
    "Montevideo",
    "Paysandú",
    "Río Negro",
    "Rivera",
    "Rocha",
    "Salto",
    "San José",
    "Soriano",
    "Tacuarembó",
    "Treinta y Tres",
];

/// Fold a location string into its matching key: accents stripped (NFD,
/// combining marks removed), lowercased, whitespace runs collapsed.
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    let stripped: String = raw.nfd().filter(|c| !is_combining_mark(*c)).collect();
    stripped
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map a free-text department string to its canonical name.
///
/// Unmapped strings pass through unchanged, so downstream breakdowns may
/// show canonical and raw-text variants side by side - accepted, not an
/// error.
#[must_use]
pub fn normalize_department(raw: &str) -> String {
    let key = normalize_key(raw);
    if key.is_empty() {
        return String::new();
    }
    DEPARTMENTS
        .iter()
        .find(|dept| normalize_key(dept) == key)
        .map_or_else(|| raw.to_string(), |dept| (*dept).to_string())
}

/// Match a free-text sub-region (e.g. a neighborhood) against a canonical
/// name set.
///
/// Exact normalized equality is accepted, and so is substring containment
/// in either direction - short names can mismatch, which is a known
/// trade-off of the lookup.
#[must_use]
pub fn match_subregion(raw: &str, canonical: &[String]) -> Option<String> {
    let key = normalize_key(raw);
    if key.is_empty() {
        return None;
    }

    canonical
        .iter()
        .find(|name| {
            let name_key = normalize_key(name);
            name_key == key || name_key.contains(&key) || key.contains(&name_key)
        })
        .cloned()
}

/// Deliveries per normalized department, descending by count.
///
/// Orders without a delivery region are skipped entirely.
#[must_use]
pub fn region_breakdown(orders: &[Order]) -> Vec<CategoryBucket> {
    let located: Vec<Order> = orders
        .iter()
        .filter(|o| !o.delivery_region.trim().is_empty())
        .cloned()
        .collect();

    let mut buckets = breakdown_by(&located, |o| normalize_department(&o.delivery_region));
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets
}
