//! Feria Core - Canonical types and the aggregation engine.
//!
//! This crate turns raw marketplace feed rows into the derived analytical
//! views consumed by the dashboard:
//! - [`normalize`] - best-effort coercion of loosely-typed feed rows into
//!   canonical [`types::Order`] / [`types::StockItem`] records
//! - [`analytics`] - pure transformations producing daily/monthly series,
//!   category breakdowns, period comparisons, the day×hour heatmap, the
//!   financial waterfall, stock coverage, and per-region rollups
//!
//! # Architecture
//!
//! The core crate contains only types and pure computation - no I/O, no
//! HTTP clients, no clock reads. Every view is rebuilt from scratch on each
//! call, and anything date-relative takes an explicit `today` parameter so
//! callers (and tests) control the reference point.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod normalize;
pub mod types;

pub use analytics::DashboardSnapshot;
pub use types::{Order, StockItem};
