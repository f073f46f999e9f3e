//! Feria Server library.
//!
//! Exposes the dashboard service as a library so the binary stays thin and
//! the router can be exercised in-process by the CLI and integration tests.
//!
//! # Architecture
//!
//! - Axum web framework, JSON-only surface
//! - One upstream dependency: the marketplace feed endpoint (Google Apps
//!   Script webapp returning order and stock rows)
//! - `moka` TTL cache in front of the feed, so at most one upstream fetch
//!   per revalidation interval regardless of request volume
//! - No database, no sessions: the pipeline is fully stateless and every
//!   response is rebuilt from the upstream source of truth

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod feed;
pub mod routes;
pub mod state;
