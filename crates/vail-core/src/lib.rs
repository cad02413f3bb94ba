//! Core types and trait definitions for the Vail stats tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the stat-code model, the projection schema built from the code catalog,
//! and the two pieces of logic with real invariants: reconciling a fresh
//! fetch into the latest-value store, and answering windowed range queries
//! over the historical log.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod error;
pub mod projection;
pub mod reconcile;
pub mod schema;
pub mod stat;
pub mod store;
pub mod timeseries;

pub use error::{Error, Result};
