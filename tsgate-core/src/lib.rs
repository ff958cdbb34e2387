//! tsgate-core
//!
//! Core types, traits, and utilities shared across the tsgate ecosystem.
//!
//! - `types`: re-exported data model (points, records, windows, errors).
//! - `provider`: the `ValueProvider` trait implemented by upstream clients.
//! - `store`: the `SeriesStore` trait implemented by persistence backends.
//! - `timeseries`: the minute grid, gap analysis, and in-memory merge helpers.
//!
//! Everything in `timeseries` is pure and synchronous; the traits are async and
//! assume a Tokio 1.x runtime in their implementations.
#![warn(missing_docs)]

/// Upstream value provider trait.
pub mod provider;
/// Persistent series store trait.
pub mod store;
/// Minute grid, gap analysis, and merge helpers.
pub mod timeseries;
pub mod types;

pub use provider::ValueProvider;
pub use store::SeriesStore;
pub use timeseries::gaps::{Gaps, find_gaps, find_gaps_in};
pub use timeseries::grid::{expected_timestamps, grid_len, window_timestamps};
pub use timeseries::merge::{PointIndex, apply_stream, fill_grid, index_records, normalize_points};
pub use types::*;
