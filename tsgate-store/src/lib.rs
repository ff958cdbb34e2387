//! tsgate-store
//!
//! Series store backends implementing [`tsgate_core::SeriesStore`].
//!
//! - [`MemorySeriesStore`]: process-local store for tests, demos and
//!   single-node deployments without a database.
//! - `PgSeriesStore` (feature `postgres`): PostgreSQL/TimescaleDB backend
//!   built on `sqlx`, keyed by `(series_id, timestamp)`.
//!
//! Both backends implement the field-selective upsert: writing one stream
//! inserts a record with the sibling field unset, or updates only the named
//! column of an existing record. There is no code path that writes an explicit
//! null into the sibling column.
#![warn(missing_docs)]

use std::collections::BTreeMap;

use tsgate_core::{DateTime, Utc, ValuePoint, truncate_to_minute};

mod memory;
#[cfg(feature = "postgres")]
mod postgres;

pub use memory::MemorySeriesStore;
#[cfg(feature = "postgres")]
pub use postgres::{DEFAULT_TABLE, PgSeriesStore};

/// Truncate to the minute and collapse duplicates, keeping the last value.
///
/// A single write batch must not touch the same key twice; Postgres rejects
/// that inside one `ON CONFLICT DO UPDATE` statement.
pub(crate) fn collapse_minutes(points: &[ValuePoint]) -> Vec<(DateTime<Utc>, f64)> {
    let mut by_minute = BTreeMap::new();
    for p in points {
        by_minute.insert(truncate_to_minute(&p.timestamp), p.value);
    }
    by_minute.into_iter().collect()
}
