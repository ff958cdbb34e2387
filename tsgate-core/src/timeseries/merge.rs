use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{CombinedPoint, StoredRecord, StreamKind, ValuePoint, Window, truncate_to_minute};

/// Request-scoped view of a series, keyed by minute.
pub type PointIndex = BTreeMap<DateTime<Utc>, CombinedPoint>;

/// Build an index from stored records.
///
/// Timestamps are truncated to the minute. If two records land on the same
/// minute their fields are combined; a present value is never replaced by an
/// absent one.
#[must_use]
pub fn index_records<I>(records: I) -> PointIndex
where
    I: IntoIterator<Item = StoredRecord>,
{
    let mut index = PointIndex::new();
    for r in records {
        let ts = truncate_to_minute(&r.timestamp);
        let entry = index.entry(ts).or_insert_with(|| CombinedPoint::empty(ts));
        if let Some(v) = r.real_value {
            entry.set(StreamKind::Real, v);
        }
        if let Some(v) = r.predicted_value {
            entry.set(StreamKind::Predicted, v);
        }
    }
    index
}

/// Write one stream's values into the index.
///
/// Only `stream`'s field is touched: a point already carrying the sibling
/// value keeps it, and a minute with no entry gets one with the sibling
/// absent. Returns the number of points applied.
pub fn apply_stream(index: &mut PointIndex, stream: StreamKind, points: &[ValuePoint]) -> usize {
    for p in points {
        let ts = truncate_to_minute(&p.timestamp);
        index
            .entry(ts)
            .or_insert_with(|| CombinedPoint::empty(ts))
            .set(stream, p.value);
    }
    points.len()
}

/// Prepare provider output for merging and persistence.
///
/// Truncates timestamps to the minute, drops points outside `window`, and
/// collapses duplicates within a minute (the last one wins). The result is
/// sorted ascending.
#[must_use]
pub fn normalize_points(points: Vec<ValuePoint>, window: &Window) -> Vec<ValuePoint> {
    #[cfg(feature = "tracing")]
    let received = points.len();
    let mut by_minute: BTreeMap<DateTime<Utc>, f64> = BTreeMap::new();
    for p in points {
        let ts = truncate_to_minute(&p.timestamp);
        if window.contains(ts) {
            by_minute.insert(ts, p.value);
        }
    }
    #[cfg(feature = "tracing")]
    {
        if by_minute.len() != received {
            tracing::debug!(
                received,
                kept = by_minute.len(),
                "dropped out-of-window or duplicate points"
            );
        }
    }
    by_minute
        .into_iter()
        .map(|(ts, v)| ValuePoint::new(ts, v))
        .collect()
}

/// Walk the expected grid in order and emit one point per minute.
///
/// Minutes with no entry are emitted with both values absent; entries outside
/// the grid are not emitted.
#[must_use]
pub fn fill_grid(index: &PointIndex, expected: &[DateTime<Utc>]) -> Vec<CombinedPoint> {
    expected
        .iter()
        .map(|ts| {
            index
                .get(ts)
                .copied()
                .unwrap_or_else(|| CombinedPoint::empty(*ts))
        })
        .collect()
}
