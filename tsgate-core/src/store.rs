use async_trait::async_trait;

use crate::{GatewayError, StoredRecord, StreamKind, ValuePoint, Window};

/// Persistent minute-granularity store keyed by `(series_id, timestamp)`.
///
/// The store exclusively owns persisted records. Records are created the first
/// time either stream is written for a key, mutated in place when the other
/// stream arrives, and never deleted.
#[async_trait]
pub trait SeriesStore: Send + Sync {
    /// A stable identifier used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Read every record of `series_id` inside `window` (inclusive on both
    /// ends), sorted by timestamp ascending.
    ///
    /// # Errors
    /// Returns `GatewayError::Storage` on connectivity or query failures.
    async fn read_range(
        &self,
        series_id: &str,
        window: &Window,
    ) -> Result<Vec<StoredRecord>, GatewayError>;

    /// Write one stream's values without touching the other stream.
    ///
    /// For each point: insert a record with only `field` set when the key is
    /// new, otherwise update only `field`. Timestamps are truncated to the
    /// minute. An empty slice is a no-op. Returns the number of points
    /// written.
    ///
    /// # Errors
    /// Returns `GatewayError::Storage` on connectivity or constraint failures.
    async fn upsert_field(
        &self,
        series_id: &str,
        field: StreamKind,
        points: &[ValuePoint],
    ) -> Result<usize, GatewayError>;
}
