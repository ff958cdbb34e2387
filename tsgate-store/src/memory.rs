use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tsgate_core::{
    DateTime, GatewayError, SeriesStore, StoredRecord, StreamKind, Utc, ValuePoint, Window,
    truncate_to_minute,
};

use crate::collapse_minutes;

type Series = BTreeMap<DateTime<Utc>, StoredRecord>;

/// In-memory series store.
///
/// Records are kept per series in a `BTreeMap` ordered by minute, so range
/// reads come back sorted without an extra pass.
#[derive(Debug, Default)]
pub struct MemorySeriesStore {
    inner: RwLock<HashMap<String, Series>>,
}

impl MemorySeriesStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `records`.
    ///
    /// Later records for the same key replace earlier ones wholesale; this is
    /// a seeding helper, not the upsert path.
    #[must_use]
    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = StoredRecord>,
    {
        let mut map: HashMap<String, Series> = HashMap::new();
        for mut r in records {
            r.timestamp = truncate_to_minute(&r.timestamp);
            map.entry(r.series_id.clone())
                .or_default()
                .insert(r.timestamp, r);
        }
        Self {
            inner: RwLock::new(map),
        }
    }

    /// Every stored record of `series_id`, ascending.
    pub async fn records(&self, series_id: &str) -> Vec<StoredRecord> {
        let guard = self.inner.read().await;
        guard
            .get(series_id)
            .map(|s| s.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Total number of stored records across all series.
    pub async fn len(&self) -> usize {
        self.inner.read().await.values().map(BTreeMap::len).sum()
    }

    /// True when nothing has been stored yet.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SeriesStore for MemorySeriesStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn read_range(
        &self,
        series_id: &str,
        window: &Window,
    ) -> Result<Vec<StoredRecord>, GatewayError> {
        let guard = self.inner.read().await;
        Ok(guard
            .get(series_id)
            .map(|s| {
                s.range(window.start()..=window.end())
                    .map(|(_, r)| r.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn upsert_field(
        &self,
        series_id: &str,
        field: StreamKind,
        points: &[ValuePoint],
    ) -> Result<usize, GatewayError> {
        if points.is_empty() {
            return Ok(0);
        }
        let rows = collapse_minutes(points);
        let mut guard = self.inner.write().await;
        let series = guard.entry(series_id.to_string()).or_default();
        for (ts, value) in &rows {
            let rec = series.entry(*ts).or_insert_with(|| StoredRecord {
                series_id: series_id.to_string(),
                timestamp: *ts,
                real_value: None,
                predicted_value: None,
            });
            match field {
                StreamKind::Real => rec.real_value = Some(*value),
                StreamKind::Predicted => rec.predicted_value = Some(*value),
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(series_id, field = %field, written = rows.len(), "memory upsert");
        Ok(rows.len())
    }
}
