// Re-export helpers so tests can `use crate::helpers::*;`
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tsgate::{
    Gateway, GatewayError, SeriesStore, StoredRecord, StreamKind, ValuePoint, ValueProvider,
    Window,
};
use tsgate_mock::{DynamicMockController, DynamicMockProvider};
use tsgate_store::MemorySeriesStore;

/// Sensor used across tests.
pub const POWER: &str = "ActivePower";

/// 2025-02-17 01:`min`:00 UTC.
pub fn at(min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 17, 1, min, 0)
        .single()
        .expect("valid test instant")
}

/// 2025-02-17 01:`min`:`sec` UTC.
pub fn at_s(min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 17, 1, min, sec)
        .single()
        .expect("valid test instant")
}

pub fn pt(min: u32, value: f64) -> ValuePoint {
    ValuePoint::new(at(min), value)
}

pub fn rec(min: u32, real: Option<f64>, predicted: Option<f64>) -> StoredRecord {
    StoredRecord {
        series_id: POWER.to_string(),
        timestamp: at(min),
        real_value: real,
        predicted_value: predicted,
    }
}

/// Store wrapper that can be told to fail reads and/or writes.
pub struct FlakyStore {
    pub inner: MemorySeriesStore,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl FlakyStore {
    pub fn new(inner: MemorySeriesStore) -> Self {
        Self {
            inner,
            fail_reads: false,
            fail_writes: false,
        }
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }
}

#[async_trait]
impl SeriesStore for FlakyStore {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn read_range(
        &self,
        series_id: &str,
        window: &Window,
    ) -> Result<Vec<StoredRecord>, GatewayError> {
        if self.fail_reads {
            return Err(GatewayError::storage("connection refused"));
        }
        self.inner.read_range(series_id, window).await
    }

    async fn upsert_field(
        &self,
        series_id: &str,
        field: StreamKind,
        points: &[ValuePoint],
    ) -> Result<usize, GatewayError> {
        if self.fail_writes {
            return Err(GatewayError::storage("read-only transaction"));
        }
        self.inner.upsert_field(series_id, field, points).await
    }
}

/// A gateway over `store` with two dynamic mock providers.
pub struct Harness {
    pub gateway: Gateway,
    pub real: DynamicMockController,
    pub predicted: DynamicMockController,
}

pub fn harness(store: Arc<dyn SeriesStore>) -> Harness {
    harness_with(store, |b| b)
}

pub fn harness_with(
    store: Arc<dyn SeriesStore>,
    configure: impl FnOnce(tsgate::GatewayBuilder) -> tsgate::GatewayBuilder,
) -> Harness {
    let (real_p, real): (Arc<dyn ValueProvider>, _) =
        DynamicMockProvider::new_with_controller("digital-twin");
    let (pred_p, predicted): (Arc<dyn ValueProvider>, _) =
        DynamicMockProvider::new_with_controller("prediction-model");
    let gateway = configure(
        Gateway::builder()
            .with_store(store)
            .real_provider(real_p)
            .predicted_provider(pred_p),
    )
    .build()
    .expect("complete gateway");
    Harness {
        gateway,
        real,
        predicted,
    }
}
