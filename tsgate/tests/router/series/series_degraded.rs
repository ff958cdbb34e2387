use std::sync::Arc;

use tsgate::{FailureStage, GatewayError, StreamKind};
use tsgate_mock::MockBehavior;
use tsgate_store::MemorySeriesStore;

use crate::helpers::{FlakyStore, POWER, at, harness, pt, rec};

#[tokio::test]
async fn everything_down_still_yields_a_null_grid() {
    let store = FlakyStore::new(MemorySeriesStore::new()).failing_reads();
    let h = harness(Arc::new(store));
    h.real
        .set_fallback(MockBehavior::Fail(GatewayError::connection("digital-twin", "dns")))
        .await;
    h.predicted
        .set_fallback(MockBehavior::Fail(GatewayError::upstream_status(
            "prediction-model",
            503,
            "model not loaded",
        )))
        .await;

    let report = h.gateway.series(POWER, at(0), at(4)).await.unwrap();

    assert_eq!(report.points.len(), 5);
    assert!(
        report
            .points
            .iter()
            .all(|p| p.real_value.is_none() && p.predicted_value.is_none())
    );
    let stages: Vec<_> = report.warnings.iter().map(|w| (w.stage, w.stream)).collect();
    assert_eq!(
        stages,
        vec![
            (FailureStage::Load, None),
            (FailureStage::Fetch, Some(StreamKind::Real)),
            (FailureStage::Fetch, Some(StreamKind::Predicted)),
        ]
    );
    assert!(report.message.contains("load failed: storage failure"));
}

#[tokio::test]
async fn unreadable_store_falls_back_to_fetching_everything() {
    let store = FlakyStore::new(MemorySeriesStore::with_records(vec![rec(
        0,
        Some(1.0),
        Some(1.0),
    )]))
    .failing_reads();
    let h = harness(Arc::new(store));

    h.gateway.series(POWER, at(0), at(1)).await.unwrap();

    assert_eq!(h.real.call_count().await, 1);
    assert_eq!(h.predicted.call_count().await, 1);
}

#[tokio::test]
async fn failed_write_back_still_serves_fetched_values() {
    let store = Arc::new(FlakyStore::new(MemorySeriesStore::new()).failing_writes());
    let h = harness(store.clone());
    h.real
        .set_behavior(POWER, MockBehavior::Return(vec![pt(0, 9.0), pt(1, 8.0)]))
        .await;

    let report = h.gateway.series(POWER, at(0), at(1)).await.unwrap();

    assert_eq!(report.points[0].real_value, Some(9.0));
    assert_eq!(report.points[1].real_value, Some(8.0));
    let persist: Vec<_> = report
        .warnings
        .iter()
        .filter(|w| w.stage == FailureStage::Persist)
        .collect();
    assert_eq!(persist.len(), 1);
    assert_eq!(persist[0].stream, Some(StreamKind::Real));
    assert!(store.inner.is_empty().await);
}
