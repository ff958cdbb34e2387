use std::sync::Arc;

use tsgate::{FailureStage, GatewayError, StreamKind};
use tsgate_mock::MockBehavior;
use tsgate_store::MemorySeriesStore;

use crate::helpers::{POWER, at, at_s, harness, pt};

#[tokio::test]
async fn predicted_connection_failure_keeps_real_values() {
    let h = harness(Arc::new(MemorySeriesStore::new()));
    h.real
        .set_behavior(POWER, MockBehavior::Return(vec![pt(0, 1.0), pt(1, 2.0), pt(2, 3.0)]))
        .await;
    h.predicted
        .set_behavior(
            POWER,
            MockBehavior::Fail(GatewayError::connection("prediction-model", "connection refused")),
        )
        .await;

    let report = h.gateway.series(POWER, at(0), at(2)).await.unwrap();

    let real: Vec<_> = report.points.iter().map(|p| p.real_value).collect();
    assert_eq!(real, vec![Some(1.0), Some(2.0), Some(3.0)]);
    assert!(report.points.iter().all(|p| p.predicted_value.is_none()));

    assert_eq!(report.warnings.len(), 1);
    let w = &report.warnings[0];
    assert_eq!(w.stream, Some(StreamKind::Predicted));
    assert_eq!(w.stage, FailureStage::Fetch);
    assert!(w.error.is_connection());
    assert!(report.message.starts_with("Data fetched with partial failures: "));
    assert!(report.message.contains("fetch predicted failed"));
    assert!(report.message.contains("connection refused"));
}

#[tokio::test]
async fn not_found_is_reported_but_not_fatal() {
    let h = harness(Arc::new(MemorySeriesStore::new()));
    h.real
        .set_behavior(
            POWER,
            MockBehavior::Fail(GatewayError::upstream_status("digital-twin", 404, "unknown sensor")),
        )
        .await;
    h.predicted
        .set_behavior(POWER, MockBehavior::Return(vec![pt(1, 7.0)]))
        .await;

    let report = h.gateway.series(POWER, at(0), at(1)).await.unwrap();

    assert_eq!(report.points[1].predicted_value, Some(7.0));
    assert!(report.warnings_for(StreamKind::Real).any(|w| w.error.is_not_found()));
    assert_eq!(report.warnings_for(StreamKind::Predicted).count(), 0);
}

#[tokio::test]
async fn a_failing_stream_does_not_cancel_the_other() {
    let h = harness(Arc::new(MemorySeriesStore::new()));
    h.real
        .set_behavior(
            POWER,
            MockBehavior::Fail(GatewayError::schema("digital-twin", "missing field `data`")),
        )
        .await;
    h.predicted
        .set_behavior(POWER, MockBehavior::Return(vec![pt(0, 4.0)]))
        .await;

    let report = h.gateway.series(POWER, at(0), at_s(0, 30)).await.unwrap_or_else(|e| {
        panic!("request must not fail: {e}")
    });
    assert_eq!(report.points[0].predicted_value, Some(4.0));
    assert_eq!(h.predicted.call_count().await, 1);
}
