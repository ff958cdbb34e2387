use std::sync::Arc;

use tsgate::StreamKind;
use tsgate_mock::MockBehavior;
use tsgate_store::MemorySeriesStore;

use crate::helpers::{POWER, at, harness, pt, rec};

#[tokio::test]
async fn single_stream_leaves_the_other_as_stored() {
    let store = Arc::new(MemorySeriesStore::with_records(vec![rec(1, None, Some(2.0))]));
    let h = harness(store.clone());
    h.real
        .set_behavior(POWER, MockBehavior::Return(vec![pt(0, 1.0), pt(1, 1.5)]))
        .await;
    h.predicted
        .set_behavior(POWER, MockBehavior::Return(vec![pt(0, 9.0)]))
        .await;

    let report = h
        .gateway
        .stream_series(POWER, StreamKind::Real, at(0), at(1))
        .await
        .unwrap();

    assert_eq!(h.real.call_count().await, 1);
    assert_eq!(h.predicted.call_count().await, 0);
    assert_eq!(report.points[0].real_value, Some(1.0));
    assert_eq!(report.points[0].predicted_value, None);
    assert_eq!(report.points[1].real_value, Some(1.5));
    assert_eq!(report.points[1].predicted_value, Some(2.0));
    assert_eq!(store.records(POWER).await[1].predicted_value, Some(2.0));
}

#[tokio::test]
async fn single_stream_skips_fetch_when_that_stream_is_covered() {
    let store = Arc::new(MemorySeriesStore::with_records(vec![
        rec(0, None, Some(1.0)),
        rec(1, None, Some(1.0)),
    ]));
    let h = harness(store);

    let report = h
        .gateway
        .stream_series(POWER, StreamKind::Predicted, at(0), at(1))
        .await
        .unwrap();

    assert_eq!(h.predicted.call_count().await, 0);
    assert_eq!(h.real.call_count().await, 0);
    assert!(report.is_complete_success());
}
