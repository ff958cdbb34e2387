use std::sync::Arc;

use tsgate_mock::MockBehavior;
use tsgate_store::MemorySeriesStore;

use crate::helpers::{POWER, at, at_s, harness, harness_with, pt, rec};
use tsgate::ValuePoint;

#[tokio::test]
async fn second_request_is_served_from_the_store() {
    let store = Arc::new(MemorySeriesStore::new());
    let h = harness(store.clone());
    h.real
        .set_behavior(POWER, MockBehavior::Return(vec![pt(0, 1.0), pt(1, 2.0)]))
        .await;
    h.predicted
        .set_behavior(POWER, MockBehavior::Return(vec![pt(0, 1.5), pt(1, 2.5)]))
        .await;

    let first = h.gateway.series(POWER, at(0), at(1)).await.unwrap();
    let second = h.gateway.series(POWER, at(0), at(1)).await.unwrap();

    assert_eq!(first.points, second.points);
    assert_eq!(h.real.call_count().await, 1);
    assert_eq!(h.predicted.call_count().await, 1);
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn fetched_points_are_truncated_clipped_and_deduplicated() {
    let store = Arc::new(MemorySeriesStore::new());
    let h = harness(store.clone());
    h.real
        .set_behavior(
            POWER,
            MockBehavior::Return(vec![
                ValuePoint::new(at_s(0, 20), 1.0),
                ValuePoint::new(at_s(0, 40), 1.25),
                pt(5, 99.0),
            ]),
        )
        .await;

    let report = h.gateway.series(POWER, at(0), at(1)).await.unwrap();

    assert_eq!(report.points.len(), 2);
    assert_eq!(report.points[0].real_value, Some(1.25));
    assert_eq!(report.points[1].real_value, None);
    let stored = store.records(POWER).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].timestamp, at(0));
}

#[tokio::test]
async fn write_back_preserves_the_sibling_field() {
    let store = Arc::new(MemorySeriesStore::with_records(vec![rec(0, None, Some(5.0))]));
    let h = harness(store.clone());
    h.real
        .set_behavior(POWER, MockBehavior::Return(vec![pt(0, 3.0)]))
        .await;
    h.predicted
        .set_behavior(POWER, MockBehavior::Return(vec![]))
        .await;

    let report = h.gateway.series(POWER, at(0), at_s(0, 59)).await.unwrap();

    assert_eq!(report.points[0].real_value, Some(3.0));
    assert_eq!(report.points[0].predicted_value, Some(5.0));
    let stored = store.records(POWER).await;
    assert_eq!(stored[0].real_value, Some(3.0));
    assert_eq!(stored[0].predicted_value, Some(5.0));
}

#[tokio::test]
async fn read_through_mode_skips_persistence() {
    let store = Arc::new(MemorySeriesStore::new());
    let h = harness_with(store.clone(), |b| b.persist_fetched(false));
    h.real
        .set_behavior(POWER, MockBehavior::Return(vec![pt(0, 1.0)]))
        .await;

    let report = h.gateway.series(POWER, at(0), at(1)).await.unwrap();

    assert_eq!(report.points[0].real_value, Some(1.0));
    assert!(store.is_empty().await);
}
