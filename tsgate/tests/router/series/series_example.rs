use std::sync::Arc;

use tsgate_mock::MockBehavior;
use tsgate_store::MemorySeriesStore;

use crate::helpers::{POWER, at, harness, pt, rec};

#[tokio::test]
async fn predicted_gaps_are_fetched_for_the_whole_window() {
    let store = Arc::new(MemorySeriesStore::with_records(vec![rec(0, Some(10.0), None)]));
    let h = harness(store.clone());
    h.predicted
        .set_behavior(POWER, MockBehavior::Return(vec![pt(0, 0.5), pt(1, 1.5)]))
        .await;

    let report = h.gateway.series(POWER, at(0), at(2)).await.unwrap();

    assert_eq!(report.points.len(), 3);
    let p = &report.points;
    assert_eq!((p[0].timestamp, p[0].real_value, p[0].predicted_value), (at(0), Some(10.0), Some(0.5)));
    assert_eq!((p[1].timestamp, p[1].real_value, p[1].predicted_value), (at(1), None, Some(1.5)));
    assert_eq!((p[2].timestamp, p[2].real_value, p[2].predicted_value), (at(2), None, None));
    assert!(report.is_complete_success());
    assert_eq!(report.message, "Data fetched successfully");

    let calls = h.predicted.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].window.start(), at(0));
    assert_eq!(calls[0].window.end(), at(2));

    // Fetched predictions were written without touching the stored real value.
    let stored = store.records(POWER).await;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].real_value, Some(10.0));
    assert_eq!(stored[0].predicted_value, Some(0.5));
    assert_eq!(stored[1].real_value, None);
    assert_eq!(stored[1].predicted_value, Some(1.5));
}
