use std::sync::Arc;

use chrono::{FixedOffset, TimeZone};
use tsgate::{Gateway, GatewayError, StreamKind, ValueProvider};
use tsgate_mock::DynamicMockProvider;
use tsgate_store::MemorySeriesStore;

use crate::helpers::{POWER, at, harness};

#[tokio::test]
async fn inverted_or_empty_window_is_rejected_before_any_work() {
    let h = harness(Arc::new(MemorySeriesStore::new()));

    for (s, e) in [(at(2), at(0)), (at(1), at(1))] {
        let err = h.gateway.series(POWER, s, e).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidInput(_)));
    }
    let err = h
        .gateway
        .stream_series(POWER, StreamKind::Real, at(3), at(2))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::InvalidInput(_)));
    assert_eq!(h.real.call_count().await, 0);
    assert_eq!(h.predicted.call_count().await, 0);
}

#[tokio::test]
async fn blank_series_id_is_rejected() {
    let h = harness(Arc::new(MemorySeriesStore::new()));
    let err = h.gateway.series("  ", at(0), at(1)).await.unwrap_err();
    assert!(matches!(err, GatewayError::InvalidInput(_)));
}

#[tokio::test]
async fn offsets_are_normalized_to_utc() {
    let h = harness(Arc::new(MemorySeriesStore::new()));
    let cet = FixedOffset::east_opt(3600).unwrap();
    let start = cet.with_ymd_and_hms(2025, 2, 17, 2, 0, 0).unwrap();
    let end = cet.with_ymd_and_hms(2025, 2, 17, 2, 2, 30).unwrap();

    let report = h.gateway.series(POWER, start, end).await.unwrap();

    let ts: Vec<_> = report.points.iter().map(|p| p.timestamp).collect();
    assert_eq!(ts, vec![at(0), at(1), at(2)]);
}

#[test]
fn builder_requires_store_and_both_providers() {
    let (real, _) = DynamicMockProvider::new_with_controller("digital-twin");
    let (pred, _) = DynamicMockProvider::new_with_controller("prediction-model");
    let store = Arc::new(MemorySeriesStore::new());

    let err = Gateway::builder()
        .real_provider(Arc::clone(&real))
        .predicted_provider(Arc::clone(&pred))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, GatewayError::InvalidInput(ref m) if m.contains("store")));

    let err = Gateway::builder()
        .with_store(store.clone())
        .real_provider(Arc::clone(&real))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, GatewayError::InvalidInput(ref m) if m.contains("predicted")));

    let gw = Gateway::builder()
        .with_store(store)
        .provider(StreamKind::Real, real)
        .provider(StreamKind::Predicted, pred)
        .build()
        .unwrap();
    assert_eq!(gw.provider(StreamKind::Predicted).name(), "prediction-model");
    assert_eq!(gw.config().predicted_timeout.as_secs(), 900);
}
