use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tsgate::{FetchRequest, Gateway, GatewayError, StreamKind, ValuePoint, ValueProvider};
use tsgate_mock::MockBehavior;
use tsgate_store::MemorySeriesStore;

use crate::helpers::{POWER, at, harness, harness_with, pt};

#[tokio::test(start_paused = true)]
async fn hanging_predictions_time_out_as_connection_failure() {
    let h = harness_with(Arc::new(MemorySeriesStore::new()), |b| {
        b.predicted_timeout(Duration::from_secs(30))
    });
    h.real
        .set_behavior(POWER, MockBehavior::Return(vec![pt(0, 1.0)]))
        .await;
    h.predicted.set_behavior(POWER, MockBehavior::Hang).await;

    let report = h.gateway.series(POWER, at(0), at(1)).await.unwrap();

    assert_eq!(report.points[0].real_value, Some(1.0));
    let w: Vec<_> = report.warnings_for(StreamKind::Predicted).collect();
    assert_eq!(w.len(), 1);
    assert!(w[0].error.is_connection());
    assert!(w[0].error.to_string().contains("timed out after 30000ms"));
}

#[tokio::test(start_paused = true)]
async fn default_real_timeout_is_ten_seconds() {
    let h = harness(Arc::new(MemorySeriesStore::new()));
    h.real.set_fallback(MockBehavior::Hang).await;

    let started = tokio::time::Instant::now();
    let report = h.gateway.stream_series(POWER, StreamKind::Real, at(0), at(1)).await.unwrap();

    assert_eq!(started.elapsed(), Duration::from_secs(10));
    assert!(report.warnings[0].error.is_connection());
}

#[tokio::test(start_paused = true)]
async fn request_deadline_bounds_both_streams() {
    let h = harness_with(Arc::new(MemorySeriesStore::new()), |b| {
        b.request_timeout(Duration::from_secs(5))
    });
    h.real.set_fallback(MockBehavior::Hang).await;
    h.predicted.set_fallback(MockBehavior::Hang).await;

    let started = tokio::time::Instant::now();
    let report = h.gateway.series(POWER, at(0), at(1)).await.unwrap();

    assert_eq!(started.elapsed(), Duration::from_secs(5));
    assert_eq!(report.warnings.len(), 2);
    assert!(report.warnings.iter().all(|w| w.error.is_connection()));
    assert!(report.message.contains("request deadline of 5000ms exceeded"));
}

/// Counts fetches that were started and fetch futures that were dropped.
#[derive(Default)]
struct Pending {
    started: AtomicUsize,
    dropped: Arc<AtomicUsize>,
}

struct DropGuard(Arc<AtomicUsize>);

impl Drop for DropGuard {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ValueProvider for Pending {
    fn name(&self) -> &'static str {
        "pending"
    }

    async fn fetch(&self, _req: &FetchRequest) -> Result<Vec<ValuePoint>, GatewayError> {
        let _guard = DropGuard(Arc::clone(&self.dropped));
        self.started.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn dropping_the_request_cancels_fetches() {
    let real = Arc::new(Pending::default());
    let predicted = Arc::new(Pending::default());
    let gateway = Gateway::builder()
        .with_store(Arc::new(MemorySeriesStore::new()))
        .real_provider(Arc::clone(&real) as Arc<dyn ValueProvider>)
        .predicted_provider(Arc::clone(&predicted) as Arc<dyn ValueProvider>)
        .build()
        .unwrap();

    let res =
        tokio::time::timeout(Duration::from_secs(1), gateway.series(POWER, at(0), at(1))).await;

    assert!(res.is_err());
    for p in [&real, &predicted] {
        assert_eq!(p.started.load(Ordering::SeqCst), 1);
        assert_eq!(p.dropped.load(Ordering::SeqCst), 1);
    }
}
