use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tsgate_core::{FetchRequest, GatewayError, ValuePoint, ValueProvider};

/// Instruction for how a fetch should behave for a given series.
#[derive(Debug, Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(GatewayError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

#[derive(Default)]
struct InternalState {
    rules: HashMap<String, MockBehavior<Vec<ValuePoint>>>,
    fallback: Option<MockBehavior<Vec<ValuePoint>>>,
    calls: Vec<FetchRequest>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
#[derive(Clone)]
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for fetches of a specific series.
    pub async fn set_behavior(
        &self,
        series_id: impl Into<String>,
        behavior: MockBehavior<Vec<ValuePoint>>,
    ) {
        let mut guard = self.state.lock().await;
        guard.rules.insert(series_id.into(), behavior);
    }

    /// Behavior for series without a specific rule.
    ///
    /// Without a fallback such series return an empty series.
    pub async fn set_fallback(&self, behavior: MockBehavior<Vec<ValuePoint>>) {
        self.state.lock().await.fallback = Some(behavior);
    }

    /// Every request received so far, in arrival order.
    pub async fn calls(&self) -> Vec<FetchRequest> {
        self.state.lock().await.calls.clone()
    }

    /// Number of requests received so far.
    pub async fn call_count(&self) -> usize {
        self.state.lock().await.calls.len()
    }

    /// Clear all configured behaviors and the call log.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.rules.clear();
        guard.fallback = None;
        guard.calls.clear();
    }
}

/// A provider that defers all behavior to an external controller.
pub struct DynamicMockProvider {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockProvider {
    /// Create a new dynamic mock provider and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn ValueProvider>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn ValueProvider>, controller)
    }
}

#[async_trait]
impl ValueProvider for DynamicMockProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    async fn fetch(&self, req: &FetchRequest) -> Result<Vec<ValuePoint>, GatewayError> {
        // Log and snapshot the behavior without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.calls.push(req.clone());
            guard
                .rules
                .get(&req.series_id)
                .or(guard.fallback.as_ref())
                .cloned()
        };

        match behavior {
            Some(MockBehavior::Return(points)) => Ok(points),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Ok(Vec::new()),
        }
    }
}
