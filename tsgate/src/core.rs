use std::sync::Arc;
use std::time::Duration;

use tsgate_core::{GatewayConfig, GatewayError, SeriesStore, StreamKind, ValueProvider};

/// Orchestrator that reconciles a series store with its upstream providers.
pub struct Gateway {
    pub(crate) store: Arc<dyn SeriesStore>,
    pub(crate) real: Arc<dyn ValueProvider>,
    pub(crate) predicted: Arc<dyn ValueProvider>,
    pub(crate) cfg: GatewayConfig,
}

/// Builder for constructing a `Gateway` with custom configuration.
pub struct GatewayBuilder {
    store: Option<Arc<dyn SeriesStore>>,
    real: Option<Arc<dyn ValueProvider>>,
    predicted: Option<Arc<dyn ValueProvider>>,
    cfg: GatewayConfig,
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayBuilder {
    /// Create a new builder with default timeouts (10s real, 900s predicted)
    /// and write-back enabled.
    ///
    /// A store and both providers must be registered before [`build`](Self::build).
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: None,
            real: None,
            predicted: None,
            cfg: GatewayConfig::default(),
        }
    }

    /// Register the series store.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn SeriesStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Register the real-value provider.
    #[must_use]
    pub fn real_provider(mut self, p: Arc<dyn ValueProvider>) -> Self {
        self.real = Some(p);
        self
    }

    /// Register the predicted-value provider.
    #[must_use]
    pub fn predicted_provider(mut self, p: Arc<dyn ValueProvider>) -> Self {
        self.predicted = Some(p);
        self
    }

    /// Register the provider for `stream`.
    #[must_use]
    pub fn provider(self, stream: StreamKind, p: Arc<dyn ValueProvider>) -> Self {
        match stream {
            StreamKind::Real => self.real_provider(p),
            StreamKind::Predicted => self.predicted_provider(p),
        }
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: GatewayConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Timeout for a single real-value fetch.
    #[must_use]
    pub const fn real_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.real_timeout = timeout;
        self
    }

    /// Timeout for a single predicted-value fetch.
    ///
    /// Predictions may involve iterative model inference over the window, so
    /// keep this generous.
    #[must_use]
    pub const fn predicted_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.predicted_timeout = timeout;
        self
    }

    /// Deadline for the whole fetch phase of a request.
    ///
    /// Streams still in flight at the deadline are reported as connection
    /// failures; streams that already finished keep their results.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Toggle writing freshly fetched values back to the store.
    ///
    /// Disabling makes the gateway read-through only: every request for an
    /// unfilled window hits the providers again.
    #[must_use]
    pub const fn persist_fetched(mut self, yes: bool) -> Self {
        self.cfg.persist_fetched = yes;
        self
    }

    /// Build the `Gateway`.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the store or either provider is missing.
    pub fn build(self) -> Result<Gateway, GatewayError> {
        let missing = |what: &str| GatewayError::InvalidInput(format!("{what} is required"));
        Ok(Gateway {
            store: self.store.ok_or_else(|| missing("series store"))?,
            real: self.real.ok_or_else(|| missing("real-value provider"))?,
            predicted: self
                .predicted
                .ok_or_else(|| missing("predicted-value provider"))?,
            cfg: self.cfg,
        })
    }
}

/// Attach provider context to errors that do not carry it.
///
/// Provider-facing variants pass through; anything else a provider returns
/// is reported as an unknown failure of that provider.
pub(crate) fn tag_err(provider: &str, e: GatewayError) -> GatewayError {
    match e {
        e @ (GatewayError::Connection { .. }
        | GatewayError::UpstreamStatus { .. }
        | GatewayError::Schema { .. }
        | GatewayError::Unknown { .. }) => e,
        other => GatewayError::unknown(provider, other.to_string()),
    }
}

impl Gateway {
    /// Start building a new `Gateway`.
    #[must_use]
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.cfg
    }

    /// The series store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SeriesStore> {
        &self.store
    }

    /// The provider serving `stream`.
    #[must_use]
    pub fn provider(&self, stream: StreamKind) -> &Arc<dyn ValueProvider> {
        match stream {
            StreamKind::Real => &self.real,
            StreamKind::Predicted => &self.predicted,
        }
    }

    /// Wrap a provider future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "tsgate::core::provider_call_with_timeout",
            skip(fut),
            fields(
                provider = provider_name,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        provider_name: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, GatewayError>
    where
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(GatewayError::provider_timeout(provider_name, timeout)))
            .map_err(|e| tag_err(provider_name, e))
    }
}
