//! Configuration for the reconciliation orchestrator.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::stream::StreamKind;

/// Global configuration for the `Gateway` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Timeout for a single real-value fetch.
    pub real_timeout: Duration,
    /// Timeout for a single predicted-value fetch.
    ///
    /// The prediction model runs iterative inference over the window, so
    /// this is much longer than the real-value timeout by default.
    pub predicted_timeout: Duration,
    /// Optional deadline for the joint fetch phase. Streams still in flight
    /// when it expires are reported as connection failures.
    pub request_timeout: Option<Duration>,
    /// Write freshly fetched values back to the series store.
    pub persist_fetched: bool,
}

impl GatewayConfig {
    /// Timeout applied to fetches of the given stream.
    #[must_use]
    pub const fn timeout_for(&self, stream: StreamKind) -> Duration {
        match stream {
            StreamKind::Real => self.real_timeout,
            StreamKind::Predicted => self.predicted_timeout,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            real_timeout: Duration::from_secs(10),
            predicted_timeout: Duration::from_secs(900),
            request_timeout: None,
            persist_fetched: true,
        }
    }
}
