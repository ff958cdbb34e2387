use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the tsgate workspace.
///
/// Provider failures carry the provider name so that the orchestrator can
/// report which upstream misbehaved without re-tagging them.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GatewayError {
    /// Invalid input argument (e.g. an empty or inverted window).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Transport-level failure talking to a provider: DNS, refused
    /// connection, or a timeout before any response arrived.
    #[error("connection to {provider} failed: {msg}")]
    Connection {
        /// Provider name.
        provider: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The provider answered with a non-success status code.
    #[error("{provider} responded with status {status}: {msg}")]
    UpstreamStatus {
        /// Provider name.
        provider: String,
        /// HTTP (or HTTP-equivalent) status code.
        status: u16,
        /// Truncated response body or reason.
        msg: String,
    },

    /// The provider response parsed but did not have the expected shape.
    #[error("invalid response from {provider}: {msg}")]
    Schema {
        /// Provider name.
        provider: String,
        /// Description of the mismatch.
        msg: String,
    },

    /// The series store could not be read or written.
    #[error("storage failure: {0}")]
    Storage(String),

    /// Anything else, wrapped with the original error context.
    #[error("unexpected failure in {provider}: {msg}")]
    Unknown {
        /// Provider or component name.
        provider: String,
        /// Original error rendered as text.
        msg: String,
    },
}

impl GatewayError {
    /// Helper: build a `Connection` error.
    pub fn connection(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connection {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    /// Helper: a provider call that exceeded its timeout.
    ///
    /// Timeouts are reported as connection failures for the affected stream.
    pub fn provider_timeout(provider: impl Into<String>, timeout: Duration) -> Self {
        Self::Connection {
            provider: provider.into(),
            msg: format!("timed out after {}ms", timeout.as_millis()),
        }
    }

    /// Helper: build an `UpstreamStatus` error.
    pub fn upstream_status(provider: impl Into<String>, status: u16, msg: impl Into<String>) -> Self {
        Self::UpstreamStatus {
            provider: provider.into(),
            status,
            msg: msg.into(),
        }
    }

    /// Helper: build a `Schema` error.
    pub fn schema(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Schema {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Storage` error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Helper: build an `Unknown` error.
    pub fn unknown(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Unknown {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    /// True when the provider reported that it has no data for the identifier.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::UpstreamStatus { status: 404, .. })
    }

    /// True for transport-level failures, including timeouts.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Returns true if this error indicates a genuine upstream or storage problem.
    ///
    /// A provider reporting "no data for this identifier" is not actionable.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        !self.is_not_found()
    }

    /// Stable, kebab-case label for logs and diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid-input",
            Self::Connection { .. } => "connection",
            Self::UpstreamStatus { status: 404, .. } => "not-found",
            Self::UpstreamStatus { .. } => "upstream-status",
            Self::Schema { .. } => "schema",
            Self::Storage(_) => "storage",
            Self::Unknown { .. } => "unknown",
        }
    }
}
