//! Report envelope produced by the orchestrator.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::series::CombinedPoint;
use crate::stream::StreamKind;

/// Pipeline stage at which a non-fatal failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Reading existing records from the series store.
    Load,
    /// Fetching a stream from its upstream provider.
    Fetch,
    /// Writing fetched values back to the series store.
    Persist,
}

impl FailureStage {
    /// Stable identifier for logs and diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Fetch => "fetch",
            Self::Persist => "persist",
        }
    }
}

/// One failure captured and recovered from during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamFailure {
    /// Affected stream; `None` when the failure is not stream-specific (store read).
    pub stream: Option<StreamKind>,
    /// Stage that failed.
    pub stage: FailureStage,
    /// Underlying error.
    pub error: GatewayError,
}

impl StreamFailure {
    /// Failure while loading stored records.
    #[must_use]
    pub const fn load(error: GatewayError) -> Self {
        Self {
            stream: None,
            stage: FailureStage::Load,
            error,
        }
    }

    /// Failure while fetching a stream.
    #[must_use]
    pub const fn fetch(stream: StreamKind, error: GatewayError) -> Self {
        Self {
            stream: Some(stream),
            stage: FailureStage::Fetch,
            error,
        }
    }

    /// Failure while persisting a stream.
    #[must_use]
    pub const fn persist(stream: StreamKind, error: GatewayError) -> Self {
        Self {
            stream: Some(stream),
            stage: FailureStage::Persist,
            error,
        }
    }
}

impl fmt::Display for StreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stream {
            Some(s) => write!(f, "{} {} failed: {}", self.stage.as_str(), s, self.error),
            None => write!(f, "{} failed: {}", self.stage.as_str(), self.error),
        }
    }
}

/// Result of reconciling a series over a window.
///
/// `points` covers every expected minute of the window in ascending order;
/// `warnings` lists the failures that were recovered from and `message`
/// summarizes them for humans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesReport {
    /// Requested series identifier.
    pub series_id: String,
    /// Human-readable outcome summary.
    pub message: String,
    /// Gap-free, chronologically ordered series.
    pub points: Vec<CombinedPoint>,
    /// Non-fatal issues encountered while building the report.
    pub warnings: Vec<StreamFailure>,
}

impl SeriesReport {
    /// Message used when every stage succeeded.
    pub const OK_MESSAGE: &'static str = "Data fetched successfully";

    /// Build a report, deriving the message from the warnings.
    #[must_use]
    pub fn new(
        series_id: impl Into<String>,
        points: Vec<CombinedPoint>,
        warnings: Vec<StreamFailure>,
    ) -> Self {
        let message = Self::summarize(&warnings);
        Self {
            series_id: series_id.into(),
            message,
            points,
            warnings,
        }
    }

    /// Render the diagnostic summary for a set of failures.
    #[must_use]
    pub fn summarize(warnings: &[StreamFailure]) -> String {
        if warnings.is_empty() {
            return Self::OK_MESSAGE.to_string();
        }
        let details: Vec<String> = warnings.iter().map(ToString::to_string).collect();
        format!("Data fetched with partial failures: {}", details.join("; "))
    }

    /// True when no failure was recorded.
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Failures recorded for a given stream.
    pub fn warnings_for(&self, stream: StreamKind) -> impl Iterator<Item = &StreamFailure> {
        self.warnings
            .iter()
            .filter(move |w| w.stream == Some(stream))
    }
}
