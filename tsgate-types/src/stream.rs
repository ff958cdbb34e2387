use core::fmt;
use serde::{Deserialize, Serialize};

/// The two independently-sourced value streams of a series.
///
/// Used as the field selector for partial upserts and to tag failures in
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    /// Measured values from the real-value provider.
    Real,
    /// Forecast values from the predicted-value provider.
    Predicted,
}

impl StreamKind {
    /// Both streams in canonical order.
    pub const ALL: [Self; 2] = [Self::Real, Self::Predicted];

    /// Stable identifier for logs and diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Predicted => "predicted",
        }
    }

    /// Storage column holding this stream's value.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Real => "real_value",
            Self::Predicted => "predicted_value",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
