//! Series data model: combined points, stored records, upstream samples, windows.

use chrono::{DateTime, DurationRound, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::stream::StreamKind;

/// Normalize to UTC and zero the seconds and sub-second components.
#[must_use]
pub fn truncate_to_minute<Tz: TimeZone>(ts: &DateTime<Tz>) -> DateTime<Utc> {
    let utc = ts.with_timezone(&Utc);
    utc.duration_trunc(TimeDelta::minutes(1)).unwrap_or(utc)
}

/// One minute of a series with both value streams.
///
/// Either value may be absent independently; absence is not zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinedPoint {
    /// Minute-aligned UTC instant.
    pub timestamp: DateTime<Utc>,
    /// Measured value, if known.
    pub real_value: Option<f64>,
    /// Predicted value, if known.
    pub predicted_value: Option<f64>,
}

impl CombinedPoint {
    /// A point with both values absent.
    #[must_use]
    pub const fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            real_value: None,
            predicted_value: None,
        }
    }

    /// Value of the given stream.
    #[must_use]
    pub const fn value(&self, stream: StreamKind) -> Option<f64> {
        match stream {
            StreamKind::Real => self.real_value,
            StreamKind::Predicted => self.predicted_value,
        }
    }

    /// Set only the given stream's value; the sibling field is left untouched.
    pub const fn set(&mut self, stream: StreamKind, value: f64) {
        match stream {
            StreamKind::Real => self.real_value = Some(value),
            StreamKind::Predicted => self.predicted_value = Some(value),
        }
    }

    /// True when both streams carry a value.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.real_value.is_some() && self.predicted_value.is_some()
    }
}

/// Persisted form of a [`CombinedPoint`], keyed by `(series_id, timestamp)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Series identifier (sensor name).
    pub series_id: String,
    /// Minute-aligned UTC instant.
    pub timestamp: DateTime<Utc>,
    /// Measured value, if known.
    pub real_value: Option<f64>,
    /// Predicted value, if known.
    pub predicted_value: Option<f64>,
}

impl StoredRecord {
    /// The request-scoped view of this record.
    #[must_use]
    pub const fn point(&self) -> CombinedPoint {
        CombinedPoint {
            timestamp: self.timestamp,
            real_value: self.real_value,
            predicted_value: self.predicted_value,
        }
    }
}

impl From<StoredRecord> for CombinedPoint {
    fn from(r: StoredRecord) -> Self {
        r.point()
    }
}

/// One sample returned by an upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuePoint {
    /// UTC instant as reported by the provider.
    pub timestamp: DateTime<Utc>,
    /// Sample value.
    pub value: f64,
}

impl ValuePoint {
    /// Construct a sample.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// A validated, minute-truncated UTC request window `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Window {
    /// Validate and normalize a window.
    ///
    /// Both bounds are converted to UTC and truncated to the minute. The
    /// comparison uses the original instants, so a window shorter than a
    /// minute is valid and covers a single grid point.
    ///
    /// # Errors
    /// Returns `InvalidInput` when `start >= end`.
    pub fn new<Tz: TimeZone>(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self, GatewayError> {
        if start >= end {
            return Err(GatewayError::InvalidInput(
                "end must be after start".to_string(),
            ));
        }
        Ok(Self {
            start: truncate_to_minute(&start),
            end: truncate_to_minute(&end),
        })
    }

    /// Inclusive, minute-truncated start.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Inclusive, minute-truncated end.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Number of expected minutes: `floor((end - start) / 1min) + 1`.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from((self.end - self.start).num_minutes() + 1).unwrap_or(0)
    }

    /// Always false for a validated window; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the (minute-truncated) instant lies inside the window.
    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        let ts = truncate_to_minute(&ts);
        self.start <= ts && ts <= self.end
    }
}

/// Parameters of a single provider fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Series identifier.
    pub series_id: String,
    /// Minute-truncated UTC bounds.
    pub window: Window,
}

impl FetchRequest {
    /// Construct a fetch request for a series over a window.
    pub fn new(series_id: impl Into<String>, window: Window) -> Self {
        Self {
            series_id: series_id.into(),
            window,
        }
    }
}
