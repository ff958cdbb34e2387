use chrono::{DateTime, Utc};

use crate::timeseries::merge::{PointIndex, index_records};
use crate::{StoredRecord, StreamKind};

/// Which streams have at least one missing minute in a window.
///
/// Counts are per stream; a minute with no stored record counts against both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gaps {
    /// Minutes whose real value is absent.
    pub missing_real: usize,
    /// Minutes whose predicted value is absent.
    pub missing_predicted: usize,
}

impl Gaps {
    /// True when any expected minute lacks a real value.
    #[must_use]
    pub const fn needs_real(&self) -> bool {
        self.missing_real > 0
    }

    /// True when any expected minute lacks a predicted value.
    #[must_use]
    pub const fn needs_predicted(&self) -> bool {
        self.missing_predicted > 0
    }

    /// Whether `stream` has to be fetched.
    #[must_use]
    pub const fn needs(&self, stream: StreamKind) -> bool {
        match stream {
            StreamKind::Real => self.needs_real(),
            StreamKind::Predicted => self.needs_predicted(),
        }
    }

    /// Number of missing minutes for `stream`.
    #[must_use]
    pub const fn missing(&self, stream: StreamKind) -> usize {
        match stream {
            StreamKind::Real => self.missing_real,
            StreamKind::Predicted => self.missing_predicted,
        }
    }

    /// True when stored data fully covers the grid.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.needs_real() && !self.needs_predicted()
    }

    /// The streams that need fetching, real first.
    pub fn streams(&self) -> impl Iterator<Item = StreamKind> + '_ {
        StreamKind::ALL.into_iter().filter(|s| self.needs(*s))
    }
}

/// Compare stored records against the expected grid.
#[must_use]
pub fn find_gaps(expected: &[DateTime<Utc>], stored: &[StoredRecord]) -> Gaps {
    let index = index_records(stored.iter().cloned());
    find_gaps_in(expected, &index)
}

/// Compare an already built index against the expected grid.
///
/// Every expected minute is inspected, so the counts are exact rather than a
/// first-hit short circuit.
#[must_use]
pub fn find_gaps_in(expected: &[DateTime<Utc>], index: &PointIndex) -> Gaps {
    let mut gaps = Gaps::default();
    for ts in expected {
        match index.get(ts) {
            Some(p) => {
                if p.real_value.is_none() {
                    gaps.missing_real += 1;
                }
                if p.predicted_value.is_none() {
                    gaps.missing_predicted += 1;
                }
            }
            None => {
                gaps.missing_real += 1;
                gaps.missing_predicted += 1;
            }
        }
    }
    gaps
}
