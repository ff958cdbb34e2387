use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use crate::{Window, truncate_to_minute};

/// Number of expected minutes between two instants, inclusive.
///
/// Equals `floor((end_trunc - start_trunc) / 1min) + 1`, or 0 when
/// `start_trunc > end_trunc`.
#[must_use]
pub fn grid_len<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> usize {
    let minutes = (truncate_to_minute(end) - truncate_to_minute(start)).num_minutes();
    usize::try_from(minutes + 1).unwrap_or(0)
}

/// All minute-aligned UTC instants in `[start, end]`, ascending.
///
/// Both bounds are normalized to UTC and truncated to the minute; iteration
/// starts at the truncated start and steps by one minute until it passes the
/// truncated end. Callers are expected to have rejected `start >= end`; an
/// inverted range simply yields an empty grid.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tsgate_core::expected_timestamps;
///
/// let start = Utc.with_ymd_and_hms(2025, 2, 17, 1, 0, 30).unwrap();
/// let end = Utc.with_ymd_and_hms(2025, 2, 17, 1, 2, 0).unwrap();
/// let grid = expected_timestamps(&start, &end);
/// assert_eq!(grid.len(), 3);
/// assert_eq!(grid[0], Utc.with_ymd_and_hms(2025, 2, 17, 1, 0, 0).unwrap());
/// ```
#[must_use]
pub fn expected_timestamps<Tz: TimeZone>(
    start: &DateTime<Tz>,
    end: &DateTime<Tz>,
) -> Vec<DateTime<Utc>> {
    let first = truncate_to_minute(start);
    let last = truncate_to_minute(end);
    let mut out = Vec::with_capacity(grid_len(start, end));
    let mut cur = first;
    while cur <= last {
        out.push(cur);
        cur += TimeDelta::minutes(1);
    }
    out
}

/// The expected grid of a validated window.
#[must_use]
pub fn window_timestamps(window: &Window) -> Vec<DateTime<Utc>> {
    expected_timestamps(&window.start(), &window.end())
}
