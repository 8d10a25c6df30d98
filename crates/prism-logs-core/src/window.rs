//! # Time-Window Codec
//!
//! Turns a pair of instants into the range filter understood by both the
//! `<kind>s/list` and `groups` endpoints:
//!
//! ```text
//! (<attr>=ge=<start_usecs>;<attr>=lt=<end_usecs>)
//! ```
//!
//! The interval is half-open: a record stamped exactly at `start` matches,
//! one stamped exactly at `end` does not.

use chrono::{DateTime, TimeZone, Utc};

/// A half-open time interval `[start, end)`.
///
/// `start <= end` is the caller's responsibility; the codec encodes whatever
/// it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Build a window from two timezone-aware instants.
    #[must_use]
    pub fn new<Tz: TimeZone>(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self {
            start: start.with_timezone(&Utc),
            end: end.with_timezone(&Utc),
        }
    }

    /// Inclusive lower bound.
    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive upper bound.
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Lower bound in microseconds since the Unix epoch.
    #[must_use]
    pub fn start_usecs(&self) -> i64 {
        self.start.timestamp_micros()
    }

    /// Upper bound in microseconds since the Unix epoch.
    #[must_use]
    pub fn end_usecs(&self) -> i64 {
        self.end.timestamp_micros()
    }

    /// Range filter over `attribute` for this window.
    #[must_use]
    pub fn to_filter(&self, attribute: &str) -> String {
        to_filter(attribute, self)
    }
}

/// Encode `window` as a `ge`/`lt` range filter over `attribute`.
#[must_use]
pub fn to_filter(attribute: &str, window: &TimeWindow) -> String {
    format!(
        "({attr}=ge={start};{attr}=lt={end})",
        attr = attribute,
        start = window.start_usecs(),
        end = window.end_usecs()
    )
}
