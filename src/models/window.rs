use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A half-open time interval `[start, end)` requested or held by a booking.
///
/// The window is not required to be non-empty: stored bookings are never
/// checked for `end > start`, so neither is this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl BookingWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window of given length starting at `start`.
    ///
    /// Returns `None` if the end falls outside the representable date range.
    pub fn starting_at(start: DateTime<Utc>, length: Duration) -> Option<Self> {
        start
            .checked_add_signed(length)
            .map(|end| Self::new(start, end))
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// True if the end is not after the start
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether two windows overlap: `s1 < e2 && e1 > s2`.
    ///
    /// Back-to-back windows, where one ends exactly when the other starts,
    /// do not overlap.
    pub fn overlaps(&self, other: &BookingWindow) -> bool {
        self.start < other.end && self.end > other.start
    }
}
