//! Inclusive rental date ranges.
//!
//! A booking from day N to day N is a one-day rental; N to N+1 is two
//! days. The same inclusive convention feeds both price calculation and
//! duration display, so it lives in exactly one place.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::RentalDate;

/// An inclusive `[start, end]` range of rental days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: RentalDate,
    pub end: RentalDate,
}

impl DateRange {
    /// Build a range, rejecting `end < start`.
    pub fn new(start: RentalDate, end: RentalDate) -> Result<Self, CoreError> {
        if end < start {
            return Err(CoreError::Validation(format!(
                "end date {end} precedes start date {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// A one-day range covering a single date.
    pub fn single_day(day: RentalDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Number of rental days, counting both the start and end day.
    pub fn inclusive_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Inclusive interval intersection:
    /// `a.start <= b.end && a.end >= b.start`.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
