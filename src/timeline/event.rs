//! Timeline events

use crate::calendar::CalendarDate;
use crate::error::TimelineResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An immutable date-stamped record
///
/// The payload is opaque to the index; only the aggregate cache looks at it,
/// through the extractor supplied when the timeline is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event<T> {
    date: CalendarDate,
    payload: T,
}

impl<T> Event<T> {
    pub fn new(date: CalendarDate, payload: T) -> Self {
        Self { date, payload }
    }

    /// Build from raw components, rejecting an invalid calendar date
    pub fn on(year: i32, month: u32, day: u32, payload: T) -> TimelineResult<Self> {
        Ok(Self::new(CalendarDate::new(year, month, day)?, payload))
    }

    pub fn date(&self) -> CalendarDate {
        self.date
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }
}

impl<T: fmt::Display> fmt::Display for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event: {} at {}", self.payload, self.date)
    }
}
