//! Validated calendar date

use crate::error::{TimelineError, TimelineResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A proleptic Gregorian calendar date with day granularity
///
/// Construction validates month and day against the calendar, so every value
/// routes to an existing year/month/day bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Earliest representable date (head sentinel)
    pub const MIN: CalendarDate = CalendarDate(NaiveDate::MIN);

    /// Latest representable date (rear sentinel)
    pub const MAX: CalendarDate = CalendarDate(NaiveDate::MAX);

    /// Build a date, rejecting an out-of-range month or day
    pub fn new(year: i32, month: u32, day: u32) -> TimelineResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(CalendarDate)
            .ok_or(TimelineError::InvalidDate { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Parse with a strftime format (e.g. `%d/%m/%Y`)
    pub fn parse_with_format(s: &str, format: &str) -> TimelineResult<Self> {
        NaiveDate::parse_from_str(s.trim(), format)
            .map(CalendarDate)
            .map_err(|e| TimelineError::ParseDate(format!("{}: {}", s, e)))
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        CalendarDate(date)
    }
}

impl FromStr for CalendarDate {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_format(s, "%Y-%m-%d")
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
