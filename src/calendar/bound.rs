//! Partial date bounds for range criteria

use super::{days_in_month, CalendarDate};
use crate::error::{TimelineError, TimelineResult};
use std::fmt;
use std::str::FromStr;

/// A year with an optional month and day, as used on either side of a range
///
/// Missing units resolve differently per side: a lower bound fills January
/// and the first of the month, an upper bound fills December and the last day
/// of the month. A day given without a month keeps that day on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBound {
    year: i32,
    month: Option<u32>,
    day: Option<u32>,
    lower: CalendarDate,
    upper: CalendarDate,
}

impl DateBound {
    /// Build a bound; fails when the month or the resolved day is off the calendar
    pub fn new(year: i32, month: Option<u32>, day: Option<u32>) -> TimelineResult<Self> {
        let invalid = TimelineError::InvalidDate {
            year,
            month: month.unwrap_or(0),
            day: day.unwrap_or(0),
        };

        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(invalid);
            }
        }

        let lower = CalendarDate::new(year, month.unwrap_or(1), day.unwrap_or(1))?;

        let upper_month = month.unwrap_or(12);
        let upper_day = day.unwrap_or_else(|| days_in_month(year, upper_month));
        let upper = CalendarDate::new(year, upper_month, upper_day)?;

        Ok(Self {
            year,
            month,
            day,
            lower,
            upper,
        })
    }

    /// Whole year
    pub fn year(year: i32) -> TimelineResult<Self> {
        Self::new(year, None, None)
    }

    /// Whole month
    pub fn month(year: i32, month: u32) -> TimelineResult<Self> {
        Self::new(year, Some(month), None)
    }

    /// Single day
    pub fn day(year: i32, month: u32, day: u32) -> TimelineResult<Self> {
        Self::new(year, Some(month), Some(day))
    }

    pub fn year_value(&self) -> i32 {
        self.year
    }

    pub fn month_value(&self) -> Option<u32> {
        self.month
    }

    pub fn day_value(&self) -> Option<u32> {
        self.day
    }

    /// Earliest date covered by this bound
    pub fn lower(&self) -> CalendarDate {
        self.lower
    }

    /// Latest date covered by this bound
    pub fn upper(&self) -> CalendarDate {
        self.upper
    }
}

impl From<CalendarDate> for DateBound {
    fn from(date: CalendarDate) -> Self {
        Self {
            year: date.year(),
            month: Some(date.month()),
            day: Some(date.day()),
            lower: date,
            upper: date,
        }
    }
}

/// Accepts `YYYY`, `YYYY-MM` or `YYYY-MM-DD`
impl FromStr for DateBound {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || TimelineError::ParseDate(s.to_string());
        let mut parts = s.trim().splitn(3, '-');

        let year = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(parse_err)?
            .parse::<i32>()
            .map_err(|_| parse_err())?;
        let month = parts
            .next()
            .map(|p| p.parse::<u32>().map_err(|_| parse_err()))
            .transpose()?;
        let day = parts
            .next()
            .map(|p| p.parse::<u32>().map_err(|_| parse_err()))
            .transpose()?;

        Self::new(year, month, day)
    }
}

impl fmt::Display for DateBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.month, self.day) {
            (Some(m), Some(d)) => write!(f, "{:04}-{:02}-{:02}", self.year, m, d),
            (Some(m), None) => write!(f, "{:04}-{:02}", self.year, m),
            (None, Some(d)) => write!(f, "{:04}-*-{:02}", self.year, d),
            (None, None) => write!(f, "{:04}", self.year),
        }
    }
}
