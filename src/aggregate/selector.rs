//! Addressing aggregate buckets

use crate::calendar::CalendarDate;
use crate::error::{TimelineError, TimelineResult};
use std::fmt;

/// Which bucket to read a statistic from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeSelector {
    /// Every event on the timeline
    All,
    Year(i32),
    /// Three months of a year; combined on read, not cached separately
    Quarter(i32, u32),
    Month(i32, u32),
    Day(i32, u32, u32),
}

impl NodeSelector {
    pub fn year(year: i32) -> Self {
        NodeSelector::Year(year)
    }

    pub fn quarter(year: i32, quarter: u32) -> TimelineResult<Self> {
        if !(1..=4).contains(&quarter) {
            return Err(TimelineError::InvalidQuarter(quarter));
        }
        Ok(NodeSelector::Quarter(year, quarter))
    }

    pub fn month(year: i32, month: u32) -> TimelineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(TimelineError::InvalidDate {
                year,
                month,
                day: 1,
            });
        }
        Ok(NodeSelector::Month(year, month))
    }

    pub fn day(year: i32, month: u32, day: u32) -> TimelineResult<Self> {
        let date = CalendarDate::new(year, month, day)?;
        Ok(Self::from(date))
    }
}

impl From<CalendarDate> for NodeSelector {
    fn from(date: CalendarDate) -> Self {
        NodeSelector::Day(date.year(), date.month(), date.day())
    }
}

impl fmt::Display for NodeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeSelector::All => write!(f, "all"),
            NodeSelector::Year(y) => write!(f, "{:04}", y),
            NodeSelector::Quarter(y, q) => write!(f, "{:04}-Q{}", y, q),
            NodeSelector::Month(y, m) => write!(f, "{:04}-{:02}", y, m),
            NodeSelector::Day(y, m, d) => write!(f, "{:04}-{:02}-{:02}", y, m, d),
        }
    }
}
