//! Range criteria for timeline queries

use crate::calendar::{CalendarDate, DateBound};
use crate::error::TimelineResult;

/// Lower and upper date bounds for a query
///
/// An absent side is unbounded. Bounds are inclusive and resolve partial
/// dates per side (see [`DateBound`]). A range whose upper bound precedes
/// its lower bound is valid and matches nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeCriteria {
    pub from: Option<DateBound>,
    pub to: Option<DateBound>,
}

impl TimeCriteria {
    pub fn new(from: Option<DateBound>, to: Option<DateBound>) -> Self {
        Self { from, to }
    }

    /// First date a matching event may carry
    pub fn lower(&self) -> Option<CalendarDate> {
        self.from.map(|b| b.lower())
    }

    /// Last date a matching event may carry
    pub fn upper(&self) -> Option<CalendarDate> {
        self.to.map(|b| b.upper())
    }

    /// Check if a date falls within both bounds
    pub fn contains(&self, date: CalendarDate) -> bool {
        self.lower().map_or(true, |lo| date >= lo) && self.upper().map_or(true, |hi| date <= hi)
    }
}

/// Every event on the timeline
pub fn all_events() -> TimeCriteria {
    TimeCriteria::default()
}

/// Events within a single year, month or day
pub fn in_date(year: i32, month: Option<u32>, day: Option<u32>) -> TimelineResult<TimeCriteria> {
    let bound = DateBound::new(year, month, day)?;
    Ok(TimeCriteria::new(Some(bound), Some(bound)))
}

/// Events on or after the given bound
pub fn since(year: i32, month: Option<u32>, day: Option<u32>) -> TimelineResult<TimeCriteria> {
    Ok(TimeCriteria::new(Some(DateBound::new(year, month, day)?), None))
}

/// Events on or before the given bound
pub fn until(year: i32, month: Option<u32>, day: Option<u32>) -> TimelineResult<TimeCriteria> {
    Ok(TimeCriteria::new(None, Some(DateBound::new(year, month, day)?)))
}

/// Events between two bounds, both inclusive
pub fn in_range(from: DateBound, to: DateBound) -> TimeCriteria {
    TimeCriteria::new(Some(from), Some(to))
}
