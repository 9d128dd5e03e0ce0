//! Timeline error types
//!
//! The index itself is total over well-formed input: inserting never fails,
//! empty or inverted ranges yield an empty sequence and unpopulated buckets
//! yield the zero stat. Errors only arise while constructing dates, bounds
//! and selectors, or when a shared lock has been poisoned.

use thiserror::Error;

/// Errors raised around the timeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    /// Month or day out of calendar range
    #[error("Invalid date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// Quarter number outside 1..=4
    #[error("Invalid quarter: Q{0} (expected 1-4)")]
    InvalidQuarter(u32),

    /// Text could not be read as a date or date bound
    #[error("Could not parse date: {0}")]
    ParseDate(String),

    /// A writer panicked while holding the shared timeline lock
    #[error("Lock error: {0}")]
    Poisoned(String),
}

/// Result type for timeline operations
pub type TimelineResult<T> = Result<T, TimelineError>;

impl<T> From<std::sync::PoisonError<T>> for TimelineError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        TimelineError::Poisoned(err.to_string())
    }
}
