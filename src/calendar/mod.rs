//! Calendar routing
//!
//! Pure date → (year, month, day) decomposition shared by the seek index and
//! the aggregate cache. Both trees route an event down the same
//! year → month → day path, so the sizing rules live here once:
//!
//! ```text
//! year   (unbounded, sorted)
//!  └─ month  [12]
//!      └─ day [28..=31]  (days_in_month, leap-year aware)
//! ```

mod bound;
mod date;
mod tree;

pub use bound::DateBound;
pub use date::CalendarDate;
pub use tree::Level;
pub(crate) use tree::{BucketId, CalendarTree};

use chrono::{Months, NaiveDate};

/// Number of month buckets under a year
pub const MONTHS_PER_YEAR: usize = 12;

/// Year component of a date
pub fn year_of(date: CalendarDate) -> i32 {
    date.year()
}

/// Month component of a date (1-12)
pub fn month_of(date: CalendarDate) -> u32 {
    date.month()
}

/// Day-of-month component of a date (1-31)
pub fn day_of(date: CalendarDate) -> u32 {
    date.day()
}

/// Quarter a date falls in (1-4)
pub fn quarter_of(date: CalendarDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

/// Months covered by a quarter, as an inclusive range
pub fn quarter_months(quarter: u32) -> std::ops::RangeInclusive<u32> {
    let first = (quarter - 1) * 3 + 1;
    first..=first + 2
}

/// Whether February of `year` has 29 days
pub fn is_leap_year(year: i32) -> bool {
    days_in_month(year, 2) == 29
}

/// Number of days in `month` of `year`
///
/// Returns 0 for a month outside 1-12 or a year chrono cannot represent.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next.signed_duration_since(first).num_days() as u32,
        // December of the last representable year
        None => 31,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2021, 1), 31);
        assert_eq!(days_in_month(2021, 4), 30);
        assert_eq!(days_in_month(2021, 2), 28);
        assert_eq!(days_in_month(2020, 2), 29);
        assert_eq!(days_in_month(2021, 13), 0);
        assert_eq!(days_in_month(2021, 0), 0);
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2020));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2021));
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2100, 2), 28);
        assert_eq!(days_in_month(-4, 2), 29);
        assert_eq!(days_in_month(2020, 12), 31);
    }

    #[test]
    fn test_decomposition() {
        let date = CalendarDate::new(2020, 7, 25).unwrap();
        assert_eq!(year_of(date), 2020);
        assert_eq!(month_of(date), 7);
        assert_eq!(day_of(date), 25);
        assert_eq!(quarter_of(date), 3);
    }

    #[test]
    fn test_quarters() {
        let q = |m| quarter_of(CalendarDate::new(2021, m, 1).unwrap());
        assert_eq!(q(1), 1);
        assert_eq!(q(3), 1);
        assert_eq!(q(4), 2);
        assert_eq!(q(9), 3);
        assert_eq!(q(12), 4);

        assert_eq!(quarter_months(1).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(quarter_months(4).collect::<Vec<_>>(), vec![10, 11, 12]);
    }
}
