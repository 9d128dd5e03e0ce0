//! Roll-up statistics

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Count and sum of the values under a bucket
///
/// Only `count` and `sum` are stored and combined. The average is derived on
/// read, so merging unevenly sized buckets never averages averages.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stat {
    pub count: u64,
    pub sum: f64,
}

impl Stat {
    /// Identity for [`Stat::combine`]
    pub const ZERO: Stat = Stat { count: 0, sum: 0.0 };

    /// Fold raw values
    pub fn of(values: impl IntoIterator<Item = f64>) -> Self {
        values.into_iter().fold(Self::ZERO, |acc, v| Stat {
            count: acc.count + 1,
            sum: acc.sum + v,
        })
    }

    /// Associative, commutative merge
    pub fn combine(self, other: Stat) -> Stat {
        Stat {
            count: self.count + other.count,
            sum: self.sum + other.sum,
        }
    }

    /// `sum / count`, or `None` for an empty bucket
    pub fn avg(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Snapshot including the derived average
    pub fn summary(&self) -> StatSummary {
        StatSummary {
            count: self.count,
            sum: self.sum,
            avg: self.avg(),
        }
    }
}

impl Add for Stat {
    type Output = Stat;

    fn add(self, rhs: Stat) -> Stat {
        self.combine(rhs)
    }
}

impl Sum for Stat {
    fn sum<I: Iterator<Item = Stat>>(iter: I) -> Self {
        iter.fold(Stat::ZERO, Stat::combine)
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.avg() {
            Some(avg) => write!(f, "count={} sum={} avg={:.4}", self.count, self.sum, avg),
            None => write!(f, "count=0 sum={} avg=n/a", self.sum),
        }
    }
}

/// Read-side view of a [`Stat`] with its average resolved
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatSummary {
    pub count: u64,
    pub sum: f64,
    pub avg: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_of_values() {
        let stat = Stat::of([1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(stat.count, 5);
        assert_eq!(stat.sum, 15.0);
        assert_eq!(stat.avg(), Some(3.0));
    }

    #[test]
    fn test_empty_has_no_average() {
        let stat = Stat::of(std::iter::empty());
        assert_eq!(stat, Stat::ZERO);
        assert!(stat.is_empty());
        assert_eq!(stat.avg(), None);
        assert_eq!(stat.to_string(), "count=0 sum=0 avg=n/a");
    }

    #[test]
    fn test_combine_identity_and_commutativity() {
        let a = Stat::of([1.0, 2.0]);
        let b = Stat::of([10.0]);

        assert_eq!(a.combine(Stat::ZERO), a);
        assert_eq!(Stat::ZERO.combine(a), a);
        assert_eq!(a.combine(b), b.combine(a));
        assert_eq!(a + b, Stat { count: 3, sum: 13.0 });
    }

    #[test]
    fn test_no_average_of_averages() {
        // avg 2.0 over 3 values, avg 10.0 over 1 value
        let small = Stat::of([1.0, 2.0, 3.0]);
        let large = Stat::of([10.0]);

        let combined: Stat = [small, large].into_iter().sum();
        assert_eq!(combined.avg(), Some(4.0));

        let mean_of_means = (small.avg().unwrap() + large.avg().unwrap()) / 2.0;
        assert_eq!(mean_of_means, 6.0);
        assert_ne!(combined.avg(), Some(mean_of_means));
    }

    #[test]
    fn test_summary_serialization() {
        let json = serde_json::to_value(Stat::of([2.0, 4.0]).summary()).unwrap();
        assert_eq!(json["count"], 2);
        assert_eq!(json["sum"], 6.0);
        assert_eq!(json["avg"], 3.0);

        let json = serde_json::to_value(Stat::ZERO.summary()).unwrap();
        assert!(json["avg"].is_null());
    }
}
