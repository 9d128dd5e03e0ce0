//! Seek index
//!
//! Sparse year → month → day tree of anchors into the event chain. Each
//! bucket remembers the earliest chain node ever routed under it. Lower-bound
//! lookups descend the tree instead of scanning the chain from the head.
//!
//! The index is only a seek aid: range results are decided by the chain order
//! and the query's own bound checks. An anchor may be looser than necessary
//! but never lies past the first matching node.

use super::chain::EventId;
use crate::calendar::{BucketId, CalendarDate, CalendarTree, DateBound};

/// Where a lower-bound scan should start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Nothing indexed; scan from the first node
    Unset,
    /// Earliest node of the first populated bucket at or after the bound
    At(EventId),
    /// Every indexed event precedes the bound
    Exhausted,
}

#[derive(Default)]
struct Offset {
    /// Earliest indexed node under this bucket, with its date
    earliest: Option<(CalendarDate, EventId)>,
}

#[derive(Default)]
pub(crate) struct SeekIndex {
    tree: CalendarTree<Offset>,
}

impl SeekIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly inserted chain node on its year/month/day path
    ///
    /// Offsets only ever move to an earlier date. Equal dates keep the first
    /// node, which is also first in chain order.
    pub fn reindex(&mut self, date: CalendarDate, id: EventId) {
        let path = self.tree.route(date);

        for bucket in [path.year, path.month, path.day] {
            let offset = &mut self.tree.node_mut(bucket).data;
            match offset.earliest {
                Some((earliest, _)) if earliest <= date => {}
                _ => offset.earliest = Some((date, id)),
            }
        }
    }

    /// Find the scan start for a lower bound
    ///
    /// Descends at progressively finer granularity. When the exact month or
    /// day holds no events, falls through to the next populated sibling, then
    /// to the next populated year.
    pub fn find_offset(&self, bound: &DateBound) -> Anchor {
        let years = self.tree.years();
        if years.is_empty() {
            return Anchor::Unset;
        }

        let year = bound.year_value();
        let pos = self.tree.year_position(year);
        let Some(&(found, year_id)) = years.get(pos) else {
            return Anchor::Exhausted;
        };

        if found > year {
            return self.anchor(year_id);
        }

        let anchor = match bound.month_value() {
            None => Some(self.anchor(year_id)),
            Some(month) => self.first_in_year(year_id, month, bound.day_value()),
        };

        anchor.unwrap_or_else(|| match years.get(pos + 1) {
            Some(&(_, next_year)) => self.anchor(next_year),
            None => Anchor::Exhausted,
        })
    }

    /// Number of populated buckets across all levels
    pub fn bucket_count(&self) -> usize {
        self.tree.bucket_count()
    }

    fn first_in_year(&self, year_id: BucketId, month: u32, day: Option<u32>) -> Option<Anchor> {
        let year = self.tree.node(year_id);

        for m in month..=year.children.len() as u32 {
            let Some(month_id) = year.child(m) else {
                continue;
            };

            match day {
                Some(d) if m == month => {
                    if let Some(anchor) = self.first_in_month(month_id, d) {
                        return Some(anchor);
                    }
                }
                _ => return Some(self.anchor(month_id)),
            }
        }

        None
    }

    fn first_in_month(&self, month_id: BucketId, day: u32) -> Option<Anchor> {
        let month = self.tree.node(month_id);
        (day..=month.children.len() as u32)
            .find_map(|d| month.child(d))
            .map(|day_id| self.anchor(day_id))
    }

    fn anchor(&self, bucket: BucketId) -> Anchor {
        match self.tree.node(bucket).data.earliest {
            Some((date, id)) => {
                tracing::trace!(%date, id, "Seek anchor");
                Anchor::At(id)
            }
            None => Anchor::Unset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::new(y, m, d).unwrap()
    }

    /// Index nodes with ids 10, 11, ... in the given order
    fn index(dates: &[(i32, u32, u32)]) -> SeekIndex {
        let mut seek = SeekIndex::new();
        for (i, &(y, m, d)) in dates.iter().enumerate() {
            seek.reindex(date(y, m, d), 10 + i);
        }
        seek
    }

    #[test]
    fn test_empty_index_is_unset() {
        let seek = SeekIndex::new();
        assert_eq!(seek.find_offset(&DateBound::year(2020).unwrap()), Anchor::Unset);
    }

    #[test]
    fn test_exact_buckets() {
        let seek = index(&[(2020, 1, 6), (2020, 3, 12), (2020, 1, 1)]);

        assert_eq!(seek.find_offset(&DateBound::year(2020).unwrap()), Anchor::At(12));
        assert_eq!(seek.find_offset(&DateBound::month(2020, 1).unwrap()), Anchor::At(12));
        assert_eq!(seek.find_offset(&DateBound::day(2020, 1, 6).unwrap()), Anchor::At(10));
        assert_eq!(seek.find_offset(&DateBound::month(2020, 3).unwrap()), Anchor::At(11));
    }

    #[test]
    fn test_offset_only_moves_earlier() {
        let seek = index(&[(2020, 5, 5), (2020, 5, 5), (2020, 5, 9)]);

        // Equal date keeps the first node
        assert_eq!(seek.find_offset(&DateBound::day(2020, 5, 5).unwrap()), Anchor::At(10));
        // A later date never replaces the month offset
        assert_eq!(seek.find_offset(&DateBound::month(2020, 5).unwrap()), Anchor::At(10));
        assert_eq!(seek.find_offset(&DateBound::day(2020, 5, 9).unwrap()), Anchor::At(12));
    }

    #[test]
    fn test_falls_through_to_next_sibling() {
        let seek = index(&[(2020, 1, 1), (2020, 3, 12), (2020, 7, 25)]);

        assert_eq!(seek.find_offset(&DateBound::month(2020, 2).unwrap()), Anchor::At(11));
        assert_eq!(seek.find_offset(&DateBound::day(2020, 3, 13).unwrap()), Anchor::At(12));
        assert_eq!(seek.find_offset(&DateBound::day(2020, 1, 2).unwrap()), Anchor::At(11));
    }

    #[test]
    fn test_falls_through_to_next_year() {
        let seek = index(&[(2020, 12, 31), (2021, 3, 12), (2019, 10, 18)]);

        assert_eq!(seek.find_offset(&DateBound::month(2019, 11).unwrap()), Anchor::At(10));
        assert_eq!(seek.find_offset(&DateBound::day(2020, 12, 31).unwrap()), Anchor::At(10));
        assert_eq!(seek.find_offset(&DateBound::month(2020, 12).unwrap()), Anchor::At(10));
        assert_eq!(seek.find_offset(&DateBound::year(2018).unwrap()), Anchor::At(12));
    }

    #[test]
    fn test_gap_year_uses_next_year_offset() {
        let seek = index(&[(2019, 10, 18), (2021, 8, 3), (2021, 3, 12)]);
        assert_eq!(seek.find_offset(&DateBound::month(2020, 6).unwrap()), Anchor::At(12));
    }

    #[test]
    fn test_past_every_year_is_exhausted() {
        let seek = index(&[(2020, 1, 1), (2021, 3, 12)]);
        assert_eq!(seek.find_offset(&DateBound::year(2022).unwrap()), Anchor::Exhausted);
        assert_eq!(seek.find_offset(&DateBound::month(2021, 4).unwrap()), Anchor::Exhausted);
    }

    #[test]
    fn test_bucket_count() {
        let seek = index(&[(2020, 1, 1), (2020, 1, 1), (2020, 1, 2), (2021, 1, 2)]);
        // 2020, 2020-01, 2020-01-01, 2020-01-02, 2021, 2021-01, 2021-01-02
        assert_eq!(seek.bucket_count(), 7);
    }
}
