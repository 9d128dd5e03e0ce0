//! Sparse year → month → day bucket tree
//!
//! Shared shape for the seek index and the aggregate cache. Nodes live in an
//! arena and refer to each other by index, so parent back-references carry no
//! ownership. Buckets are created on first use and never removed.

use super::{days_in_month, CalendarDate, MONTHS_PER_YEAR};
use std::fmt;

/// Arena index of a bucket
pub(crate) type BucketId = usize;

/// Granularity of a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Year,
    Month,
    Day,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Year => write!(f, "year"),
            Level::Month => write!(f, "month"),
            Level::Day => write!(f, "day"),
        }
    }
}

/// One populated bucket
pub(crate) struct CalendarNode<V> {
    pub level: Level,
    /// Year number, month number (1-12) or day number (1-31)
    pub unit: i32,
    pub parent: Option<BucketId>,
    /// Slot `n - 1` holds the child for month/day `n`; empty at day level
    pub children: Box<[Option<BucketId>]>,
    pub data: V,
}

impl<V> CalendarNode<V> {
    /// Populated children in calendar order
    pub fn populated(&self) -> impl Iterator<Item = BucketId> + '_ {
        self.children.iter().flatten().copied()
    }

    /// Child for `unit`, if populated
    pub fn child(&self, unit: u32) -> Option<BucketId> {
        let idx = (unit as usize).checked_sub(1)?;
        self.children.get(idx).copied().flatten()
    }
}

/// Ids of the three buckets an event routes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BucketPath {
    pub year: BucketId,
    pub month: BucketId,
    pub day: BucketId,
}

pub(crate) struct CalendarTree<V> {
    nodes: Vec<CalendarNode<V>>,
    /// Year buckets sorted ascending; the only unbounded level
    years: Vec<(i32, BucketId)>,
}

impl<V> Default for CalendarTree<V> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            years: Vec::new(),
        }
    }
}

impl<V> CalendarTree<V> {
    pub fn node(&self, id: BucketId) -> &CalendarNode<V> {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: BucketId) -> &mut CalendarNode<V> {
        &mut self.nodes[id]
    }

    /// Number of populated buckets across all levels
    pub fn bucket_count(&self) -> usize {
        self.nodes.len()
    }

    /// Populated years, ascending
    pub fn years(&self) -> &[(i32, BucketId)] {
        &self.years
    }

    /// Position of the first indexed year `>= year` in [`Self::years`]
    pub fn year_position(&self, year: i32) -> usize {
        self.years.partition_point(|(y, _)| *y < year)
    }

    pub fn find_year(&self, year: i32) -> Option<BucketId> {
        self.years
            .binary_search_by_key(&year, |(y, _)| *y)
            .ok()
            .map(|pos| self.years[pos].1)
    }

    pub fn find_month(&self, year: i32, month: u32) -> Option<BucketId> {
        self.find_year(year)
            .and_then(|id| self.nodes[id].child(month))
    }

    pub fn find_day(&self, year: i32, month: u32, day: u32) -> Option<BucketId> {
        self.find_month(year, month)
            .and_then(|id| self.nodes[id].child(day))
    }
}

impl<V: Default> CalendarTree<V> {
    /// Route a date to its day bucket, creating missing buckets on the way
    pub fn route(&mut self, date: CalendarDate) -> BucketPath {
        let year = self.year_bucket(date.year());
        let month = self.child_bucket(year, date.month());
        let day = self.child_bucket(month, date.day());
        BucketPath { year, month, day }
    }

    fn year_bucket(&mut self, year: i32) -> BucketId {
        match self.years.binary_search_by_key(&year, |(y, _)| *y) {
            Ok(pos) => self.years[pos].1,
            Err(pos) => {
                let id = self.push_node(Level::Year, year, None, MONTHS_PER_YEAR);
                self.years.insert(pos, (year, id));
                tracing::debug!(year, years = self.years.len(), "Indexed new year");
                id
            }
        }
    }

    fn child_bucket(&mut self, parent: BucketId, unit: u32) -> BucketId {
        if let Some(id) = self.nodes[parent].child(unit) {
            return id;
        }

        let (level, capacity) = match self.nodes[parent].level {
            Level::Year => {
                let year = self.nodes[parent].unit;
                (Level::Month, days_in_month(year, unit) as usize)
            }
            Level::Month | Level::Day => (Level::Day, 0),
        };

        let id = self.push_node(level, unit as i32, Some(parent), capacity);
        self.nodes[parent].children[unit as usize - 1] = Some(id);
        id
    }

    fn push_node(
        &mut self,
        level: Level,
        unit: i32,
        parent: Option<BucketId>,
        capacity: usize,
    ) -> BucketId {
        let id = self.nodes.len();
        self.nodes.push(CalendarNode {
            level,
            unit,
            parent,
            children: vec![None; capacity].into_boxed_slice(),
            data: V::default(),
        });
        id
    }
}
