//! Aggregate cache
//!
//! A year → month → day tree of memoized [`Stat`]s. Writes invalidate
//! eagerly and reads recompute lazily:
//!
//! ```text
//! add_event(2020-03-12)            stat(Year 2020)
//!   day 12   : push id, clear        year  : cached? return
//!   month 03 : clear                   └─ combine(month stats)
//!   year 2020: clear                         └─ combine(day stats)
//!                                                  └─ fold(day events)
//! ```
//!
//! A cleared cell stays empty until the next read, which recomputes only the
//! cleared path and reuses every sibling that is still cached.

use super::selector::NodeSelector;
use super::stat::Stat;
use crate::calendar::{quarter_months, BucketId, CalendarDate, CalendarTree, Level};
use crate::timeline::EventId;
use std::sync::OnceLock;

#[derive(Default)]
struct AggregateSlot {
    /// Empty means dirty
    stat: OnceLock<Stat>,
    /// Chain ids of the events routed to this day, in insertion order.
    /// Always empty above the day level.
    events: Vec<EventId>,
}

/// Memoized roll-ups keyed by calendar bucket
///
/// Values are looked up through a caller-supplied function at day leaves, so
/// the cache holds event ids rather than payloads.
#[derive(Default)]
pub struct AggregateCache {
    tree: CalendarTree<AggregateSlot>,
}

impl AggregateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route an event to its day bucket and clear the cached stats above it
    pub fn add_event(&mut self, date: CalendarDate, id: EventId) {
        let path = self.tree.route(date);
        self.tree.node_mut(path.day).data.events.push(id);
        self.invalidate(path.day);
    }

    /// Clear `bucket` and every ancestor up to its year
    fn invalidate(&mut self, bucket: BucketId) {
        let mut cursor = Some(bucket);
        while let Some(id) = cursor {
            let node = self.tree.node_mut(id);
            node.data.stat.take();
            cursor = node.parent;
        }
    }

    /// Statistic for a bucket; unpopulated buckets yield [`Stat::ZERO`]
    pub fn stat(&self, selector: NodeSelector, value_of: &dyn Fn(EventId) -> f64) -> Stat {
        match selector {
            NodeSelector::All => self
                .tree
                .years()
                .iter()
                .map(|&(_, id)| self.bucket_stat(id, value_of))
                .sum(),
            NodeSelector::Quarter(year, quarter) if (1..=4).contains(&quarter) => {
                quarter_months(quarter)
                    .filter_map(|m| self.tree.find_month(year, m))
                    .map(|id| self.bucket_stat(id, value_of))
                    .sum()
            }
            NodeSelector::Quarter(..) => Stat::ZERO,
            _ => self
                .bucket(selector)
                .map(|id| self.bucket_stat(id, value_of))
                .unwrap_or(Stat::ZERO),
        }
    }

    /// Check whether reading `selector` would be served from cache
    ///
    /// Quarters and `All` are cached when every populated bucket they combine
    /// is. Unpopulated buckets report `false`.
    pub fn is_cached(&self, selector: NodeSelector) -> bool {
        let cached = |id: BucketId| self.tree.node(id).data.stat.get().is_some();

        match selector {
            NodeSelector::All => {
                !self.tree.years().is_empty() && self.tree.years().iter().all(|&(_, id)| cached(id))
            }
            NodeSelector::Quarter(year, quarter) if (1..=4).contains(&quarter) => {
                let months: Vec<BucketId> = quarter_months(quarter)
                    .filter_map(|m| self.tree.find_month(year, m))
                    .collect();
                !months.is_empty() && months.into_iter().all(cached)
            }
            NodeSelector::Quarter(..) => false,
            _ => self.bucket(selector).is_some_and(cached),
        }
    }

    /// Event ids stored at a day leaf, in insertion order
    pub fn day_events(&self, year: i32, month: u32, day: u32) -> &[EventId] {
        self.tree
            .find_day(year, month, day)
            .map(|id| self.tree.node(id).data.events.as_slice())
            .unwrap_or(&[])
    }

    /// Populated years, ascending
    pub fn years(&self) -> Vec<i32> {
        self.tree.years().iter().map(|(y, _)| *y).collect()
    }

    /// Populated months of a year, ascending
    pub fn months(&self, year: i32) -> Vec<u32> {
        self.tree
            .find_year(year)
            .map(|id| self.units(id))
            .unwrap_or_default()
    }

    /// Populated days of a month, ascending
    pub fn days(&self, year: i32, month: u32) -> Vec<u32> {
        self.tree
            .find_month(year, month)
            .map(|id| self.units(id))
            .unwrap_or_default()
    }

    fn units(&self, id: BucketId) -> Vec<u32> {
        self.tree
            .node(id)
            .populated()
            .map(|child| self.tree.node(child).unit as u32)
            .collect()
    }

    fn bucket(&self, selector: NodeSelector) -> Option<BucketId> {
        match selector {
            NodeSelector::Year(y) => self.tree.find_year(y),
            NodeSelector::Month(y, m) => self.tree.find_month(y, m),
            NodeSelector::Day(y, m, d) => self.tree.find_day(y, m, d),
            NodeSelector::All | NodeSelector::Quarter(..) => None,
        }
    }

    fn bucket_stat(&self, id: BucketId, value_of: &dyn Fn(EventId) -> f64) -> Stat {
        let node = self.tree.node(id);

        *node.data.stat.get_or_init(|| {
            tracing::trace!(level = %node.level, unit = node.unit, "Recomputing stat");
            match node.level {
                Level::Day => Stat::of(node.data.events.iter().map(|&ev| value_of(ev))),
                Level::Year | Level::Month => node
                    .populated()
                    .map(|child| self.bucket_stat(child, value_of))
                    .sum(),
            }
        })
    }
}
