//! Temporal event index
//!
//! [`Timeline`] keeps date-stamped events in chronological order and answers
//! range queries and calendar roll-ups:
//!
//! - **chain**: doubly linked, date-ordered event list with sentinels
//! - **seek**: sparse year/month/day anchors into the chain
//! - **query**: lazy iterator over a range
//! - **aggregate cache** (see [`crate::aggregate`]): memoized stats per bucket
//!
//! # Write / read paths
//!
//! ```text
//! insert(event)
//!   → seek.find_offset(event.date)   anchor at or before the position
//!   → chain.insert(event, anchor)    splice after equal dates
//!   → seek.reindex(node)             move offsets earlier if needed
//!   → aggregates.add_event(node)     append to day, clear ancestors
//!
//! query(criteria)
//!   → seek.find_offset(from)         start node
//!   → Events                         walk `next` until `to` or REAR
//! ```
//!
//! All writes go through `&mut self`; reads only need `&self`. Cached stats
//! sit in `OnceLock` cells, so concurrent readers fold each bucket once.

mod chain;
pub mod criteria;
mod event;
mod query;
mod seek;

#[cfg(test)]
mod properties;

pub use chain::EventId;
pub use criteria::{all_events, in_date, in_range, since, until, TimeCriteria};
pub use event::Event;
pub use query::Events;

use crate::aggregate::{AggregateCache, NodeSelector, Stat};
use crate::calendar::{CalendarDate, DateBound};
use chain::{EventChain, HEAD, REAR};
use seek::{Anchor, SeekIndex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maps a payload to the number rolled up by the aggregate cache
pub type StatExtractor<T> = Box<dyn Fn(&T) -> f64 + Send + Sync>;

/// Configuration for a timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Maintain the seek index; when off, every scan starts at the head
    #[serde(default = "default_seek_index")]
    pub seek_index: bool,
}

fn default_seek_index() -> bool {
    true
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            seek_index: default_seek_index(),
        }
    }
}

/// Size figures for a timeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimelineStats {
    /// Number of events
    pub events: usize,
    /// Number of populated years
    pub years: usize,
    /// Populated seek buckets across all levels
    pub seek_buckets: usize,
    /// First and last event dates
    pub time_bounds: Option<(CalendarDate, CalendarDate)>,
}

impl fmt::Display for TimelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} events across {} years ({} seek buckets)",
            self.events, self.years, self.seek_buckets
        )?;
        if let Some((first, last)) = self.time_bounds {
            write!(f, ", {} to {}", first, last)?;
        }
        Ok(())
    }
}

/// Date-ordered event index with calendar roll-ups
pub struct Timeline<T> {
    chain: EventChain<T>,
    seek: SeekIndex,
    aggregates: AggregateCache,
    extract: StatExtractor<T>,
    config: IndexConfig,
}

impl<T> Timeline<T> {
    /// Create an empty timeline; `extract` supplies the value rolled up per event
    pub fn new(extract: impl Fn(&T) -> f64 + Send + Sync + 'static) -> Self {
        Self::with_config(extract, IndexConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(
        extract: impl Fn(&T) -> f64 + Send + Sync + 'static,
        config: IndexConfig,
    ) -> Self {
        Self {
            chain: EventChain::new(),
            seek: SeekIndex::new(),
            aggregates: AggregateCache::new(),
            extract: Box::new(extract),
            config,
        }
    }

    // ==================== Write Path ====================

    /// Insert an event in date order
    ///
    /// Events sharing a date keep their insertion order. Never fails.
    pub fn insert(&mut self, event: Event<T>) -> EventId {
        let date = event.date();

        let start = if self.config.seek_index {
            self.start_of(self.seek.find_offset(&DateBound::from(date)))
        } else {
            HEAD
        };

        let id = self.chain.insert(event, start);

        if self.config.seek_index {
            self.seek.reindex(date, id);
        }
        self.aggregates.add_event(date, id);

        tracing::trace!(%date, id, "Inserted event");
        id
    }

    // ==================== Query Methods ====================

    /// Events matching `criteria`, lazily, in chronological order
    ///
    /// Each call walks the live chain. An inverted range yields nothing.
    pub fn query(&self, criteria: &TimeCriteria) -> Events<'_, T> {
        let upper = criteria.upper();

        let Some(from) = criteria.from else {
            return Events::new(&self.chain, self.chain.next(HEAD), upper);
        };

        let lower = from.lower();
        if upper.is_some_and(|upper| upper < lower) {
            return Events::empty(&self.chain);
        }

        let anchor = if self.config.seek_index {
            self.seek.find_offset(&from)
        } else {
            Anchor::Unset
        };
        let start = self.chain.skip_before(lower, self.start_of(anchor));

        Events::new(&self.chain, start, upper)
    }

    /// Every event, in chronological order
    pub fn events(&self) -> Events<'_, T> {
        self.query(&TimeCriteria::default())
    }

    /// Roll-up statistic for a bucket
    pub fn stat(&self, selector: NodeSelector) -> Stat {
        let value_of = |id: EventId| {
            self.chain
                .event(id)
                .map_or(0.0, |event| (self.extract)(event.payload()))
        };
        self.aggregates.stat(selector, &value_of)
    }

    /// Check whether `stat(selector)` would be served from cache
    pub fn is_cached(&self, selector: NodeSelector) -> bool {
        self.aggregates.is_cached(selector)
    }

    /// Events dated exactly on a day, in insertion order
    pub fn day_events(
        &self,
        year: i32,
        month: u32,
        day: u32,
    ) -> impl Iterator<Item = &Event<T>> + '_ {
        self.aggregates
            .day_events(year, month, day)
            .iter()
            .filter_map(|&id| self.chain.event(id))
    }

    /// Event stored under an id returned by [`Timeline::insert`]
    pub fn get(&self, id: EventId) -> Option<&Event<T>> {
        self.chain.event(id)
    }

    /// Populated years, ascending
    pub fn years(&self) -> Vec<i32> {
        self.aggregates.years()
    }

    /// Populated months of a year, ascending
    pub fn months(&self, year: i32) -> Vec<u32> {
        self.aggregates.months(year)
    }

    /// Populated days of a month, ascending
    pub fn days(&self, year: i32, month: u32) -> Vec<u32> {
        self.aggregates.days(year, month)
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Earliest event
    pub fn first(&self) -> Option<&Event<T>> {
        self.chain.first()
    }

    /// Latest event
    pub fn last(&self) -> Option<&Event<T>> {
        self.chain.last()
    }

    /// Dates of the earliest and latest events
    pub fn time_bounds(&self) -> Option<(CalendarDate, CalendarDate)> {
        Some((self.first()?.date(), self.last()?.date()))
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn stats(&self) -> TimelineStats {
        TimelineStats {
            events: self.len(),
            years: self.years().len(),
            seek_buckets: self.seek.bucket_count(),
            time_bounds: self.time_bounds(),
        }
    }

    fn start_of(&self, anchor: Anchor) -> EventId {
        match anchor {
            Anchor::Unset => HEAD,
            Anchor::At(id) => id,
            Anchor::Exhausted => REAR,
        }
    }
}

impl Timeline<f64> {
    /// Timeline whose payload is the rolled-up value itself
    pub fn numeric() -> Self {
        Self::new(|value: &f64| *value)
    }
}

impl<T> Extend<Event<T>> for Timeline<T> {
    fn extend<I: IntoIterator<Item = Event<T>>>(&mut self, iter: I) {
        for event in iter {
            self.insert(event);
        }
    }
}

impl FromIterator<Event<f64>> for Timeline<f64> {
    fn from_iter<I: IntoIterator<Item = Event<f64>>>(iter: I) -> Self {
        let mut timeline = Timeline::numeric();
        timeline.extend(iter);
        timeline
    }
}

impl<T> fmt::Debug for Timeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("events", &self.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
