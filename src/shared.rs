//! Thread-safe timeline handle
//!
//! [`Timeline`] itself has no internal locking: writes need `&mut self`.
//! `SharedTimeline` serializes writers behind an `RwLock` while letting any
//! number of readers query and read stats together.

use crate::aggregate::{NodeSelector, Stat};
use crate::error::TimelineResult;
use crate::timeline::{Event, EventId, IndexConfig, TimeCriteria, Timeline, TimelineStats};
use std::sync::{Arc, RwLock};

/// Cloneable handle to a timeline shared across threads
pub struct SharedTimeline<T> {
    inner: Arc<RwLock<Timeline<T>>>,
}

impl<T> Clone for SharedTimeline<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SharedTimeline<T> {
    pub fn new(timeline: Timeline<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(timeline)),
        }
    }

    /// Create an empty shared timeline
    pub fn with_config(
        extract: impl Fn(&T) -> f64 + Send + Sync + 'static,
        config: IndexConfig,
    ) -> Self {
        Self::new(Timeline::with_config(extract, config))
    }

    /// Insert under the write lock
    pub fn insert(&self, event: Event<T>) -> TimelineResult<EventId> {
        let mut timeline = self.inner.write()?;
        Ok(timeline.insert(event))
    }

    /// Insert a batch under a single write lock
    pub fn insert_batch(
        &self,
        events: impl IntoIterator<Item = Event<T>>,
    ) -> TimelineResult<usize> {
        let mut timeline = self.inner.write()?;
        let before = timeline.len();
        timeline.extend(events);
        Ok(timeline.len() - before)
    }

    /// Run `f` against the timeline under the read lock
    ///
    /// Lazy query results borrow the timeline, so they are consumed inside `f`.
    pub fn read<R>(&self, f: impl FnOnce(&Timeline<T>) -> R) -> TimelineResult<R> {
        let timeline = self.inner.read()?;
        Ok(f(&timeline))
    }

    pub fn stat(&self, selector: NodeSelector) -> TimelineResult<Stat> {
        self.read(|timeline| timeline.stat(selector))
    }

    pub fn len(&self) -> TimelineResult<usize> {
        self.read(|timeline| timeline.len())
    }

    pub fn is_empty(&self) -> TimelineResult<bool> {
        self.read(|timeline| timeline.is_empty())
    }

    pub fn stats(&self) -> TimelineResult<TimelineStats> {
        self.read(|timeline| timeline.stats())
    }
}

impl<T: Clone> SharedTimeline<T> {
    /// Materialize a range query under the read lock
    pub fn collect(&self, criteria: &TimeCriteria) -> TimelineResult<Vec<Event<T>>> {
        self.read(|timeline| timeline.query(criteria).cloned().collect())
    }
}

impl SharedTimeline<f64> {
    pub fn numeric() -> Self {
        Self::new(Timeline::numeric())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::in_date;
    use std::thread;

    #[test]
    fn test_insert_and_read() {
        let shared = SharedTimeline::numeric();
        shared.insert(Event::on(2020, 1, 1, 2.0).unwrap()).unwrap();
        shared.insert(Event::on(2019, 1, 1, 1.0).unwrap()).unwrap();

        assert_eq!(shared.len().unwrap(), 2);
        let events = shared.collect(&TimeCriteria::default()).unwrap();
        assert_eq!(events[0].date().year(), 2019);
        assert_eq!(shared.stat(NodeSelector::All).unwrap().sum, 3.0);
    }

    #[test]
    fn test_concurrent_writers_are_serialized() {
        let shared = SharedTimeline::numeric();

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for day in 1..=25 {
                        let event = Event::on(2020, worker + 1, day, 1.0).unwrap();
                        shared.insert(event).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.len().unwrap(), 100);
        assert_eq!(shared.stat(NodeSelector::Year(2020)).unwrap().count, 100);
        assert_eq!(shared.stat(NodeSelector::Quarter(2020, 2)).unwrap().count, 25);

        let dates: Vec<_> = shared
            .collect(&TimeCriteria::default())
            .unwrap()
            .iter()
            .map(|e| e.date())
            .collect();
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_concurrent_readers_share_cached_stats() {
        let shared = SharedTimeline::numeric();
        let inserted = shared
            .insert_batch((1..=12).map(|m| Event::on(2021, m, 1, m as f64).unwrap()))
            .unwrap();
        assert_eq!(inserted, 12);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || shared.stat(NodeSelector::Year(2021)).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Stat { count: 12, sum: 78.0 });
        }

        let cached = shared
            .read(|timeline| timeline.is_cached(NodeSelector::Year(2021)))
            .unwrap();
        assert!(cached);

        let march = shared.collect(&in_date(2021, Some(3), None).unwrap()).unwrap();
        assert_eq!(march.len(), 1);
    }
}
