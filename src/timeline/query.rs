//! Lazy range results

use super::chain::{EventChain, EventId, REAR};
use super::event::Event;
use crate::calendar::CalendarDate;
use std::iter::FusedIterator;

/// Events of a range query, in chain order
///
/// Produced lazily by following `next` links from the seek anchor until the
/// upper bound or the rear sentinel. Nothing is buffered: a new query re-walks
/// the live chain. Cloning yields an independent replay from the current
/// position.
pub struct Events<'a, T> {
    chain: &'a EventChain<T>,
    cursor: EventId,
    upper: Option<CalendarDate>,
}

impl<'a, T> Events<'a, T> {
    pub(crate) fn new(
        chain: &'a EventChain<T>,
        start: EventId,
        upper: Option<CalendarDate>,
    ) -> Self {
        Self {
            chain,
            cursor: start,
            upper,
        }
    }

    pub(crate) fn empty(chain: &'a EventChain<T>) -> Self {
        Self::new(chain, REAR, None)
    }

    /// Next event without advancing
    pub fn peek(&self) -> Option<&'a Event<T>> {
        self.clone().next()
    }
}

impl<T> Clone for Events<'_, T> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain,
            cursor: self.cursor,
            upper: self.upper,
        }
    }
}

impl<'a, T> Iterator for Events<'a, T> {
    type Item = &'a Event<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == REAR {
            return None;
        }

        let event = self.chain.event(self.cursor)?;
        if self.upper.is_some_and(|upper| event.date() > upper) {
            self.cursor = REAR;
            return None;
        }

        self.cursor = self.chain.next(self.cursor);
        Some(event)
    }
}

impl<T> FusedIterator for Events<'_, T> {}
