//! Event chain
//!
//! A date-ordered doubly linked list of events, bounded by two sentinels.
//! Nodes are stored in an arena and linked by index:
//!
//! ```text
//! [0] HEAD <-> [n] 2019-10-18 <-> [m] 2020-01-01 <-> ... <-> [1] REAR
//! ```
//!
//! Equal dates keep insertion order: a new node is spliced before the first
//! node whose date is strictly greater than its own.

use super::event::Event;
use crate::calendar::CalendarDate;

/// Arena index of a chain node
pub type EventId = usize;

pub(crate) const HEAD: EventId = 0;
pub(crate) const REAR: EventId = 1;

enum Slot<T> {
    Head,
    Rear,
    Data(Event<T>),
}

struct EventNode<T> {
    slot: Slot<T>,
    prev: EventId,
    next: EventId,
}

impl<T> EventNode<T> {
    fn date(&self) -> CalendarDate {
        match &self.slot {
            Slot::Head => CalendarDate::MIN,
            Slot::Rear => CalendarDate::MAX,
            Slot::Data(event) => event.date(),
        }
    }
}

pub(crate) struct EventChain<T> {
    nodes: Vec<EventNode<T>>,
}

impl<T> EventChain<T> {
    pub fn new() -> Self {
        Self {
            nodes: vec![
                EventNode {
                    slot: Slot::Head,
                    prev: HEAD,
                    next: REAR,
                },
                EventNode {
                    slot: Slot::Rear,
                    prev: HEAD,
                    next: REAR,
                },
            ],
        }
    }

    /// Number of data nodes
    pub fn len(&self) -> usize {
        self.nodes.len() - 2
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[HEAD].next == REAR
    }

    pub fn date(&self, id: EventId) -> CalendarDate {
        self.nodes[id].date()
    }

    /// Event stored at `id`; `None` for the sentinels
    pub fn event(&self, id: EventId) -> Option<&Event<T>> {
        match &self.nodes.get(id)?.slot {
            Slot::Data(event) => Some(event),
            Slot::Head | Slot::Rear => None,
        }
    }

    pub fn next(&self, id: EventId) -> EventId {
        self.nodes[id].next
    }

    pub fn prev(&self, id: EventId) -> EventId {
        self.nodes[id].prev
    }

    pub fn first(&self) -> Option<&Event<T>> {
        self.event(self.nodes[HEAD].next)
    }

    pub fn last(&self) -> Option<&Event<T>> {
        self.event(self.nodes[REAR].prev)
    }

    /// First node at or after `start` whose date is strictly after `date`
    ///
    /// `start` must not lie past the correct position; any node dated at or
    /// before `date` is a valid start, as are `HEAD` and `REAR` when nothing
    /// later exists.
    pub fn find_position(&self, date: CalendarDate, start: EventId) -> EventId {
        let mut curr = start;
        while curr != REAR && self.date(curr) <= date {
            curr = self.next(curr);
        }
        curr
    }

    /// First node at or after `start` whose date is not before `lower`
    pub fn skip_before(&self, lower: CalendarDate, start: EventId) -> EventId {
        let mut curr = if start == HEAD { self.next(HEAD) } else { start };
        while curr != REAR && self.date(curr) < lower {
            curr = self.next(curr);
        }
        curr
    }

    /// Splice a new node immediately before `before`
    pub fn insert_before(&mut self, before: EventId, event: Event<T>) -> EventId {
        let prev = self.nodes[before].prev;
        let id = self.nodes.len();

        self.nodes.push(EventNode {
            slot: Slot::Data(event),
            prev,
            next: before,
        });
        self.nodes[prev].next = id;
        self.nodes[before].prev = id;

        id
    }

    /// Insert in date order, scanning forward from `start`
    pub fn insert(&mut self, event: Event<T>, start: EventId) -> EventId {
        let position = self.find_position(event.date(), start);
        self.insert_before(position, event)
    }
}
