use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::Resource;

use crate::entities::{CustomerId, ServerId};

/// Simulation time, in the same unit as every duration in the model (minutes by convention).
pub type SimTime = f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Arrival,
    Departure {
        server: ServerId,
        customer: CustomerId,
    },
}

impl EventKind {
    pub fn is_arrival(&self) -> bool {
        matches!(self, EventKind::Arrival)
    }

    pub fn is_departure(&self) -> bool {
        matches!(self, EventKind::Departure { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub timestamp: SimTime,
    /// Insertion order; breaks timestamp ties so the schedule is stable for a given seed.
    pub sequence: u64,
    pub kind: EventKind,
}

impl Eq for Event {}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by (timestamp, sequence).
        other
            .timestamp
            .total_cmp(&self.timestamp)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event being processed by the current schedule run.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: SimTime,
    next_sequence: u64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn schedule_at(&mut self, timestamp: SimTime, kind: EventKind) {
        debug_assert!(
            timestamp >= self.now,
            "event timestamp must be >= current time"
        );
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.events.push(Event {
            timestamp,
            sequence,
            kind,
        });
    }

    pub fn schedule_in(&mut self, delay: SimTime, kind: EventKind) {
        self.schedule_at(self.now + delay, kind);
    }

    pub fn next_event_time(&self) -> Option<SimTime> {
        self.events.peek().map(|event| event.timestamp)
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pops_events_in_time_order() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(10.0, EventKind::Arrival);
        clock.schedule_at(5.5, EventKind::Arrival);
        clock.schedule_at(20.0, EventKind::Arrival);

        let first = clock.pop_next().expect("first event");
        assert_eq!(first.timestamp, 5.5);
        assert_eq!(clock.now(), 5.5);

        let second = clock.pop_next().expect("second event");
        assert_eq!(second.timestamp, 10.0);

        let third = clock.pop_next().expect("third event");
        assert_eq!(third.timestamp, 20.0);
        assert_eq!(clock.now(), 20.0);

        assert!(clock.pop_next().is_none());
        assert!(clock.is_empty());
    }

    #[test]
    fn ties_pop_in_insertion_order() {
        let mut clock = SimulationClock::default();
        let departure = EventKind::Departure {
            server: ServerId(2),
            customer: CustomerId(7),
        };
        clock.schedule_at(3.0, departure);
        clock.schedule_at(3.0, EventKind::Arrival);

        assert_eq!(clock.pop_next().expect("first").kind, departure);
        assert_eq!(clock.pop_next().expect("second").kind, EventKind::Arrival);
    }

    #[test]
    fn schedule_in_is_relative_to_now() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(2.0, EventKind::Arrival);
        clock.pop_next();
        clock.schedule_in(1.5, EventKind::Arrival);
        assert_eq!(clock.next_event_time(), Some(3.5));
    }
}
