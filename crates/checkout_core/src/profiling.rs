//! Event rate tracking for replicas and benchmarks.

use std::time::{Duration, Instant};

use bevy_ecs::prelude::Resource;

use crate::clock::EventKind;

/// Counts processed events by kind.
#[derive(Debug, Resource)]
pub struct EventMetrics {
    pub arrivals: u64,
    pub departures: u64,
    started_at: Instant,
}

impl Default for EventMetrics {
    fn default() -> Self {
        Self {
            arrivals: 0,
            departures: 0,
            started_at: Instant::now(),
        }
    }
}

impl EventMetrics {
    pub fn record_event(&mut self, kind: EventKind) {
        match kind {
            EventKind::Arrival => self.arrivals += 1,
            EventKind::Departure { .. } => self.departures += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.arrivals + self.departures
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Wall-clock processing rate since the resource was created.
    pub fn events_per_sec(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.total() as f64 / secs
        }
    }
}
