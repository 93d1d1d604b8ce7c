//! Telemetry / KPIs: arrivals, completions and the time-weighted queue integral of a replica.

use bevy_ecs::prelude::Resource;
use serde::Serialize;

use crate::clock::SimTime;
use crate::entities::{Customer, CustomerId, ServerId};

/// One completed checkout, recorded at departure.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedCheckout {
    pub customer: CustomerId,
    pub server: ServerId,
    pub item_count: u32,
    pub arrival_time: SimTime,
    pub service_start: SimTime,
    pub service_end: SimTime,
}

impl CompletedCheckout {
    /// Builds the record from a departed customer; `None` if it was never served.
    pub fn from_customer(customer: &Customer, server: ServerId) -> Option<Self> {
        Some(Self {
            customer: customer.id,
            server,
            item_count: customer.item_count,
            arrival_time: customer.arrival_time,
            service_start: customer.service_start?,
            service_end: customer.service_end?,
        })
    }

    pub fn time_in_system(&self) -> SimTime {
        self.service_end - self.arrival_time
    }

    pub fn waiting_time(&self) -> SimTime {
        self.service_start - self.arrival_time
    }

    pub fn service_time(&self) -> SimTime {
        self.service_end - self.service_start
    }
}

#[derive(Debug, Default, Resource)]
pub struct ReplicaTelemetry {
    pub arrivals: u64,
    /// Arrivals no counter would accept.
    pub abandoned: u64,
    pub completed: Vec<CompletedCheckout>,
    queue_area: f64,
    last_event_time: SimTime,
}

impl ReplicaTelemetry {
    /// Integrates `waiting` over `[last_event_time, now]`.
    pub fn advance_queue_area(&mut self, now: SimTime, waiting: usize) {
        if now > self.last_event_time {
            self.queue_area += waiting as f64 * (now - self.last_event_time);
            self.last_event_time = now;
        }
    }

    pub fn queue_area(&self) -> f64 {
        self.queue_area
    }

    pub fn last_event_time(&self) -> SimTime {
        self.last_event_time
    }

    pub fn time_in_system_samples(&self) -> Vec<SimTime> {
        self.completed
            .iter()
            .map(CompletedCheckout::time_in_system)
            .collect()
    }
}

/// Raw outcome of one replica, handed to the cost model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplicaMetrics {
    pub num_servers: usize,
    /// Span the metrics cover. Equals the configured horizon unless the run was truncated.
    pub horizon: SimTime,
    /// The step cap stopped the run with events still due before the horizon.
    pub truncated: bool,
    pub time_in_system: Vec<SimTime>,
    /// Time-weighted mean number of customers waiting (Lq).
    pub mean_queue_length: f64,
    pub utilizations: Vec<f64>,
    pub customers_completed: u64,
    pub arrivals: u64,
    pub abandoned: u64,
    /// Customers still queued or in service when the horizon was reached.
    pub pending: u64,
    pub served_per_server: Vec<u64>,
}

impl ReplicaMetrics {
    /// Synthetic metrics with only completions, e.g. for cost-model checks.
    pub fn from_samples(
        num_servers: usize,
        horizon: SimTime,
        time_in_system: Vec<SimTime>,
        utilizations: Vec<f64>,
    ) -> Self {
        let completed = time_in_system.len() as u64;
        Self {
            num_servers,
            horizon,
            truncated: false,
            time_in_system,
            mean_queue_length: 0.0,
            utilizations,
            customers_completed: completed,
            arrivals: completed,
            abandoned: 0,
            pending: 0,
            served_per_server: Vec::new(),
        }
    }

    /// Everyone who counts toward the SLA denominator.
    pub fn customers_counted(&self) -> u64 {
        self.time_in_system.len() as u64 + self.abandoned + self.pending
    }

    pub fn is_conserved(&self) -> bool {
        self.customers_completed + self.abandoned + self.pending == self.arrivals
    }
}
