use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::clock::SimTime;
use crate::entities::ServerClass;
use crate::generator::GeneratorConfig;

/// Default simulated shift: one hour, in minutes.
const DEFAULT_HORIZON: SimTime = 60.0;

/// Every n-th counter (0-based index, excluding the first) is an express lane.
const DEFAULT_EXPRESS_INTERVAL: usize = 3;

/// Horizon of the replica. The runner processes events up to and including this time.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimulationHorizon(pub SimTime);

/// Shape of the arrival process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalProcessKind {
    /// Exponential inter-arrival times at `arrival_rate`.
    #[default]
    Poisson,
    /// Evenly spaced arrivals at `arrival_rate`.
    Deterministic,
}

/// One counter to create in a replica.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServerSpec {
    pub class: ServerClass,
    pub scan_duration: SimTime,
    pub item_cap: Option<u32>,
}

impl ServerSpec {
    pub fn standard(scan_duration: SimTime) -> Self {
        Self {
            class: ServerClass::Standard,
            scan_duration,
            item_cap: None,
        }
    }

    pub fn express(scan_duration: SimTime, item_cap: u32) -> Self {
        Self {
            class: ServerClass::Express,
            scan_duration,
            item_cap: Some(item_cap),
        }
    }
}

/// Parameters for one replica. Server count and seed are supplied per run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicaParams {
    pub horizon: SimTime,
    /// Mean arrivals per time unit (lambda).
    pub arrival_rate: f64,
    pub arrival_process: ArrivalProcessKind,
    /// Per-item scan time at a standard counter.
    pub scan_duration: SimTime,
    pub max_items: u32,
    pub overhead_min: SimTime,
    pub overhead_max: SimTime,
    /// 0 disables express counters.
    pub express_interval: usize,
    /// Express scan time as a fraction of the standard scan time.
    pub express_scan_factor: f64,
    pub express_item_cap: u32,
    /// Customers already queued at every counter when the replica starts.
    pub initial_queue_per_server: usize,
}

impl Default for ReplicaParams {
    fn default() -> Self {
        let generator = GeneratorConfig::default();
        Self {
            horizon: DEFAULT_HORIZON,
            arrival_rate: 1.0,
            arrival_process: ArrivalProcessKind::default(),
            scan_duration: 0.05,
            max_items: generator.max_items,
            overhead_min: generator.overhead_min,
            overhead_max: generator.overhead_max,
            express_interval: DEFAULT_EXPRESS_INTERVAL,
            express_scan_factor: 0.6,
            express_item_cap: 10,
            initial_queue_per_server: 0,
        }
    }
}

impl ReplicaParams {
    pub fn with_horizon(mut self, horizon: SimTime) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_arrival_rate(mut self, rate: f64) -> Self {
        self.arrival_rate = rate;
        self
    }

    pub fn with_arrival_process(mut self, kind: ArrivalProcessKind) -> Self {
        self.arrival_process = kind;
        self
    }

    pub fn with_scan_duration(mut self, scan_duration: SimTime) -> Self {
        self.scan_duration = scan_duration;
        self
    }

    pub fn with_max_items(mut self, max_items: u32) -> Self {
        self.max_items = max_items;
        self
    }

    /// Checkout overhead drawn uniformly from `[min, max]`.
    pub fn with_overhead_range(mut self, min: SimTime, max: SimTime) -> Self {
        self.overhead_min = min;
        self.overhead_max = max;
        self
    }

    pub fn with_fixed_overhead(self, overhead: SimTime) -> Self {
        self.with_overhead_range(overhead, overhead)
    }

    pub fn without_express(mut self) -> Self {
        self.express_interval = 0;
        self
    }

    pub fn with_initial_queue(mut self, customers_per_server: usize) -> Self {
        self.initial_queue_per_server = customers_per_server;
        self
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            max_items: self.max_items,
            overhead_min: self.overhead_min,
            overhead_max: self.overhead_max,
        }
    }

    /// Counter `index` (0-based) is express when it is not the first and falls on the interval.
    pub fn is_express_slot(&self, index: usize) -> bool {
        self.express_interval > 0 && index > 0 && index % self.express_interval == 0
    }

    pub fn server_layout(&self, num_servers: usize) -> Vec<ServerSpec> {
        (0..num_servers)
            .map(|index| {
                if self.is_express_slot(index) {
                    ServerSpec::express(
                        self.scan_duration * self.express_scan_factor,
                        self.express_item_cap,
                    )
                } else {
                    ServerSpec::standard(self.scan_duration)
                }
            })
            .collect()
    }
}
