//! Result rows: one per replica, pairing engine metrics with their cost.

use checkout_core::telemetry::ReplicaMetrics;
use serde::Serialize;

use crate::cost::{average_time_in_system, average_utilization, CostModel};
use crate::parameters::ParameterSet;

/// Outcome of a single replica.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplicaResult {
    pub num_servers: usize,
    pub replica_index: usize,
    pub seed: u64,
    /// Mean minutes from arrival to departure over completed customers.
    pub mean_time_in_system: f64,
    /// Time-weighted mean number of customers waiting (Lq).
    pub mean_queue_length: f64,
    /// Mean utilization across counters.
    pub mean_utilization: f64,
    pub sla_percent: f64,
    pub cost_server: f64,
    pub cost_wait: f64,
    pub cost_sla: f64,
    pub cost_total: f64,
    pub customers_completed: u64,
    pub customers_abandoned: u64,
    pub customers_pending: u64,
}

impl ReplicaResult {
    pub fn from_metrics(set: &ParameterSet, metrics: &ReplicaMetrics, model: &CostModel) -> Self {
        let cost = model.breakdown(metrics);
        Self {
            num_servers: set.num_servers,
            replica_index: set.replica_index,
            seed: set.seed,
            mean_time_in_system: average_time_in_system(metrics),
            mean_queue_length: metrics.mean_queue_length,
            mean_utilization: average_utilization(metrics),
            sla_percent: model.sla_compliance_percent(metrics),
            cost_server: cost.server_cost,
            cost_wait: cost.wait_cost,
            cost_sla: cost.sla_cost,
            cost_total: cost.total,
            customers_completed: metrics.customers_completed,
            customers_abandoned: metrics.abandoned,
            customers_pending: metrics.pending,
        }
    }
}
