//! Cost model: prices one replica's outcome in server time, customer waiting and SLA shortfall.

use checkout_core::telemetry::ReplicaMetrics;
use serde::Serialize;

use crate::config::CostConfig;

/// Cost components of one replica. `total` is their sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub server_cost: f64,
    pub wait_cost: f64,
    pub sla_cost: f64,
    pub total: f64,
}

pub fn average_time_in_system(metrics: &ReplicaMetrics) -> f64 {
    mean(&metrics.time_in_system)
}

/// Percentage of counted customers served within `threshold`.
///
/// Abandoned and pending customers count against compliance. With nobody counted the SLA
/// holds vacuously and this returns 100.
pub fn sla_compliance_percent(metrics: &ReplicaMetrics, threshold: f64) -> f64 {
    let counted = metrics.customers_counted();
    if counted == 0 {
        return 100.0;
    }
    let compliant = metrics
        .time_in_system
        .iter()
        .filter(|t| **t <= threshold)
        .count();
    compliant as f64 / counted as f64 * 100.0
}

pub fn average_utilization(metrics: &ReplicaMetrics) -> f64 {
    mean(&metrics.utilizations)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[derive(Debug, Clone, Default)]
pub struct CostModel {
    config: CostConfig,
}

impl CostModel {
    pub fn new(config: CostConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CostConfig {
        &self.config
    }

    pub fn sla_compliance_percent(&self, metrics: &ReplicaMetrics) -> f64 {
        sla_compliance_percent(metrics, self.config.sla_threshold)
    }

    pub fn breakdown(&self, metrics: &ReplicaMetrics) -> CostBreakdown {
        let server_cost = self.config.server_rate * metrics.num_servers as f64 * metrics.horizon;
        let wait_cost = self.config.wait_rate * metrics.time_in_system.iter().sum::<f64>();
        let shortfall =
            (self.config.sla_target * 100.0 - self.sla_compliance_percent(metrics)).max(0.0);
        let sla_cost = self.config.sla_penalty_rate * shortfall;
        CostBreakdown {
            server_cost,
            wait_cost,
            sla_cost,
            total: server_cost + wait_cost + sla_cost,
        }
    }

    pub fn total_cost(&self, metrics: &ReplicaMetrics) -> f64 {
        self.breakdown(metrics).total
    }
}
