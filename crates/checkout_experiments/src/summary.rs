//! Grouped summary: mean and sample standard deviation per server count.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::metrics::ReplicaResult;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Stat {
    pub mean: f64,
    pub std: f64,
}

impl Stat {
    /// Mean and sample standard deviation (n - 1). One value has std 0; none gives zeros.
    pub fn from_values(values: &[f64]) -> Self {
        let n = values.len();
        if n == 0 {
            return Self::default();
        }
        let mean = values.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (sum_sq / (n - 1) as f64).sqrt()
        } else {
            0.0
        };
        Self { mean, std }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerCountSummary {
    pub num_servers: usize,
    pub replicas: usize,
    pub time_in_system: Stat,
    pub queue_length: Stat,
    pub utilization: Stat,
    pub sla_percent: Stat,
    pub cost_total: Stat,
    /// Whether the opening trigger fires at this server count.
    pub opens_counter: bool,
}

/// Groups rows by server count, ascending.
pub fn summarize(results: &[ReplicaResult]) -> Vec<ServerCountSummary> {
    let mut groups: BTreeMap<usize, Vec<&ReplicaResult>> = BTreeMap::new();
    for result in results {
        groups.entry(result.num_servers).or_default().push(result);
    }

    groups
        .into_iter()
        .map(|(num_servers, rows)| {
            let stat = |field: fn(&ReplicaResult) -> f64| {
                Stat::from_values(&rows.iter().map(|r| field(r)).collect::<Vec<_>>())
            };
            ServerCountSummary {
                num_servers,
                replicas: rows.len(),
                time_in_system: stat(|r| r.mean_time_in_system),
                queue_length: stat(|r| r.mean_queue_length),
                utilization: stat(|r| r.mean_utilization),
                sla_percent: stat(|r| r.sla_percent),
                cost_total: stat(|r| r.cost_total),
                opens_counter: false,
            }
        })
        .collect()
}
