#![allow(dead_code)]

use checkout_core::scenario::{ReplicaParams, ServerSpec};
use checkout_core::telemetry::ReplicaMetrics;

/// Reference configuration: λ = 2 per minute over one hour, express every third counter.
pub fn reference_params() -> ReplicaParams {
    ReplicaParams::default().with_arrival_rate(2.0)
}

/// Single-counter scenario with a fixed per-customer overhead.
pub fn single_counter_params(rate: f64) -> ReplicaParams {
    ReplicaParams::default()
        .with_arrival_rate(rate)
        .with_scan_duration(0.05)
        .with_fixed_overhead(0.25)
        .with_horizon(60.0)
}

pub fn standard_layout(n: usize, scan: f64) -> Vec<ServerSpec> {
    (0..n).map(|_| ServerSpec::standard(scan)).collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn assert_conserved(metrics: &ReplicaMetrics) {
    assert_eq!(
        metrics.customers_completed + metrics.abandoned + metrics.pending,
        metrics.arrivals,
        "completed {} + abandoned {} + pending {} != arrivals {}",
        metrics.customers_completed,
        metrics.abandoned,
        metrics.pending,
        metrics.arrivals
    );
}
