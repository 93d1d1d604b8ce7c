//! End-to-end sweep: validate, run every replica, summarize, recommend.

use serde::Serialize;
use tracing::info;

use crate::config::ExperimentConfig;
use crate::cost::CostModel;
use crate::error::SweepError;
use crate::metrics::ReplicaResult;
use crate::parameters::ParameterSpace;
use crate::recommendation::{annotate_triggers, recommend, Recommendation};
use crate::runner::run_parallel_replicas;
use crate::summary::{summarize, ServerCountSummary};

#[derive(Debug, Clone, Default)]
pub struct SweepOptions {
    pub num_threads: Option<usize>,
    pub show_progress: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub config: ExperimentConfig,
    pub results: Vec<ReplicaResult>,
    pub summary: Vec<ServerCountSummary>,
    pub recommendation: Option<Recommendation>,
}

/// Runs the full sweep described by `config`.
///
/// The configuration is validated before any replica runs.
pub fn run_sweep(config: &ExperimentConfig, options: &SweepOptions) -> Result<SweepReport, SweepError> {
    config.validate()?;

    let parameter_sets = ParameterSpace::from_config(config).generate();
    info!(
        runs = parameter_sets.len(),
        server_counts = ?config.server_counts,
        replicas = config.replicas,
        arrival_rate = config.arrival_rate,
        horizon = config.horizon,
        "Starting sweep"
    );

    let model = CostModel::new(config.cost.clone());
    let results = run_parallel_replicas(
        &parameter_sets,
        &model,
        options.num_threads,
        options.show_progress,
    )?;

    let mut summary = summarize(&results);
    let recommendation = recommend(&summary, &config.trigger);
    if let Some(rec) = &recommendation {
        annotate_triggers(&mut summary, &rec.trigger);
    }

    for row in &summary {
        info!(
            servers = row.num_servers,
            cost = row.cost_total.mean,
            sla = row.sla_percent.mean,
            utilization = row.utilization.mean,
            queue = row.queue_length.mean,
            opens_counter = row.opens_counter,
            "Server count summarized"
        );
    }
    if let Some(rec) = &recommendation {
        info!(
            servers = rec.num_servers,
            cost = rec.mean_cost,
            trigger = %rec.trigger,
            "Recommendation"
        );
    }

    Ok(SweepReport {
        config: config.clone(),
        results,
        summary,
        recommendation,
    })
}
