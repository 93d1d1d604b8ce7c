//! Parallel replica execution using rayon.
//!
//! Every replica builds its own world, registry and RNG, so replicas share nothing and
//! results do not depend on the thread count.

use checkout_core::runner::run_replica;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::debug;

use crate::cost::CostModel;
use crate::error::SweepError;
use crate::metrics::ReplicaResult;
use crate::parameters::ParameterSet;

/// Runs one replica and prices it.
pub fn run_single_replica(param_set: &ParameterSet, model: &CostModel) -> ReplicaResult {
    let metrics = run_replica(&param_set.layout(), &param_set.params, param_set.seed);
    debug!(
        servers = param_set.num_servers,
        replica = param_set.replica_index,
        seed = param_set.seed,
        completed = metrics.customers_completed,
        "Replica priced"
    );
    ReplicaResult::from_metrics(param_set, &metrics, model)
}

fn progress_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style.progress_chars("#>-"));
    bar
}

/// Runs replicas in parallel with an optional progress bar.
///
/// Results come back in the order of `parameter_sets`. `num_threads` of `None` uses
/// rayon's default pool size.
pub fn run_parallel_replicas(
    parameter_sets: &[ParameterSet],
    model: &CostModel,
    num_threads: Option<usize>,
    show_progress: bool,
) -> Result<Vec<ReplicaResult>, SweepError> {
    let total = parameter_sets.len();
    let pb = if show_progress && total > 0 {
        Some(progress_bar(total))
    } else {
        None
    };

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;

    let results = pool.install(|| {
        parameter_sets
            .par_iter()
            .map(|param_set| {
                let result = run_single_replica(param_set, model);
                if let Some(ref progress_bar) = pb {
                    progress_bar.inc(1);
                }
                result
            })
            .collect()
    });

    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExperimentConfig;
    use crate::parameters::ParameterSpace;
    use crate::summary::summarize;

    #[test]
    fn single_replica_is_reproducible() {
        let sets = ParameterSpace::from_config(&ExperimentConfig::default()).generate();
        let model = CostModel::default();
        let a = run_single_replica(&sets[3], &model);
        let b = run_single_replica(&sets[3], &model);
        assert_eq!(a, b);
    }

    #[test]
    fn thread_count_does_not_change_results() {
        let config = ExperimentConfig::default()
            .with_replicas(3)
            .with_server_counts(vec![1, 3]);
        let sets = ParameterSpace::from_config(&config).generate();
        let model = CostModel::new(config.cost.clone());

        let serial = run_parallel_replicas(&sets, &model, Some(1), false).unwrap();
        let parallel = run_parallel_replicas(&sets, &model, Some(4), false).unwrap();
        assert_eq!(serial, parallel);
        assert_eq!(serial.len(), 6);
        assert_eq!(
            serial.iter().map(|r| r.num_servers).collect::<Vec<_>>(),
            vec![1, 1, 1, 3, 3, 3]
        );
    }

    #[test]
    fn more_counters_do_not_hurt_service_on_average() {
        // Statistical check: averaged over replicas, adding counters should not raise the
        // mean time in system or lower SLA compliance beyond a small tolerance.
        let config = ExperimentConfig::default()
            .with_replicas(20)
            .with_server_counts(vec![1, 2, 3, 4, 5]);
        let sets = ParameterSpace::from_config(&config).generate();
        let model = CostModel::new(config.cost.clone());
        let results = run_parallel_replicas(&sets, &model, None, false).unwrap();
        let summary = summarize(&results);

        for pair in summary.windows(2) {
            let (fewer, more) = (&pair[0], &pair[1]);
            assert!(
                more.time_in_system.mean <= fewer.time_in_system.mean * 1.05 + 0.05,
                "{} counters: W {:.3}, {} counters: W {:.3}",
                fewer.num_servers,
                fewer.time_in_system.mean,
                more.num_servers,
                more.time_in_system.mean
            );
            assert!(
                more.sla_percent.mean >= fewer.sla_percent.mean - 2.0,
                "{} counters: SLA {:.2}, {} counters: SLA {:.2}",
                fewer.num_servers,
                fewer.sla_percent.mean,
                more.num_servers,
                more.sla_percent.mean
            );
        }
    }

    #[test]
    fn empty_grid_runs_nothing() {
        let results = run_parallel_replicas(&[], &CostModel::default(), Some(1), true).unwrap();
        assert!(results.is_empty());
    }
}
