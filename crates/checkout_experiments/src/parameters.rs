//! Replica grid for a sweep: one parameter set per (server count, replica).
//!
//! Seeds derive from `(base_seed, server count, replica index)` so each replica is
//! reproducible on its own, independent of thread count or execution order.

use checkout_core::scenario::{ReplicaParams, ServerSpec};

use crate::config::ExperimentConfig;

/// Seed stride between server counts. `ExperimentConfig::validate` caps replicas at it.
pub const SEED_STRIDE: u64 = 1000;

/// Seed of replica `replica_index` at `num_servers` counters.
pub fn replica_seed(base_seed: u64, num_servers: usize, replica_index: usize) -> u64 {
    base_seed
        .wrapping_add((num_servers as u64).wrapping_mul(SEED_STRIDE))
        .wrapping_add(replica_index as u64)
}

/// One replica to run.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    /// Engine parameters shared by every replica of the sweep.
    pub params: ReplicaParams,
    pub num_servers: usize,
    /// 0-based replica index within its server count.
    pub replica_index: usize,
    /// Position in the sweep; results come back in this order.
    pub run_id: usize,
    pub seed: u64,
}

impl ParameterSet {
    pub fn layout(&self) -> Vec<ServerSpec> {
        self.params.server_layout(self.num_servers)
    }
}

/// Cartesian product of server counts and replica indices.
#[derive(Debug, Clone)]
pub struct ParameterSpace {
    base: ReplicaParams,
    server_counts: Vec<usize>,
    replicas: usize,
    base_seed: u64,
}

impl ParameterSpace {
    pub fn new(base: ReplicaParams) -> Self {
        Self {
            base,
            server_counts: vec![1],
            replicas: 1,
            base_seed: 0,
        }
    }

    pub fn from_config(config: &ExperimentConfig) -> Self {
        Self::new(config.replica_params())
            .server_counts(config.server_counts.clone())
            .replicas(config.replicas)
            .base_seed(config.base_seed)
    }

    pub fn server_counts(mut self, counts: Vec<usize>) -> Self {
        self.server_counts = counts;
        self
    }

    pub fn replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    pub fn base_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    pub fn len(&self) -> usize {
        self.server_counts.len() * self.replicas
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parameter sets ordered by server count, then replica index.
    pub fn generate(&self) -> Vec<ParameterSet> {
        let mut sets = Vec::with_capacity(self.len());
        for &num_servers in &self.server_counts {
            for replica_index in 0..self.replicas {
                sets.push(ParameterSet {
                    params: self.base.clone(),
                    num_servers,
                    replica_index,
                    run_id: sets.len(),
                    seed: replica_seed(self.base_seed, num_servers, replica_index),
                });
            }
        }
        sets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_follow_server_count_and_replica() {
        assert_eq!(replica_seed(0, 3, 0), 3000);
        assert_eq!(replica_seed(0, 3, 9), 3009);
        assert_eq!(replica_seed(7, 1, 2), 1009);
        assert_eq!(replica_seed(u64::MAX, 1, 0), 999);
    }

    #[test]
    fn grid_is_ordered_and_complete() {
        let sets = ParameterSpace::new(ReplicaParams::default())
            .server_counts(vec![1, 2, 4])
            .replicas(3)
            .generate();
        assert_eq!(sets.len(), 9);
        assert_eq!(
            sets.iter()
                .map(|s| (s.num_servers, s.replica_index))
                .take(4)
                .collect::<Vec<_>>(),
            vec![(1, 0), (1, 1), (1, 2), (2, 0)]
        );
        assert!(sets.iter().enumerate().all(|(i, s)| s.run_id == i));
        assert_eq!(sets[8].seed, 4002);
    }

    #[test]
    fn config_space_matches_config() {
        let config = ExperimentConfig::default().with_base_seed(100);
        let space = ParameterSpace::from_config(&config);
        assert_eq!(space.len(), config.total_runs());
        let sets = space.generate();
        assert_eq!(sets[0].seed, 1100);
        assert_eq!(sets[0].params, config.replica_params());
        assert_eq!(sets[0].layout().len(), 1);
    }

    #[test]
    fn largest_valid_grid_has_distinct_seeds() {
        let config = ExperimentConfig::default()
            .with_replicas(SEED_STRIDE as usize)
            .with_server_counts(vec![1, 2, 3]);
        config.validate().unwrap();
        let sets = ParameterSpace::from_config(&config).generate();
        let seeds: std::collections::HashSet<u64> = sets.iter().map(|s| s.seed).collect();
        assert_eq!(seeds.len(), sets.len());

        assert!(config.with_replicas(SEED_STRIDE as usize + 1).validate().is_err());
    }
}
