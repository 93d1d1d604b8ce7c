//! Experiment configuration: cost rates, trigger thresholds and the sweep itself.
//!
//! Every struct deserializes with all fields defaulted, so a JSON file only needs the
//! values it overrides. [ExperimentConfig::validate] runs before any replica is built.

use std::path::Path;

use checkout_core::scenario::{ArrivalProcessKind, ReplicaParams};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::parameters::SEED_STRIDE;

/// Cost rates and SLA terms applied to every replica.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    /// Cost per counter per minute open.
    pub server_rate: f64,
    /// Cost per minute a customer spends in the system.
    pub wait_rate: f64,
    /// Cost per percentage point below the SLA target.
    pub sla_penalty_rate: f64,
    /// Maximum time in system (minutes) for a customer to count as compliant.
    pub sla_threshold: f64,
    /// Target compliance as a fraction in [0, 1].
    pub sla_target: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            server_rate: 0.5,
            wait_rate: 0.1,
            sla_penalty_rate: 5.0,
            sla_threshold: 8.0,
            sla_target: 0.8,
        }
    }
}

/// When to open one more counter. Purely descriptive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Queue length above which a counter opens. `None` uses the optimum's mean Lq.
    pub queue_threshold: Option<f64>,
    /// Utilization above which a counter opens, once sustained for `sustain_window`.
    pub utilization_threshold: f64,
    /// Minutes the utilization must stay above its threshold.
    pub sustain_window: f64,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            queue_threshold: None,
            utilization_threshold: 0.85,
            sustain_window: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub replicas: usize,
    pub horizon: f64,
    pub arrival_rate: f64,
    pub arrival_process: ArrivalProcessKind,
    pub scan_duration: f64,
    pub max_items: u32,
    pub overhead_min: f64,
    pub overhead_max: f64,
    pub express_interval: usize,
    pub express_scan_factor: f64,
    pub express_item_cap: u32,
    pub initial_queue_per_server: usize,
    pub server_counts: Vec<usize>,
    pub base_seed: u64,
    pub cost: CostConfig,
    pub trigger: TriggerConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        let replica = ReplicaParams::default();
        Self {
            replicas: 10,
            horizon: replica.horizon,
            arrival_rate: 2.0,
            arrival_process: replica.arrival_process,
            scan_duration: replica.scan_duration,
            max_items: replica.max_items,
            overhead_min: replica.overhead_min,
            overhead_max: replica.overhead_max,
            express_interval: replica.express_interval,
            express_scan_factor: replica.express_scan_factor,
            express_item_cap: replica.express_item_cap,
            initial_queue_per_server: replica.initial_queue_per_server,
            server_counts: (1..=5).collect(),
            base_seed: 0,
            cost: CostConfig::default(),
            trigger: TriggerConfig::default(),
        }
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    // NaN fails the comparison and is rejected too.
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn require_in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl ExperimentConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    pub fn with_horizon(mut self, horizon: f64) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_arrival_rate(mut self, rate: f64) -> Self {
        self.arrival_rate = rate;
        self
    }

    pub fn with_scan_duration(mut self, scan_duration: f64) -> Self {
        self.scan_duration = scan_duration;
        self
    }

    pub fn with_server_counts(mut self, counts: Vec<usize>) -> Self {
        self.server_counts = counts;
        self
    }

    pub fn with_base_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    pub fn with_cost(mut self, cost: CostConfig) -> Self {
        self.cost = cost;
        self
    }

    /// Checks every field the engine and cost model rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.replicas == 0 {
            return Err(ConfigError::Zero { field: "replicas" });
        }
        if self.replicas as u64 > SEED_STRIDE {
            return Err(ConfigError::TooManyReplicas {
                replicas: self.replicas,
                max: SEED_STRIDE as usize,
            });
        }
        require_positive("horizon", self.horizon)?;
        require_positive("arrival_rate", self.arrival_rate)?;
        require_positive("scan_duration", self.scan_duration)?;
        if self.max_items == 0 {
            return Err(ConfigError::Zero { field: "max_items" });
        }
        require_non_negative("overhead_min", self.overhead_min)?;
        require_non_negative("overhead_max", self.overhead_max)?;
        if self.overhead_min > self.overhead_max {
            return Err(ConfigError::InvertedOverhead {
                min: self.overhead_min,
                max: self.overhead_max,
            });
        }
        require_positive("express_scan_factor", self.express_scan_factor)?;
        if self.express_interval > 0 && self.express_item_cap == 0 {
            return Err(ConfigError::Zero {
                field: "express_item_cap",
            });
        }

        if self.server_counts.is_empty() {
            return Err(ConfigError::NoServerCounts);
        }
        if self.server_counts.contains(&0) {
            return Err(ConfigError::Zero {
                field: "server_counts",
            });
        }

        let cost = &self.cost;
        require_non_negative("cost.server_rate", cost.server_rate)?;
        require_non_negative("cost.wait_rate", cost.wait_rate)?;
        require_non_negative("cost.sla_penalty_rate", cost.sla_penalty_rate)?;
        require_positive("cost.sla_threshold", cost.sla_threshold)?;
        require_in_range("cost.sla_target", cost.sla_target, 0.0, 1.0)?;

        let trigger = &self.trigger;
        if let Some(threshold) = trigger.queue_threshold {
            require_non_negative("trigger.queue_threshold", threshold)?;
        }
        require_in_range(
            "trigger.utilization_threshold",
            trigger.utilization_threshold,
            0.0,
            1.0,
        )?;
        require_non_negative("trigger.sustain_window", trigger.sustain_window)?;
        Ok(())
    }

    /// Engine parameters for one replica under this configuration.
    pub fn replica_params(&self) -> ReplicaParams {
        ReplicaParams {
            horizon: self.horizon,
            arrival_rate: self.arrival_rate,
            arrival_process: self.arrival_process,
            scan_duration: self.scan_duration,
            max_items: self.max_items,
            overhead_min: self.overhead_min,
            overhead_max: self.overhead_max,
            express_interval: self.express_interval,
            express_scan_factor: self.express_scan_factor,
            express_item_cap: self.express_item_cap,
            initial_queue_per_server: self.initial_queue_per_server,
        }
    }

    pub fn total_runs(&self) -> usize {
        self.server_counts.len() * self.replicas
    }
}

/// Parses `"3"`, `"1-5"` or `"1,3,5"` (parts may mix, e.g. `"1-3,6"`) into sorted counts.
pub fn parse_server_range(input: &str) -> Result<Vec<usize>, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidServerRange {
        input: input.to_string(),
        reason: reason.to_string(),
    };
    let parse_count = |text: &str| -> Result<usize, ConfigError> {
        let count: usize = text
            .trim()
            .parse()
            .map_err(|_| invalid(&format!("{:?} is not a number", text.trim())))?;
        if count == 0 {
            return Err(invalid("server counts start at 1"));
        }
        Ok(count)
    };

    let mut counts = Vec::new();
    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            return Err(invalid("empty entry"));
        }
        match part.split_once('-') {
            Some((start, end)) => {
                let start = parse_count(start)?;
                let end = parse_count(end)?;
                if start > end {
                    return Err(invalid("range is inverted"));
                }
                counts.extend(start..=end);
            }
            None => counts.push(parse_count(part)?),
        }
    }
    counts.sort_unstable();
    counts.dedup();
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ExperimentConfig::default();
        config.validate().unwrap();
        assert_eq!(config.server_counts, vec![1, 2, 3, 4, 5]);
        assert_eq!(config.total_runs(), 50);
    }

    #[test]
    fn missing_json_fields_take_defaults() {
        let config =
            ExperimentConfig::from_json_str(r#"{"replicas": 3, "cost": {"sla_threshold": 6.0}}"#)
                .unwrap();
        assert_eq!(config.replicas, 3);
        assert_eq!(config.cost.sla_threshold, 6.0);
        assert_eq!(config.cost.server_rate, 0.5);
        assert_eq!(config.arrival_rate, 2.0);
        assert_eq!(config.trigger, TriggerConfig::default());
    }

    #[test]
    fn arrival_process_parses_from_snake_case() {
        let config =
            ExperimentConfig::from_json_str(r#"{"arrival_process": "deterministic"}"#).unwrap();
        assert_eq!(config.arrival_process, ArrivalProcessKind::Deterministic);
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = ExperimentConfig::from_json_str("{ replicas: ").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn each_rule_rejects_its_input() {
        let base = ExperimentConfig::default();

        let cases: Vec<(ExperimentConfig, &str)> = vec![
            (base.clone().with_replicas(0), "replicas"),
            (base.clone().with_replicas(1001), "must not exceed 1000"),
            (base.clone().with_horizon(0.0), "horizon"),
            (base.clone().with_horizon(f64::NAN), "horizon"),
            (base.clone().with_arrival_rate(-1.0), "arrival_rate"),
            (base.clone().with_scan_duration(0.0), "scan_duration"),
            (base.clone().with_server_counts(vec![]), "server counts"),
            (base.clone().with_server_counts(vec![0, 2]), "server_counts"),
            (
                ExperimentConfig {
                    overhead_min: 0.6,
                    overhead_max: 0.4,
                    ..base.clone()
                },
                "inverted",
            ),
            (
                base.clone().with_cost(CostConfig {
                    sla_target: 1.5,
                    ..CostConfig::default()
                }),
                "cost.sla_target",
            ),
            (
                base.clone().with_cost(CostConfig {
                    wait_rate: -0.1,
                    ..CostConfig::default()
                }),
                "cost.wait_rate",
            ),
            (
                ExperimentConfig {
                    trigger: TriggerConfig {
                        utilization_threshold: 1.2,
                        ..TriggerConfig::default()
                    },
                    ..base.clone()
                },
                "trigger.utilization_threshold",
            ),
        ];

        for (config, expected) in cases {
            let err = config.validate().unwrap_err();
            assert!(
                err.to_string().contains(expected),
                "expected {expected:?} in {err}"
            );
        }
    }

    #[test]
    fn replica_params_carry_every_knob() {
        let config = ExperimentConfig {
            express_interval: 2,
            initial_queue_per_server: 4,
            ..ExperimentConfig::default().with_arrival_rate(3.5)
        };
        let params = config.replica_params();
        assert_eq!(params.arrival_rate, 3.5);
        assert_eq!(params.express_interval, 2);
        assert_eq!(params.initial_queue_per_server, 4);
        assert_eq!(params.horizon, 60.0);
    }

    #[test]
    fn server_ranges_parse() {
        assert_eq!(parse_server_range("1-5").unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(parse_server_range("3").unwrap(), vec![3]);
        assert_eq!(parse_server_range("5,1,3").unwrap(), vec![1, 3, 5]);
        assert_eq!(parse_server_range(" 1-3, 6 ,2").unwrap(), vec![1, 2, 3, 6]);
    }

    #[test]
    fn bad_server_ranges_are_rejected() {
        for input in ["0", "0-3", "5-1", "", "1,,2", "a-b", "2-"] {
            assert!(
                matches!(
                    parse_server_range(input),
                    Err(ConfigError::InvalidServerRange { .. })
                ),
                "{input:?} should be rejected"
            );
        }
    }
}
