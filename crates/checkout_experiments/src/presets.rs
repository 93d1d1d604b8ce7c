//! Pre-defined sweep configurations.

use crate::config::ExperimentConfig;
use crate::error::ConfigError;

pub const PRESET_NAMES: [&str; 4] = ["default", "baseline", "peak_hour", "minimal"];

/// Two customers per minute over one hour, ten replicas at 1 to 5 counters.
pub fn default_example() -> ExperimentConfig {
    ExperimentConfig::default()
}

/// Quiet period: one customer per minute.
pub fn baseline() -> ExperimentConfig {
    ExperimentConfig::default().with_arrival_rate(1.0)
}

/// Rush hour: five customers per minute, up to eight counters.
pub fn peak_hour() -> ExperimentConfig {
    ExperimentConfig::default()
        .with_arrival_rate(5.0)
        .with_server_counts((2..=8).collect())
}

/// Quick check: two replicas of 20 minutes at 1 to 3 counters.
pub fn minimal() -> ExperimentConfig {
    ExperimentConfig::default()
        .with_replicas(2)
        .with_horizon(20.0)
        .with_server_counts(vec![1, 2, 3])
}

pub fn by_name(name: &str) -> Result<ExperimentConfig, ConfigError> {
    match name {
        "default" | "default_example" => Ok(default_example()),
        "baseline" => Ok(baseline()),
        "peak_hour" | "peak-hour" => Ok(peak_hour()),
        "minimal" => Ok(minimal()),
        other => Err(ConfigError::UnknownPreset(other.to_string())),
    }
}
