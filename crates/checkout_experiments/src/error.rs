use std::path::PathBuf;

use thiserror::Error;

/// Rejected experiment configuration. Raised before any replica runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("overhead range is inverted: min {min} > max {max}")]
    InvertedOverhead { min: f64, max: f64 },

    #[error("{field} must be at least 1")]
    Zero { field: &'static str },

    #[error("replicas must not exceed {max}, got {replicas}")]
    TooManyReplicas { replicas: usize, max: usize },

    #[error("no server counts to sweep")]
    NoServerCounts,

    #[error("invalid server range {input:?}: {reason}")]
    InvalidServerRange { input: String, reason: String },

    #[error("unknown preset {0:?}")]
    UnknownPreset(String),

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
