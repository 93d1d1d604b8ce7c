//! Cost-optimal counter sizing on top of `checkout_core`.
//!
//! Sweeps a range of counter counts, runs independent replicas of each in parallel,
//! prices every replica with a [CostModel], and recommends the cheapest count together
//! with a rule for opening one more counter.
//!
//! # Quick Start
//!
//! ```no_run
//! use checkout_experiments::{presets, run_sweep, SweepOptions};
//!
//! let config = presets::default_example();
//! let report = run_sweep(&config, &SweepOptions::default()).unwrap();
//! if let Some(rec) = &report.recommendation {
//!     println!("{rec}");
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: sweep, cost and trigger configuration with validation
//! - [`parameters`]: replica grid and seed derivation
//! - [`runner`]: parallel replica execution using rayon
//! - [`cost`], [`metrics`], [`summary`], [`recommendation`]: pricing and analysis
//! - [`export`]: CSV, JSON and Parquet writers

pub mod config;
pub mod cost;
pub mod error;
pub mod export;
pub mod metrics;
pub mod parameters;
pub mod presets;
pub mod recommendation;
pub mod runner;
pub mod summary;
pub mod sweep;

pub use config::{parse_server_range, CostConfig, ExperimentConfig, TriggerConfig};
pub use cost::{CostBreakdown, CostModel};
pub use error::{ConfigError, SweepError};
pub use export::{
    export_summary_to_csv, export_summary_to_json, export_to_csv, export_to_json,
    export_to_parquet,
};
pub use metrics::ReplicaResult;
pub use parameters::{ParameterSet, ParameterSpace};
pub use recommendation::{OpeningTrigger, Recommendation};
pub use runner::run_parallel_replicas;
pub use summary::{ServerCountSummary, Stat};
pub use sweep::{run_sweep, SweepOptions, SweepReport};
