//! Checkout counter sizing sweep.
//!
//! # Example
//!
//! ```bash
//! # Reference sweep: λ = 2, ten replicas at 1 to 5 counters
//! checkout_sweep --output results.csv
//!
//! # Rush hour from a preset with more replicas
//! checkout_sweep --preset peak_hour --replicas 30 --servers 2-8
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use checkout_experiments::{
    export_summary_to_csv, export_to_csv, export_to_json, export_to_parquet, parse_server_range,
    presets, run_sweep, ExperimentConfig, SweepOptions, SweepReport,
};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Finds the cheapest number of checkout counters by simulation.
#[derive(Parser, Debug)]
#[command(name = "checkout_sweep")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON configuration file. Missing fields take their defaults.
    #[arg(long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Named preset: default, baseline, peak_hour, minimal
    #[arg(long)]
    preset: Option<String>,

    /// Replicas per counter count
    #[arg(long)]
    replicas: Option<usize>,

    /// Simulated minutes per replica
    #[arg(long)]
    horizon: Option<f64>,

    /// Customers per minute
    #[arg(long)]
    arrival_rate: Option<f64>,

    /// Minutes to scan one item at a standard counter
    #[arg(long)]
    scan_duration: Option<f64>,

    /// Counter counts to sweep, e.g. "1-5", "3" or "1,3,5"
    #[arg(long)]
    servers: Option<String>,

    /// Base seed added to every replica seed
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Per-replica results CSV
    #[arg(long, default_value = "checkout_results.csv")]
    output: PathBuf,

    /// Grouped summary CSV
    #[arg(long)]
    summary_output: Option<PathBuf>,

    /// Also write the per-replica results as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Also write the per-replica results as Parquet
    #[arg(long)]
    parquet: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<ExperimentConfig, Box<dyn std::error::Error>> {
    let mut config = match (&args.config, &args.preset) {
        (Some(path), _) => ExperimentConfig::from_json_file(path)?,
        (None, Some(name)) => presets::by_name(name)?,
        (None, None) => presets::default_example(),
    };

    if let Some(replicas) = args.replicas {
        config.replicas = replicas;
    }
    if let Some(horizon) = args.horizon {
        config.horizon = horizon;
    }
    if let Some(rate) = args.arrival_rate {
        config.arrival_rate = rate;
    }
    if let Some(scan) = args.scan_duration {
        config.scan_duration = scan;
    }
    if let Some(servers) = &args.servers {
        config.server_counts = parse_server_range(servers)?;
    }
    if let Some(seed) = args.seed {
        config.base_seed = seed;
    }
    Ok(config)
}

fn print_report(report: &SweepReport) {
    println!(
        "{:>8} {:>10} {:>10} {:>10} {:>8} {:>10} {:>10} {:>6}",
        "counters", "W (min)", "Lq", "util %", "SLA %", "cost", "cost std", "open?"
    );
    for row in &report.summary {
        println!(
            "{:>8} {:>10.3} {:>10.3} {:>10.1} {:>8.1} {:>10.2} {:>10.2} {:>6}",
            row.num_servers,
            row.time_in_system.mean,
            row.queue_length.mean,
            row.utilization.mean * 100.0,
            row.sla_percent.mean,
            row.cost_total.mean,
            row.cost_total.std,
            if row.opens_counter { "yes" } else { "" }
        );
    }
    match &report.recommendation {
        Some(rec) => println!("\n{rec}"),
        None => println!("\nNo recommendation: nothing was simulated."),
    }
}

fn write_outputs(args: &Args, report: &SweepReport) -> Result<(), Box<dyn std::error::Error>> {
    export_to_csv(&report.results, &args.output)?;
    info!(path = %args.output.display(), "Wrote results");
    if let Some(path) = &args.summary_output {
        export_summary_to_csv(&report.summary, path)?;
        info!(path = %path.display(), "Wrote summary");
    }
    if let Some(path) = &args.json {
        export_to_json(&report.results, path)?;
        info!(path = %path.display(), "Wrote JSON results");
    }
    if let Some(path) = &args.parquet {
        export_to_parquet(&report.results, path)?;
        info!(path = %path.display(), "Wrote Parquet results");
    }
    Ok(())
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args)?;
    let options = SweepOptions {
        num_threads: args.threads,
        show_progress: !args.no_progress,
    };
    let report = run_sweep(&config, &options)?;
    print_report(&report);
    write_outputs(args, &report)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("warn,checkout_experiments=info,checkout_sweep=info")
            }),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "Sweep failed");
            ExitCode::FAILURE
        }
    }
}
