//! Example: size the checkout line for a rush hour.
//!
//! This example demonstrates how to:
//! 1. Start from a preset and adjust it
//! 2. Run the sweep in parallel
//! 3. Read the summary and recommendation
//! 4. Export results to CSV/JSON/Parquet
//!
//! Run with: cargo run -p checkout_experiments --example parameter_sweep

use checkout_experiments::{
    export_summary_to_csv, export_to_csv, export_to_json, export_to_parquet, presets, run_sweep,
    SweepOptions,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Starting counter sizing sweep...");

    // Select a preset:
    // - default_example(): λ = 2, counters 1 to 5
    // - baseline(): quiet period, λ = 1
    // - peak_hour(): λ = 5, counters 2 to 8
    // - minimal(): quick testing
    let mut config = presets::peak_hour().with_replicas(20);
    config.cost.sla_threshold = 6.0;

    println!(
        "Running {} replicas ({} counter counts x {} replicas)...",
        config.total_runs(),
        config.server_counts.len(),
        config.replicas
    );
    let report = run_sweep(
        &config,
        &SweepOptions {
            num_threads: None,
            show_progress: true,
        },
    )?;

    println!("\n=== Summary ===");
    for row in &report.summary {
        println!(
            "{} counters: cost {:.2} ± {:.2}, SLA {:.1}%, utilization {:.1}%, Lq {:.2}{}",
            row.num_servers,
            row.cost_total.mean,
            row.cost_total.std,
            row.sla_percent.mean,
            row.utilization.mean * 100.0,
            row.queue_length.mean,
            if row.opens_counter { "  (open another)" } else { "" }
        );
    }

    if let Some(rec) = &report.recommendation {
        println!("\n=== Recommendation ===\n{rec}");
    }

    println!("\nExporting results...");
    export_to_csv(&report.results, "checkout_results.csv")?;
    export_summary_to_csv(&report.summary, "checkout_summary.csv")?;
    export_to_json(&report.results, "checkout_results.json")?;
    export_to_parquet(&report.results, "checkout_results.parquet")?;
    println!("Wrote checkout_results.{{csv,json,parquet}} and checkout_summary.csv");

    Ok(())
}
