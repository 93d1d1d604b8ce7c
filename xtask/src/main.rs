use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the checkout sizing workspace",
    long_about = "A unified CLI for running replicas, counter sweeps, benchmarks,\n\
                  and CI checks in the checkout sizing workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one replica per counter count (1 to 5) and print per-counter details
    Run,
    /// Run the checkout_sweep CLI; extra arguments are passed through
    Sweep {
        /// Named preset (default, baseline, peak_hour, minimal)
        #[arg(long, default_value = "default", env = "CHECKOUT_PRESET")]
        preset: String,
        /// Arguments forwarded to checkout_sweep
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run the parameter_sweep example (rush hour, all exports)
    SweepExample,
    /// Run Criterion benchmarks
    Bench,
    /// Compare benchmarks: stash changes, create baseline, restore, compare
    BenchCompare,
    /// Run CI checks (fmt, clippy, tests, examples, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Run load tests (ignored tests in checkout_core)
    LoadTest,
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Build and run examples and a minimal sweep
    Examples,
    /// Run benchmarks
    Bench,
    /// Run check + examples + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn git(args: &[&str]) -> ExitStatus {
    eprintln!("+ git {}", args.join(" "));
    Command::new("git")
        .args(args)
        .status()
        .expect("failed to execute git")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_git(args: &[&str]) {
    let status = git(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_sweep_cli(extra: &[&str]) {
    let mut args = vec![
        "run",
        "-p",
        "checkout_experiments",
        "--bin",
        "checkout_sweep",
        "--release",
        "--",
    ];
    args.extend_from_slice(extra);
    run_cargo(&args);
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test checkout_core");
    run_cargo(&["test", "-p", "checkout_core"]);

    step("Test checkout_experiments");
    run_cargo(&["test", "-p", "checkout_experiments"]);
}

fn ci_examples() {
    step("Run replica_run (1 to 5 counters)");
    run_cargo(&[
        "run",
        "-p",
        "checkout_core",
        "--example",
        "replica_run",
        "--release",
    ]);

    step("Run minimal sweep");
    let output = Path::new("target").join("ci_sweep");
    let results = output.join("results.csv");
    let summary = output.join("summary.csv");
    run_sweep_cli(&[
        "--preset",
        "minimal",
        "--no-progress",
        "--output",
        &results.to_string_lossy(),
        "--summary-output",
        &summary.to_string_lossy(),
    ]);
}

fn ci_bench() {
    step("Run benchmarks");
    run_cargo(&["bench", "--package", "checkout_core", "--bench", "performance"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_cargo(&[
                "run",
                "-p",
                "checkout_core",
                "--example",
                "replica_run",
                "--release",
            ]);
        }
        Commands::Sweep { preset, args } => {
            let mut forwarded = vec!["--preset", preset.as_str()];
            forwarded.extend(args.iter().map(String::as_str));
            run_sweep_cli(&forwarded);
        }
        Commands::SweepExample => {
            run_cargo(&[
                "run",
                "-p",
                "checkout_experiments",
                "--example",
                "parameter_sweep",
                "--release",
            ]);
        }
        Commands::Bench => {
            run_cargo(&["bench", "--package", "checkout_core", "--bench", "performance"]);
        }
        Commands::BenchCompare => {
            let baseline_dir = Path::new("target/criterion");
            if baseline_dir.exists() {
                step("Removing existing benchmark data");
                std::fs::remove_dir_all(baseline_dir).expect("failed to remove target/criterion");
            }

            step("Stashing current changes");
            run_git(&[
                "stash",
                "push",
                "-m",
                "Temporary stash for benchmark comparison",
            ]);

            step("Running benchmark to create baseline");
            run_cargo(&[
                "bench",
                "--package",
                "checkout_core",
                "--bench",
                "performance",
                "--",
                "--save-baseline",
                "main",
            ]);

            step("Reapplying changes");
            run_git(&["stash", "pop"]);

            step("Running benchmark comparing against baseline");
            run_cargo(&[
                "bench",
                "--package",
                "checkout_core",
                "--bench",
                "performance",
                "--",
                "--baseline",
                "main",
            ]);

            eprintln!("\nDone! Check the output above to see performance comparison.");
        }
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Examples => ci_examples(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_examples();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::LoadTest => {
            run_cargo(&[
                "test",
                "-p",
                "checkout_core",
                "--test",
                "load_tests",
                "--",
                "--ignored",
            ]);
        }
    }
}
