mod cli;
mod report;
mod results;
mod run;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "eval", version, about = "Batch evaluation harness for the triage game")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a batch of seeded games and capture per-run results.
    Run {
        /// Path to the entity dataset (JSON).
        #[arg(long, default_value = "data/entities.json")]
        dataset: PathBuf,
        /// Path to the game config (TOML); defaults apply when missing.
        #[arg(long, default_value = "triage.toml")]
        config: PathBuf,
        /// Number of games to play.
        #[arg(long, default_value_t = 5)]
        runs: u32,
        /// Base seed; run N uses `seed + N - 1`.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Persona role recorded with each run (overrides config).
        #[arg(long)]
        role: Option<String>,
        /// Directory for captured results.
        #[arg(long, default_value = "eval/results")]
        results_dir: PathBuf,
    },
    /// Show aggregated results for a batch directory.
    Report {
        #[arg(long, default_value = "eval/results")]
        results_dir: PathBuf,
    },
    /// Remove captured results.
    Clean {
        #[arg(long, default_value = "eval/results")]
        results_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    triage::logging::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            dataset,
            config,
            runs,
            seed,
            role,
            results_dir,
        } => cli::run_batch(&dataset, &config, runs, seed, role.as_deref(), &results_dir),
        Command::Report { results_dir } => cli::report(&results_dir),
        Command::Clean { results_dir } => cli::clean(&results_dir),
    }
}
