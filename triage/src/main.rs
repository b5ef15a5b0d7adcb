//! Rescue/triage decision game CLI.
//!
//! Plays one scored shift: draw humanoids in random order, ask the selected
//! policy for an action, apply it to the ledger, and report the final score.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};

use triage::core::ledger::Ledger;
use triage::core::queue::EntityQueue;
use triage::driver::{DecisionRecord, ShiftConfig, run_shift};
use triage::io::config::load_config;
use triage::io::dataset::load_dataset;
use triage::io::run_log::{RunMeta, action_frequencies, write_run};
use triage::policy::Policy;
use triage::policy::heuristic::HeuristicPolicy;
use triage::policy::roles::Role;

#[derive(Parser)]
#[command(
    name = "triage",
    version,
    about = "Scored rescue-vs-triage decision game"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play one shift with the baseline heuristic policy.
    Run {
        /// Path to the entity dataset (JSON).
        #[arg(long, default_value = "data/entities.json")]
        dataset: PathBuf,
        /// Path to the game config (TOML); defaults apply when missing.
        #[arg(long, default_value = "triage.toml")]
        config: PathBuf,
        /// Seed for the entity draw order.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Persona role recorded with the run (overrides config).
        #[arg(long)]
        role: Option<String>,
        /// Write run artifacts under `runs/<run_id>/`.
        #[arg(short, long)]
        log: bool,
    },
    /// Check that a dataset file parses and report its composition.
    Validate {
        /// Path to the entity dataset (JSON).
        dataset: PathBuf,
    },
}

fn main() {
    triage::logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            dataset,
            config,
            seed,
            role,
            log,
        } => cmd_run(&dataset, &config, seed, role.as_deref(), log),
        Command::Validate { dataset } => cmd_validate(&dataset),
    }
}

fn cmd_run(
    dataset: &Path,
    config: &Path,
    seed: u64,
    role: Option<&str>,
    log: bool,
) -> Result<()> {
    let cfg = load_config(config)?;
    let role: Role = match role {
        Some(raw) => raw.parse()?,
        None => cfg.role,
    };

    let entities = load_dataset(dataset).context("load dataset")?;
    let mut queue = EntityQueue::load(entities, seed)?;
    let mut ledger = Ledger::new(cfg.shift_length, cfg.capacity);
    let mut policy = HeuristicPolicy;

    let mut decisions: Vec<DecisionRecord> = Vec::new();
    let outcome = run_shift(
        &mut queue,
        &mut ledger,
        &mut policy,
        &ShiftConfig {
            scram_on_exit: cfg.scram_on_exit,
        },
        |record| decisions.push(record.clone()),
    );

    println!(
        "run: policy={} role={} seed={} stop={:?} decisions={}",
        policy.name(),
        role,
        seed,
        outcome.stop,
        outcome.decisions
    );
    println!(
        "score: saved={} killed={} reward={} time_used={}",
        outcome.score.saved, outcome.score.killed, outcome.reward, outcome.score.time_used
    );

    if log {
        let run_id = format!("run-{}", Utc::now().format("%Y%m%d_%H%M%S"));
        let meta = RunMeta {
            run_id: run_id.clone(),
            policy: policy.name().to_string(),
            role,
            seed,
            shift_length: cfg.shift_length,
            capacity: cfg.capacity,
            stop: outcome.stop,
            final_scram: outcome.final_scram,
            decisions: outcome.decisions,
            saved: outcome.score.saved,
            killed: outcome.score.killed,
            reward: outcome.reward,
            time_used: outcome.score.time_used,
            action_frequencies: action_frequencies(&decisions),
        };
        let paths = write_run(&std::env::current_dir()?, &meta, &decisions)?;
        println!("log: {}", paths.dir.display());
    }

    Ok(())
}

fn cmd_validate(dataset: &Path) -> Result<()> {
    let entities = load_dataset(dataset)?;
    let mut by_state: BTreeMap<&str, usize> = BTreeMap::new();
    for entity in &entities {
        *by_state.entry(entity.state.name()).or_insert(0) += 1;
    }
    println!("dataset: {} entities", entities.len());
    for (state, count) in by_state {
        println!("dataset: {state}={count}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_run_defaults() {
        let cli = Cli::parse_from(["triage", "run"]);
        match cli.command {
            Command::Run {
                seed, role, log, ..
            } => {
                assert_eq!(seed, 0);
                assert!(role.is_none());
                assert!(!log);
            }
            Command::Validate { .. } => panic!("expected run"),
        }
    }

    #[test]
    fn parse_run_with_role_and_seed() {
        let cli = Cli::parse_from(["triage", "run", "--seed", "9", "--role", "doctor", "--log"]);
        match cli.command {
            Command::Run {
                seed, role, log, ..
            } => {
                assert_eq!(seed, 9);
                assert_eq!(role.as_deref(), Some("doctor"));
                assert!(log);
            }
            Command::Validate { .. } => panic!("expected run"),
        }
    }

    #[test]
    fn parse_validate() {
        let cli = Cli::parse_from(["triage", "validate", "data/entities.json"]);
        assert!(matches!(cli.command, Command::Validate { .. }));
    }
}
