//! Single-game execution and result capture.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info};

use triage::core::ledger::Ledger;
use triage::core::queue::EntityQueue;
use triage::driver::{DecisionRecord, ShiftConfig, run_shift};
use triage::io::config::GameConfig;
use triage::io::dataset::load_dataset;
use triage::io::run_log::action_frequencies;
use triage::policy::Policy;
use triage::policy::heuristic::HeuristicPolicy;
use triage::policy::roles::Role;

use crate::results::{EvalMeta, capture_run, file_sha256};

/// Result of one evaluated game.
#[derive(Debug)]
pub struct RunOutcome {
    pub eval_run_id: String,
    pub results_dir: PathBuf,
    pub reward: i64,
    pub saved: u32,
    pub killed: u32,
}

/// Play one seeded game in-process and capture its results directory.
pub fn run_one(
    dataset: &Path,
    cfg: &GameConfig,
    seed: u64,
    role: Role,
    run_num: u32,
    results_base: &Path,
) -> Result<RunOutcome> {
    let started_at = Utc::now();
    let eval_run_id = format!("eval-{}_{:03}", started_at.format("%Y%m%d_%H%M%S"), run_num);
    debug!(eval_run_id, seed, "starting game");

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
    let finished_at = Utc::now();
    let duration = finished_at - started_at;

    let mut errors = Vec::new();
    let dataset_sha256 = match file_sha256(dataset) {
        Ok(hash) => hash,
        Err(err) => {
            errors.push(format!("dataset hash: {err}"));
            String::new()
        }
    };

    let meta = EvalMeta {
        eval_run_id: eval_run_id.clone(),
        dataset: dataset.display().to_string(),
        dataset_sha256,
        policy: policy.name().to_string(),
        role,
        seed,
        stop: outcome.stop,
        final_scram: outcome.final_scram,
        decisions: outcome.decisions,
        saved: outcome.score.saved,
        killed: outcome.score.killed,
        reward: outcome.reward,
        time_used: outcome.score.time_used,
        action_frequencies: action_frequencies(&decisions),
        start_time: started_at.to_rfc3339(),
        end_time: finished_at.to_rfc3339(),
        duration_secs: duration.num_milliseconds() as f64 / 1000.0,
        errors,
    };

    let results_dir = capture_run(results_base, &meta, &decisions).context("capture results")?;
    info!(
        eval_run_id,
        reward = meta.reward,
        saved = meta.saved,
        killed = meta.killed,
        "game complete"
    );

    Ok(RunOutcome {
        eval_run_id,
        results_dir,
        reward: meta.reward,
        saved: meta.saved,
        killed: meta.killed,
    })
}
