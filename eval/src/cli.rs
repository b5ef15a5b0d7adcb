//! CLI command implementations.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use triage::io::config::load_config;
use triage::policy::roles::Role;

use crate::report::aggregate;
use crate::run::run_one;

/// Run a batch of seeded games and print one line per run plus a summary.
pub fn run_batch(
    dataset: &Path,
    config: &Path,
    runs: u32,
    base_seed: u64,
    role: Option<&str>,
    results_dir: &Path,
) -> Result<()> {
    let cfg = load_config(config)?;
    let role: Role = match role {
        Some(raw) => raw.parse()?,
        None => cfg.role,
    };
    debug!(runs, base_seed, %role, "batch configured");

    info!(runs, "starting batch");
    for run_num in 1..=runs {
        let seed = base_seed + u64::from(run_num - 1);
        let outcome = run_one(dataset, &cfg, seed, role, run_num, results_dir)
            .with_context(|| format!("run {run_num}/{runs}"))?;
        println!(
            "run: {}/{} eval_run_id={} seed={} reward={} saved={} killed={}",
            run_num,
            runs,
            outcome.eval_run_id,
            seed,
            outcome.reward,
            outcome.saved,
            outcome.killed
        );
    }

    report(results_dir)
}

/// Show aggregated results for a batch directory.
pub fn report(results_dir: &Path) -> Result<()> {
    let (summary, warnings) = aggregate(results_dir)?;
    println!("report: runs={}", summary.runs);
    if summary.runs > 0 {
        println!(
            "report: mean_reward={:.2} mean_saved={:.2} mean_killed={:.2}",
            summary.mean_reward, summary.mean_saved, summary.mean_killed
        );
        println!(
            "report: best_reward={} worst_reward={}",
            summary.best_reward, summary.worst_reward
        );
        for (action, count) in &summary.action_totals {
            println!("report: action {action} {count}");
        }
        if let Some(avg) = summary.avg_duration_secs {
            println!("report: avg_duration_secs={avg:.2}");
        }
    }
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}

/// Remove captured results.
pub fn clean(results_dir: &Path) -> Result<()> {
    if results_dir.exists() {
        std::fs::remove_dir_all(results_dir)
            .with_context(|| format!("remove {}", results_dir.display()))?;
    }
    println!("clean: {}", results_dir.display());
    Ok(())
}
