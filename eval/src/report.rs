//! Aggregation across captured runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::results::EvalMeta;

#[derive(Debug, Default)]
pub struct ReportSummary {
    pub runs: usize,
    pub mean_reward: f64,
    pub mean_saved: f64,
    pub mean_killed: f64,
    pub best_reward: i64,
    pub worst_reward: i64,
    pub action_totals: BTreeMap<String, u64>,
    pub avg_duration_secs: Option<f64>,
}

pub fn load_run_dirs(results_dir: &Path) -> Result<Vec<PathBuf>> {
    if !results_dir.exists() {
        return Ok(Vec::new());
    }
    let mut dirs = Vec::new();
    for entry in
        fs::read_dir(results_dir).with_context(|| format!("read {}", results_dir.display()))?
    {
        let entry = entry.context("read entry")?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Aggregate every readable `meta.json` under `results_dir`. Broken runs are
/// reported as warnings rather than failing the whole report.
pub fn aggregate(results_dir: &Path) -> Result<(ReportSummary, Vec<String>)> {
    let mut summary = ReportSummary::default();
    let mut warnings = Vec::new();

    let mut reward_total = 0i64;
    let mut saved_total = 0u64;
    let mut killed_total = 0u64;
    let mut duration_total = 0.0f64;

    for run_dir in load_run_dirs(results_dir)? {
        let meta_path = run_dir.join("meta.json");
        let meta: EvalMeta = match fs::read_to_string(&meta_path)
            .with_context(|| format!("read {}", meta_path.display()))
            .and_then(|contents| serde_json::from_str(&contents).context("parse meta"))
        {
            Ok(meta) => meta,
            Err(err) => {
                warnings.push(format!("{}: {err:#}", run_dir.display()));
                continue;
            }
        };

        if summary.runs == 0 {
            summary.best_reward = meta.reward;
            summary.worst_reward = meta.reward;
        } else {
            summary.best_reward = summary.best_reward.max(meta.reward);
            summary.worst_reward = summary.worst_reward.min(meta.reward);
        }

        summary.runs += 1;
        reward_total += meta.reward;
        saved_total += u64::from(meta.saved);
        killed_total += u64::from(meta.killed);
        duration_total += meta.duration_secs;
        for (action, count) in meta.action_frequencies {
            *summary.action_totals.entry(action).or_insert(0) += u64::from(count);
        }
    }

    if summary.runs > 0 {
        let runs = summary.runs as f64;
        summary.mean_reward = reward_total as f64 / runs;
        summary.mean_saved = saved_total as f64 / runs;
        summary.mean_killed = killed_total as f64 / runs;
        summary.avg_duration_secs = Some(duration_total / runs);
    }

    Ok((summary, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage::driver::StopReason;
    use triage::policy::roles::Role;

    fn write_meta(results_dir: &Path, id: &str, reward: i64, saved: u32, killed: u32) {
        let dir = results_dir.join(id);
        fs::create_dir_all(&dir).expect("mkdir");
        let mut frequencies = BTreeMap::new();
        frequencies.insert("SAVE".to_string(), saved);
        let meta = EvalMeta {
            eval_run_id: id.to_string(),
            dataset: "data/entities.json".to_string(),
            dataset_sha256: String::new(),
            policy: "heuristic".to_string(),
            role: Role::Default,
            seed: 0,
            stop: StopReason::QueueExhausted,
            final_scram: true,
            decisions: saved + killed,
            saved,
            killed,
            reward,
            time_used: 100,
            action_frequencies: frequencies,
            start_time: String::new(),
            end_time: String::new(),
            duration_secs: 2.0,
            errors: Vec::new(),
        };
        let buf = serde_json::to_string_pretty(&meta).expect("serialize");
        fs::write(dir.join("meta.json"), buf).expect("write");
    }

    #[test]
    fn aggregates_rewards_and_action_totals() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_meta(temp.path(), "eval-001", 4, 5, 1);
        write_meta(temp.path(), "eval-002", -2, 1, 3);

        let (summary, warnings) = aggregate(temp.path()).expect("aggregate");
        assert!(warnings.is_empty());
        assert_eq!(summary.runs, 2);
        assert_eq!(summary.mean_reward, 1.0);
        assert_eq!(summary.mean_saved, 3.0);
        assert_eq!(summary.mean_killed, 2.0);
        assert_eq!(summary.best_reward, 4);
        assert_eq!(summary.worst_reward, -2);
        assert_eq!(summary.action_totals["SAVE"], 6);
        assert_eq!(summary.avg_duration_secs, Some(2.0));
    }

    #[test]
    fn broken_meta_becomes_a_warning() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_meta(temp.path(), "eval-001", 1, 1, 0);
        let broken = temp.path().join("eval-002");
        fs::create_dir_all(&broken).expect("mkdir");
        fs::write(broken.join("meta.json"), "{ nope").expect("write");

        let (summary, warnings) = aggregate(temp.path()).expect("aggregate");
        assert_eq!(summary.runs, 1);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn missing_results_dir_is_empty_not_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (summary, warnings) =
            aggregate(&temp.path().join("nothing-here")).expect("aggregate");
        assert_eq!(summary.runs, 0);
        assert!(warnings.is_empty());
    }
}
