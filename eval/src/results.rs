//! Result capture and persistence.
//!
//! Each evaluated game gets `results/<eval_run_id>/` with `meta.json` and
//! `decisions.json`, never mutated after capture.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use triage::driver::{DecisionRecord, StopReason};
use triage::policy::roles::Role;

/// Metadata for one evaluated game, persisted to `meta.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalMeta {
    pub eval_run_id: String,
    pub dataset: String,
    /// SHA-256 of the dataset file for reproducibility tracking.
    pub dataset_sha256: String,
    pub policy: String,
    pub role: Role,
    pub seed: u64,
    pub stop: StopReason,
    pub final_scram: bool,
    pub decisions: u32,
    pub saved: u32,
    pub killed: u32,
    pub reward: i64,
    pub time_used: i32,
    pub action_frequencies: BTreeMap<String, u32>,
    pub start_time: String,
    pub end_time: String,
    pub duration_secs: f64,
    /// Non-fatal errors encountered during capture.
    pub errors: Vec<String>,
}

/// Write one game's artifacts under `base_dir/<eval_run_id>/`.
pub fn capture_run(
    base_dir: &Path,
    meta: &EvalMeta,
    decisions: &[DecisionRecord],
) -> Result<PathBuf> {
    let results_dir = base_dir.join(&meta.eval_run_id);
    fs::create_dir_all(&results_dir)
        .with_context(|| format!("create results dir {}", results_dir.display()))?;

    write_json(&results_dir.join("meta.json"), meta)?;
    write_json(&results_dir.join("decisions.json"), &decisions)?;

    Ok(results_dir)
}

pub fn file_sha256(path: &Path) -> Result<String> {
    let contents = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&contents);
    Ok(hex::encode(hasher.finalize()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(value)?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write {}", path.display()))
}
