//! Persisted run artifacts under `runs/<run_id>/`.
//!
//! Each completed run gets its own directory with a final summary and the
//! per-decision records. Written once at the end of a run and never mutated
//! afterwards.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::driver::{DecisionRecord, StopReason};
use crate::policy::roles::Role;

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub run_id: String,
    pub policy: String,
    pub role: Role,
    pub seed: u64,
    pub shift_length: i32,
    pub capacity: usize,
    pub stop: StopReason,
    pub final_scram: bool,
    pub decisions: u32,
    pub saved: u32,
    pub killed: u32,
    pub reward: i64,
    pub time_used: i32,
    pub action_frequencies: BTreeMap<String, u32>,
}

#[derive(Debug, Clone)]
pub struct RunPaths {
    pub dir: PathBuf,
    pub meta_path: PathBuf,
    pub decisions_path: PathBuf,
}

impl RunPaths {
    pub fn new(root: &Path, run_id: &str) -> Self {
        let dir = root.join("runs").join(run_id);
        Self {
            dir: dir.clone(),
            meta_path: dir.join("meta.json"),
            decisions_path: dir.join("decisions.json"),
        }
    }
}

/// Count applied actions by name, in stable order.
pub fn action_frequencies(decisions: &[DecisionRecord]) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for name in ["SAVE", "SQUISH", "SKIP", "SCRAM"] {
        counts.insert(name.to_string(), 0);
    }
    for record in decisions {
        *counts.entry(record.applied.name().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Write the run's artifacts. Files are written in deterministic order to
/// keep logs stable.
pub fn write_run(
    root: &Path,
    meta: &RunMeta,
    decisions: &[DecisionRecord],
) -> Result<RunPaths> {
    let paths = RunPaths::new(root, &meta.run_id);
    fs::create_dir_all(&paths.dir)
        .with_context(|| format!("create run dir {}", paths.dir.display()))?;

    write_json(&paths.meta_path, meta)?;
    write_json(&paths.decisions_path, &decisions)?;

    Ok(paths)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(value)?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Action, Entity, State};

    fn record(applied: Action) -> DecisionRecord {
        DecisionRecord {
            entity: Entity::new(State::Healthy),
            suggested: applied,
            applied,
            remaining_time: 600,
            passengers: 0,
            saved: 0,
            killed: 0,
            reward: 0,
        }
    }

    fn meta() -> RunMeta {
        RunMeta {
            run_id: "run-20250101_120000".to_string(),
            policy: "heuristic".to_string(),
            role: Role::Default,
            seed: 7,
            shift_length: 720,
            capacity: 10,
            stop: StopReason::QueueExhausted,
            final_scram: true,
            decisions: 2,
            saved: 1,
            killed: 0,
            reward: 1,
            time_used: 165,
            action_frequencies: BTreeMap::new(),
        }
    }

    #[test]
    fn run_paths_are_stable() {
        let paths = RunPaths::new(Path::new("/tmp/game"), "run-1");
        assert!(paths.dir.ends_with(Path::new("runs/run-1")));
        assert!(paths.meta_path.ends_with("meta.json"));
        assert!(paths.decisions_path.ends_with("decisions.json"));
    }

    #[test]
    fn counts_applied_actions_with_all_keys_present() {
        let decisions = vec![
            record(Action::Save),
            record(Action::Save),
            record(Action::Skip),
        ];
        let counts = action_frequencies(&decisions);
        assert_eq!(counts["SAVE"], 2);
        assert_eq!(counts["SKIP"], 1);
        assert_eq!(counts["SQUISH"], 0);
        assert_eq!(counts["SCRAM"], 0);
    }

    #[test]
    fn writes_meta_and_decisions() {
        let temp = tempfile::tempdir().expect("tempdir");
        let decisions = vec![record(Action::Save), record(Action::Scram)];

        let paths = write_run(temp.path(), &meta(), &decisions).expect("write run");

        assert!(paths.meta_path.is_file());
        assert!(paths.decisions_path.is_file());

        let meta_json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths.meta_path).expect("read meta"))
                .expect("parse meta");
        assert_eq!(meta_json["policy"], "heuristic");
        assert_eq!(meta_json["stop"], "queue_exhausted");

        let decisions_json: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(&paths.decisions_path).expect("read decisions"),
        )
        .expect("parse decisions");
        assert_eq!(decisions_json.as_array().expect("array").len(), 2);
    }
}
