//! Game configuration stored as TOML.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::policy::roles::Role;

/// Game configuration (TOML).
///
/// Intended to be edited by humans; missing fields default to the original
/// shift parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    /// Shift length in minutes.
    pub shift_length: i32,

    /// Ambulance slots.
    pub capacity: usize,

    /// Settle a non-empty ambulance with a final scram when the shift ends.
    pub scram_on_exit: bool,

    /// Persona role for prompt-backed policies, recorded with every run.
    pub role: Role,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            shift_length: 720,
            capacity: 10,
            scram_on_exit: true,
            role: Role::Default,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.shift_length <= 0 {
            return Err(anyhow!("shift_length must be > 0"));
        }
        if self.capacity == 0 {
            return Err(anyhow!("capacity must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `GameConfig::default()`.
pub fn load_config(path: &Path) -> Result<GameConfig> {
    if !path.exists() {
        let cfg = GameConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: GameConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &GameConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
