//! Shared deterministic types for the game core.
//!
//! These types define stable contracts between core components. They must not
//! depend on external state or I/O and must remain deterministic across runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ground-truth condition of a humanoid. Hidden from the player; policies
/// that inspect it directly (heuristic baseline, text prompts) are playing
/// with open cards by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    Healthy,
    Injured,
    Corpse,
    Zombie,
}

impl State {
    pub const fn name(self) -> &'static str {
        match self {
            State::Healthy => "HEALTHY",
            State::Injured => "INJURED",
            State::Corpse => "CORPSE",
            State::Zombie => "ZOMBIE",
        }
    }
}

/// One humanoid presented to the policy each turn.
///
/// Identity is fixed at dataset load time. Visited bookkeeping lives in the
/// [`EntityQueue`](crate::core::queue::EntityQueue), so an `Entity` itself
/// never mutates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub state: State,
    /// Presentation-layer reference (e.g. an image file). Opaque to the core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
}

impl Entity {
    pub fn new(state: State) -> Self {
        Self { state, image: None }
    }

    pub fn with_image(state: State, image: PathBuf) -> Self {
        Self {
            state,
            image: Some(image),
        }
    }
}

/// The four available responses, each with a fixed minute cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Save,
    Squish,
    Skip,
    Scram,
}

impl Action {
    /// Fixed time cost in minutes. There are no hidden costs anywhere else.
    pub const fn cost(self) -> i32 {
        match self {
            Action::Save => 30,
            Action::Squish => 5,
            Action::Skip => 15,
            Action::Scram => 120,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Action::Save => "SAVE",
            Action::Squish => "SQUISH",
            Action::Skip => "SKIP",
            Action::Scram => "SCRAM",
        }
    }
}

/// Source dataset was empty or malformed. Fatal at start-up, no recovery.
#[derive(Debug, Clone, Error)]
#[error("dataset failed to load: {reason}")]
pub struct DataLoadError {
    pub reason: String,
}

impl DataLoadError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
