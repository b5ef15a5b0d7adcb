//! Decision policies behind a single capability interface.
//!
//! The [`Policy`] trait decouples the run driver from the actual decision
//! backend (rule-based baseline, LLM-backed adapter). Tests use scripted
//! policies that return predetermined actions.

use thiserror::Error;

use crate::core::ledger::LedgerView;
use crate::core::types::{Action, Entity};

pub mod heuristic;
pub mod llm;
pub mod roles;

/// The external decision source failed (transport error, timeout, missing
/// backend). Recovered locally by the driver, which substitutes a skip;
/// never propagated to terminate the run.
#[derive(Debug, Clone, Error)]
#[error("decision policy unavailable: {reason}")]
pub struct PolicyUnavailableError {
    pub reason: String,
}

impl PolicyUnavailableError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Abstraction over decision backends.
///
/// `view` is the current read-only ledger state; `view.at_capacity()` tells
/// the policy whether a save can possibly succeed. Policies that suggest a
/// save anyway are downgraded to a skip by the driver.
pub trait Policy {
    fn suggest(
        &mut self,
        entity: &Entity,
        view: LedgerView,
    ) -> Result<Action, PolicyUnavailableError>;

    /// Short identifier recorded in run logs.
    fn name(&self) -> &'static str;
}
