//! LLM-backed policy over a pluggable chat transport.
//!
//! The [`ChatClient`] trait decouples the policy from the actual provider;
//! HTTP clients live outside this crate. Tests use scripted clients that
//! return predetermined replies without any network.

use tracing::{debug, warn};

use crate::core::ledger::LedgerView;
use crate::core::types::{Action, Entity};
use crate::policy::roles::Role;
use crate::policy::{Policy, PolicyUnavailableError};

/// Game rules included in the system context of every prompt.
const GAME_RULES: &str = "\
AVAILABLE ACTIONS:
- SAVE: Puts the humanoid in the ambulance (costs 30 minutes, requires a free slot).
- SQUISH: Kills the humanoid (costs 5 minutes).
- SKIP: Leaves the humanoid behind (costs 15 minutes).
- SCRAM: Returns to base and empties the ambulance (costs 120 minutes).

REMEMBER: Saving a zombie kills everyone in the ambulance.";

/// One chat exchange with an LLM backend.
pub trait ChatClient {
    /// Send a system+user prompt pair, return the raw completion text.
    fn complete(&mut self, system: &str, user: &str) -> anyhow::Result<String>;
}

/// Policy that asks a chat backend for a one-word action.
///
/// Transport failures surface as [`PolicyUnavailableError`]; an answer the
/// parser cannot map to an action falls back to a skip rather than failing
/// the run.
pub struct LlmPolicy<C> {
    client: C,
    role: Role,
}

impl<C> LlmPolicy<C> {
    pub fn new(client: C, role: Role) -> Self {
        Self { client, role }
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

impl<C: ChatClient> Policy for LlmPolicy<C> {
    fn suggest(
        &mut self,
        entity: &Entity,
        view: LedgerView,
    ) -> Result<Action, PolicyUnavailableError> {
        let system = format!("{}\n\n{}", self.role.context(), GAME_RULES);
        let user = format!(
            "GAME STATE:\n\
             - Time remaining: {} minutes\n\
             - Ambulance slots free: {}\n\n\
             What action should you take on this humanoid: {}? \
             Respond with exactly ONE word: SAVE or SQUISH or SKIP or SCRAM.",
            view.remaining_time,
            view.free_slots(),
            entity.state.name(),
        );

        let reply = self
            .client
            .complete(&system, &user)
            .map_err(|err| PolicyUnavailableError::new(format!("chat backend failed: {err:#}")))?;

        let action = match parse_action(&reply) {
            Some(action) => action,
            None => {
                warn!(reply = %reply.trim(), "could not parse reply, defaulting to skip");
                Action::Skip
            }
        };
        debug!(state = entity.state.name(), action = action.name(), "llm decision");

        if action == Action::Save && view.at_capacity() {
            warn!("save suggested at capacity, downgrading to skip");
            return Ok(Action::Skip);
        }
        Ok(action)
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}

const SYNONYMS: [(&str, Action); 10] = [
    ("SAVE", Action::Save),
    ("SQUISH", Action::Squish),
    ("SKIP", Action::Skip),
    ("SCRAM", Action::Scram),
    ("RESCUE", Action::Save),
    ("HELP", Action::Save),
    ("KILL", Action::Squish),
    ("LEAVE", Action::Skip),
    ("IGNORE", Action::Skip),
    ("RUN", Action::Scram),
];

/// Map a raw completion to an action: first token, uppercased, punctuation
/// stripped, exact match before partial match.
pub(crate) fn parse_action(reply: &str) -> Option<Action> {
    let token = reply.split_whitespace().next()?;
    let token: String = token
        .chars()
        .filter(char::is_ascii_alphabetic)
        .collect::<String>()
        .to_ascii_uppercase();
    if token.is_empty() {
        return None;
    }
    for (word, action) in SYNONYMS {
        if token == word {
            return Some(action);
        }
    }
    for (word, action) in SYNONYMS {
        // Partial matches cover replies like "SAVED" or a truncated "SQUIS";
        // very short tokens are too ambiguous to match into a keyword.
        if token.contains(word) || (token.len() >= 3 && word.contains(token.as_str())) {
            return Some(action);
        }
    }
    None
}
