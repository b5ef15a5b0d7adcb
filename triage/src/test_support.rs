//! Test-only helpers: scripted policies, scripted chat clients, and entity
//! builders.

use std::collections::VecDeque;

use anyhow::anyhow;

use crate::core::ledger::LedgerView;
use crate::core::types::{Action, Entity, State};
use crate::policy::llm::ChatClient;
use crate::policy::{Policy, PolicyUnavailableError};

/// One scripted policy response.
#[derive(Debug, Clone)]
pub enum ScriptedSuggestion {
    Action(Action),
    Unavailable(String),
}

/// Policy that replays a fixed script, then falls back to a constant action.
#[derive(Debug)]
pub struct ScriptedPolicy {
    script: VecDeque<ScriptedSuggestion>,
    fallback: Action,
    pub calls: u32,
}

impl ScriptedPolicy {
    pub fn new(script: Vec<ScriptedSuggestion>) -> Self {
        Self {
            script: script.into(),
            fallback: Action::Skip,
            calls: 0,
        }
    }

    /// Policy that answers with the same action forever.
    pub fn always(action: Action) -> Self {
        Self {
            script: VecDeque::new(),
            fallback: action,
            calls: 0,
        }
    }
}

impl Policy for ScriptedPolicy {
    fn suggest(
        &mut self,
        _entity: &Entity,
        _view: LedgerView,
    ) -> Result<Action, PolicyUnavailableError> {
        self.calls += 1;
        match self.script.pop_front() {
            Some(ScriptedSuggestion::Action(action)) => Ok(action),
            Some(ScriptedSuggestion::Unavailable(reason)) => {
                Err(PolicyUnavailableError::new(reason))
            }
            None => Ok(self.fallback),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// One scripted chat completion.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Text(String),
    Fail(String),
}

/// Chat client that replays fixed completions and records requests.
#[derive(Debug)]
pub struct ScriptedClient {
    replies: VecDeque<ScriptedReply>,
    requests: Vec<(String, String)>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: replies.into(),
            requests: Vec::new(),
        }
    }

    /// The most recent (system, user) prompt pair sent to the client.
    pub fn last_request(&self) -> Option<&(String, String)> {
        self.requests.last()
    }
}

impl ChatClient for ScriptedClient {
    fn complete(&mut self, system: &str, user: &str) -> anyhow::Result<String> {
        self.requests.push((system.to_string(), user.to_string()));
        match self.replies.pop_front() {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Fail(reason)) => Err(anyhow!(reason)),
            None => Err(anyhow!("scripted client exhausted")),
        }
    }
}

/// Create a plain entity with the given ground-truth state.
pub fn entity(state: State) -> Entity {
    Entity::new(state)
}

/// Create one entity per state, in order.
pub fn entities(states: &[State]) -> Vec<Entity> {
    states.iter().copied().map(Entity::new).collect()
}
