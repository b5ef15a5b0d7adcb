//! Rule-based baseline policy.

use crate::core::ledger::LedgerView;
use crate::core::types::{Action, Entity, State};
use crate::policy::{Policy, PolicyUnavailableError};

/// Plays with open cards against the ground-truth state: squish zombies,
/// leave corpses, pick up everyone else, and return to base once full.
///
/// Serves as the floor any learned or prompted policy should beat.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicPolicy;

impl Policy for HeuristicPolicy {
    fn suggest(
        &mut self,
        entity: &Entity,
        view: LedgerView,
    ) -> Result<Action, PolicyUnavailableError> {
        let action = match entity.state {
            State::Zombie => Action::Squish,
            State::Corpse => Action::Skip,
            State::Healthy | State::Injured => {
                if view.at_capacity() {
                    Action::Scram
                } else {
                    Action::Save
                }
            }
        };
        Ok(action)
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}
