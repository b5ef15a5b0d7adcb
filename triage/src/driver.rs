//! Orchestration of a single rescue shift.
//!
//! The driver owns the loop: draw an entity, ask the policy, apply the
//! action to the ledger, report the decision to the telemetry callback.
//! Policy failures and contract violations are recovered here; the ledger
//! itself stays a pure state machine.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::ledger::{Ledger, ScoreSummary};
use crate::core::queue::EntityQueue;
use crate::core::types::{Action, Entity};
use crate::policy::Policy;

/// Configuration for one shift.
#[derive(Debug, Clone)]
pub struct ShiftConfig {
    /// Settle a non-empty ambulance with a final scram when the loop exits.
    /// Without it, passengers still aboard at the end count for nothing.
    pub scram_on_exit: bool,
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self {
            scram_on_exit: true,
        }
    }
}

/// Why the shift loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// `remaining_time` reached zero or below.
    TimeExhausted,
    /// Every entity was visited.
    QueueExhausted,
}

/// One applied decision, as reported to the telemetry sink. Purely additive;
/// nothing feeds back into the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionRecord {
    pub entity: Entity,
    /// What the policy asked for.
    pub suggested: Action,
    /// What was actually applied after driver downgrades.
    pub applied: Action,
    pub remaining_time: i32,
    pub passengers: usize,
    pub saved: u32,
    pub killed: u32,
    pub reward: i64,
}

/// Summary of a completed shift.
#[derive(Debug, Clone)]
pub struct ShiftOutcome {
    pub stop: StopReason,
    pub decisions: u32,
    /// Whether the end-of-shift scram fired.
    pub final_scram: bool,
    pub score: ScoreSummary,
    pub reward: i64,
}

/// Run one shift to completion.
///
/// Loops while entities remain and time is left, then optionally settles the
/// ambulance. The ledger may end with negative remaining time; the halt
/// check happens here, before each draw, never inside the ledger.
pub fn run_shift<P: Policy, F: FnMut(&DecisionRecord)>(
    queue: &mut EntityQueue,
    ledger: &mut Ledger,
    policy: &mut P,
    config: &ShiftConfig,
    mut on_decision: F,
) -> ShiftOutcome {
    let mut decisions = 0u32;

    let stop = loop {
        if ledger.remaining_time() <= 0 {
            break StopReason::TimeExhausted;
        }
        let entity = match queue.draw_random() {
            Ok(entity) => entity,
            Err(_) => break StopReason::QueueExhausted,
        };

        let suggested = match policy.suggest(&entity, ledger.view()) {
            Ok(action) => action,
            Err(err) => {
                warn!(%err, "policy unavailable, defaulting to skip");
                Action::Skip
            }
        };

        let applied = apply(ledger, &entity, suggested);
        decisions += 1;
        debug!(
            suggested = suggested.name(),
            applied = applied.name(),
            remaining_time = ledger.remaining_time(),
            "decision applied"
        );
        on_decision(&DecisionRecord {
            entity,
            suggested,
            applied,
            remaining_time: ledger.remaining_time(),
            passengers: ledger.passengers(),
            saved: ledger.saved(),
            killed: ledger.killed(),
            reward: ledger.cumulative_reward(),
        });
    };

    let mut final_scram = false;
    if config.scram_on_exit && ledger.passengers() > 0 {
        debug!(passengers = ledger.passengers(), "settling ambulance with final scram");
        ledger.scram();
        final_scram = true;
    }

    ShiftOutcome {
        stop,
        decisions,
        final_scram,
        score: ledger.score(),
        reward: ledger.cumulative_reward(),
    }
}

/// Apply `action` to the ledger, downgrading a contract-violating save to a
/// skip. Returns the action that actually took effect.
fn apply(ledger: &mut Ledger, entity: &Entity, action: Action) -> Action {
    match action {
        Action::Save => match ledger.save(entity.clone()) {
            Ok(()) => Action::Save,
            Err(err) => {
                warn!(%err, "policy violated capacity contract, downgrading to skip");
                ledger.skip(entity);
                Action::Skip
            }
        },
        Action::Squish => {
            ledger.squish(entity);
            Action::Squish
        }
        Action::Skip => {
            ledger.skip(entity);
            Action::Skip
        }
        Action::Scram => {
            ledger.scram();
            Action::Scram
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::State;
    use crate::test_support::{ScriptedPolicy, ScriptedSuggestion, entities};

    #[test]
    fn stops_cleanly_when_queue_is_exhausted() {
        let mut queue = EntityQueue::load(entities(&[State::Corpse, State::Corpse]), 1)
            .expect("load");
        let mut ledger = Ledger::new(1000, 5);
        let mut policy = ScriptedPolicy::always(Action::Skip);

        let outcome = run_shift(&mut queue, &mut ledger, &mut policy, &ShiftConfig::default(), |_| {});

        assert_eq!(outcome.stop, StopReason::QueueExhausted);
        assert_eq!(outcome.decisions, 2);
        assert_eq!(ledger.remaining_time(), 1000 - 30);
    }

    #[test]
    fn halts_on_time_exhaustion_and_allows_negative_time() {
        // 10 minutes left: one save still applies in full, then the driver
        // halts on the next check.
        let mut queue = EntityQueue::load(entities(&[State::Healthy; 5]), 2).expect("load");
        let mut ledger = Ledger::new(10, 5);
        let mut policy = ScriptedPolicy::always(Action::Save);

        let outcome = run_shift(
            &mut queue,
            &mut ledger,
            &mut policy,
            &ShiftConfig {
                scram_on_exit: false,
            },
            |_| {},
        );

        assert_eq!(outcome.stop, StopReason::TimeExhausted);
        assert_eq!(outcome.decisions, 1);
        assert_eq!(ledger.remaining_time(), -20);
        assert_eq!(queue.remaining_count(), 4);
    }

    #[test]
    fn downgrades_save_to_skip_when_policy_ignores_capacity() {
        let mut queue =
            EntityQueue::load(entities(&[State::Healthy, State::Zombie]), 9).expect("load");
        let mut ledger = Ledger::new(1000, 1);
        let mut policy = ScriptedPolicy::always(Action::Save);

        let mut records = Vec::new();
        let outcome = run_shift(
            &mut queue,
            &mut ledger,
            &mut policy,
            &ShiftConfig {
                scram_on_exit: false,
            },
            |record| records.push(record.clone()),
        );

        assert_eq!(outcome.decisions, 2);
        assert_eq!(records[0].applied, Action::Save);
        assert_eq!(records[1].suggested, Action::Save);
        assert_eq!(records[1].applied, Action::Skip);
        assert_eq!(ledger.passengers(), 1);
        // 30 for the save, 15 for the downgraded skip.
        assert_eq!(ledger.remaining_time(), 1000 - 30 - 15);
    }

    #[test]
    fn substitutes_skip_when_policy_is_unavailable() {
        let mut queue = EntityQueue::load(entities(&[State::Injured]), 4).expect("load");
        let mut ledger = Ledger::new(1000, 5);
        let mut policy = ScriptedPolicy::new(vec![ScriptedSuggestion::Unavailable(
            "backend down".to_string(),
        )]);

        let mut records = Vec::new();
        let outcome = run_shift(
            &mut queue,
            &mut ledger,
            &mut policy,
            &ShiftConfig::default(),
            |record| records.push(record.clone()),
        );

        assert_eq!(outcome.stop, StopReason::QueueExhausted);
        assert_eq!(records[0].applied, Action::Skip);
        // Skipping the injured still counts as a kill.
        assert_eq!(ledger.killed(), 1);
    }

    #[test]
    fn final_scram_settles_passengers_when_enabled() {
        let mut queue = EntityQueue::load(entities(&[State::Healthy]), 0).expect("load");
        let mut ledger = Ledger::new(1000, 5);
        let mut policy = ScriptedPolicy::always(Action::Save);

        let outcome = run_shift(&mut queue, &mut ledger, &mut policy, &ShiftConfig::default(), |_| {});

        assert!(outcome.final_scram);
        assert_eq!(ledger.saved(), 1);
        assert_eq!(ledger.passengers(), 0);
        assert_eq!(ledger.remaining_time(), 1000 - 30 - 120);
    }

    #[test]
    fn final_scram_can_be_disabled() {
        let mut queue = EntityQueue::load(entities(&[State::Healthy]), 0).expect("load");
        let mut ledger = Ledger::new(1000, 5);
        let mut policy = ScriptedPolicy::always(Action::Save);

        let outcome = run_shift(
            &mut queue,
            &mut ledger,
            &mut policy,
            &ShiftConfig {
                scram_on_exit: false,
            },
            |_| {},
        );

        assert!(!outcome.final_scram);
        assert_eq!(ledger.saved(), 0);
        assert_eq!(ledger.passengers(), 1);
    }

    #[test]
    fn telemetry_reward_tracks_ledger_at_every_step() {
        let mut queue = EntityQueue::load(
            entities(&[State::Injured, State::Injured, State::Injured]),
            6,
        )
        .expect("load");
        let mut ledger = Ledger::new(1000, 5);
        let mut policy = ScriptedPolicy::always(Action::Skip);

        let mut records = Vec::new();
        run_shift(
            &mut queue,
            &mut ledger,
            &mut policy,
            &ShiftConfig::default(),
            |record| records.push(record.clone()),
        );

        let rewards: Vec<i64> = records.iter().map(|r| r.reward).collect();
        assert_eq!(rewards, vec![-1, -2, -3]);
        for record in &records {
            assert_eq!(
                record.reward,
                i64::from(record.saved) - i64::from(record.killed)
            );
        }
    }
}
