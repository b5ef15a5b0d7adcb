//! Resource and outcome bookkeeping for a single rescue shift.
//!
//! The [`Ledger`] is a total state-transition function over well-formed
//! inputs: apart from the explicit capacity check on [`Ledger::save`], the
//! four action applications never reject a game state. In particular
//! `remaining_time` is allowed to go negative; deciding when to stop looping
//! is the driver's job, not the ledger's.

use serde::Serialize;
use thiserror::Error;

use crate::core::types::{Action, Entity, State};

/// A save was attempted while the ambulance was already full.
///
/// The ledger never produces this from its own transitions; it signals that a
/// decision policy violated its contract. Callers recover by downgrading to a
/// skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("ambulance at capacity ({capacity})")]
pub struct CapacityExceededError {
    pub capacity: usize,
}

/// Score aggregate, computable at any point mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
    pub saved: u32,
    pub killed: u32,
    /// Minutes consumed so far. May exceed the shift length when the final
    /// action overshoots the clock.
    pub time_used: i32,
}

/// Read-only ledger state exposed to decision policies and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerView {
    pub remaining_time: i32,
    pub capacity: usize,
    pub passengers: usize,
}

impl LedgerView {
    pub fn at_capacity(&self) -> bool {
        self.passengers >= self.capacity
    }

    pub fn free_slots(&self) -> usize {
        self.capacity.saturating_sub(self.passengers)
    }
}

/// Scorekeeper for one shift: remaining time, ambulance contents, and the
/// cumulative save/kill counters.
///
/// Mutated exclusively by the four action applications. A new run gets a new
/// ledger; there is no cross-run state.
#[derive(Debug, Clone)]
pub struct Ledger {
    shift_length: i32,
    remaining_time: i32,
    capacity: usize,
    contents: Vec<Entity>,
    saved: u32,
    killed: u32,
}

impl Ledger {
    pub fn new(shift_length: i32, capacity: usize) -> Self {
        Self {
            shift_length,
            remaining_time: shift_length,
            capacity,
            contents: Vec::with_capacity(capacity),
            saved: 0,
            killed: 0,
        }
    }

    /// Load `entity` into the ambulance (30 minutes).
    ///
    /// A saved zombie is latent: no counter moves here. The cascade fires
    /// only at the next [`Ledger::scram`], and it takes the whole load with
    /// it.
    pub fn save(&mut self, entity: Entity) -> Result<(), CapacityExceededError> {
        if self.contents.len() >= self.capacity {
            return Err(CapacityExceededError {
                capacity: self.capacity,
            });
        }
        self.contents.push(entity);
        self.remaining_time -= Action::Save.cost();
        Ok(())
    }

    /// Put the humanoid down (5 minutes). Killing a healthy or injured
    /// person is scored as a kill; a corpse is already dead and a zombie is
    /// a neutralized threat, neither counts.
    pub fn squish(&mut self, entity: &Entity) {
        self.remaining_time -= Action::Squish.cost();
        if matches!(entity.state, State::Healthy | State::Injured) {
            self.killed += 1;
        }
    }

    /// Leave the humanoid behind (15 minutes). An injured person left behind
    /// dies.
    pub fn skip(&mut self, entity: &Entity) {
        self.remaining_time -= Action::Skip.cost();
        if entity.state == State::Injured {
            self.killed += 1;
        }
    }

    /// Return to base and unload (120 minutes).
    ///
    /// The batch is settled atomically: one zombie aboard reclassifies every
    /// passenger as killed, otherwise every passenger counts as saved. The
    /// ambulance is empty afterwards in both cases.
    pub fn scram(&mut self) {
        self.remaining_time -= Action::Scram.cost();
        let load = self.contents.len() as u32;
        if self.contents.iter().any(|e| e.state == State::Zombie) {
            self.killed += load;
        } else {
            self.saved += load;
        }
        self.contents.clear();
    }

    pub fn at_capacity(&self) -> bool {
        self.contents.len() >= self.capacity
    }

    pub fn remaining_time(&self) -> i32 {
        self.remaining_time
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contents(&self) -> &[Entity] {
        &self.contents
    }

    pub fn passengers(&self) -> usize {
        self.contents.len()
    }

    pub fn saved(&self) -> u32 {
        self.saved
    }

    pub fn killed(&self) -> u32 {
        self.killed
    }

    /// `saved - killed`, valid at every intermediate state.
    pub fn cumulative_reward(&self) -> i64 {
        i64::from(self.saved) - i64::from(self.killed)
    }

    pub fn score(&self) -> ScoreSummary {
        ScoreSummary {
            saved: self.saved,
            killed: self.killed,
            time_used: self.shift_length - self.remaining_time,
        }
    }

    pub fn view(&self) -> LedgerView {
        LedgerView {
            remaining_time: self.remaining_time,
            capacity: self.capacity,
            passengers: self.contents.len(),
        }
    }
}
