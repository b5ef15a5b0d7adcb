//! Draw-without-replacement pool of humanoid entities.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::core::types::{DataLoadError, Entity};

/// Every entity has been drawn. Clean termination for the run loop, not a
/// crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("entity queue exhausted")]
pub struct EmptyQueueError;

/// Holds the shift's entities and tracks which ones have been visited.
///
/// Draws are uniform over the unvisited pool and deterministic for a given
/// seed, which keeps whole runs reproducible.
#[derive(Debug, Clone)]
pub struct EntityQueue {
    entities: Vec<Entity>,
    unvisited: Vec<usize>,
    rng: StdRng,
}

impl EntityQueue {
    /// Populate the pool. An empty dataset is a [`DataLoadError`].
    pub fn load(entities: Vec<Entity>, seed: u64) -> Result<Self, DataLoadError> {
        if entities.is_empty() {
            return Err(DataLoadError::new("dataset contains no entities"));
        }
        let unvisited = (0..entities.len()).collect();
        Ok(Self {
            entities,
            unvisited,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Remove and return one unvisited entity uniformly at random.
    pub fn draw_random(&mut self) -> Result<Entity, EmptyQueueError> {
        if self.unvisited.is_empty() {
            return Err(EmptyQueueError);
        }
        let pick = self.rng.gen_range(0..self.unvisited.len());
        let index = self.unvisited.swap_remove(pick);
        Ok(self.entities[index].clone())
    }

    /// Return all entities to the unvisited pool. Identities are untouched;
    /// used between repeated evaluation runs.
    pub fn reset(&mut self) {
        self.unvisited = (0..self.entities.len()).collect();
    }

    pub fn remaining_count(&self) -> usize {
        self.unvisited.len()
    }

    pub fn total_count(&self) -> usize {
        self.entities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::State;

    fn pool() -> Vec<Entity> {
        vec![
            Entity::new(State::Healthy),
            Entity::new(State::Injured),
            Entity::new(State::Corpse),
            Entity::new(State::Zombie),
        ]
    }

    #[test]
    fn load_rejects_empty_dataset() {
        let err = EntityQueue::load(Vec::new(), 1).expect_err("empty");
        assert!(err.reason.contains("no entities"));
    }

    #[test]
    fn draw_removes_until_exhausted() {
        let mut queue = EntityQueue::load(pool(), 7).expect("load");
        assert_eq!(queue.remaining_count(), 4);
        for remaining in (0..4).rev() {
            queue.draw_random().expect("draw");
            assert_eq!(queue.remaining_count(), remaining);
        }
        queue.draw_random().expect_err("exhausted");
    }

    #[test]
    fn same_seed_draws_same_order() {
        let mut a = EntityQueue::load(pool(), 42).expect("load");
        let mut b = EntityQueue::load(pool(), 42).expect("load");
        for _ in 0..4 {
            assert_eq!(a.draw_random().expect("a"), b.draw_random().expect("b"));
        }
    }

    #[test]
    fn reset_restores_the_full_pool() {
        let mut queue = EntityQueue::load(pool(), 3).expect("load");
        queue.draw_random().expect("draw");
        queue.draw_random().expect("draw");
        queue.reset();
        assert_eq!(queue.remaining_count(), queue.total_count());

        // Every original entity is drawable again exactly once.
        let mut states = Vec::new();
        while let Ok(entity) = queue.draw_random() {
            states.push(entity.state);
        }
        assert_eq!(states.len(), 4);
        for state in [State::Healthy, State::Injured, State::Corpse, State::Zombie] {
            assert_eq!(states.iter().filter(|s| **s == state).count(), 1);
        }
    }
}
