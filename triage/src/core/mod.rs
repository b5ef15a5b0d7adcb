//! Pure, deterministic game logic: entities, the scorekeeping ledger, and
//! the entity queue. No I/O lives here.

pub mod ledger;
pub mod queue;
pub mod types;
