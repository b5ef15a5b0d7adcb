//! Scored rescue-vs-triage decision game.
//!
//! An agent inspects a sequence of humanoid entities, each in one of four
//! hidden states, and chooses one of four costed actions under a depleting
//! time budget. Saving a zombie into the ambulance is latent: it kills the
//! whole load at the next return to base. The architecture enforces a strict
//! separation:
//!
//! - **[`core`]**: Pure, deterministic logic (ledger, entity queue, types).
//!   No I/O, fully testable in isolation.
//! - **[`policy`]**: Interchangeable decision backends behind one trait
//!   (rule-based baseline, LLM adapter over a chat transport seam).
//! - **[`io`]**: Side-effecting operations (dataset files, config, run logs).
//! - **[`driver`]**: The shift loop coordinating core, policy, and telemetry.

pub mod core;
pub mod driver;
pub mod io;
pub mod logging;
pub mod policy;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
