//! Side-effecting operations: dataset loading, configuration files, and
//! persisted run artifacts. Kept apart from `core` so the game logic stays
//! testable without a filesystem.

pub mod config;
pub mod dataset;
pub mod run_log;
