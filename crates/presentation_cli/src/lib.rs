//! Tollgate command-line interface
//!
//! Local administration of zone data, fares and trips, plus a replay of
//! recorded samples through the transition engine.

pub mod backup;
pub mod cli;
pub mod commands;
pub mod replay;

pub use cli::{Cli, Commands, ZonesCommand};
pub use replay::{ReplaySummary, replay_samples};
