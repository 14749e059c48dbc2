//! Application services - Use case implementations

pub mod bill_formatter;
mod subject_locks;
mod transition_engine;

pub use subject_locks::{SubjectGuard, SubjectLocks};
pub use transition_engine::{EngineConfig, Outcome, TransitionEngine, UNAVAILABLE_LABEL};
