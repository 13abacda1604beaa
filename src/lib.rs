//! Draws a single gift-giving cycle for a group: everyone gives to exactly one
//! other member and the assignments form one loop through the whole group.
//! Per-giver allow-lists and recipients from earlier years constrain the draw.

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;
pub use config::{RunConfig, SantaConfig};

pub use adapters::{FileRosterSource, JsonHistoryStore, MemoryHistoryStore, MemoryRosterSource};
pub use crate::core::engine::{AssignRequest, AssignmentEngine, AssignmentOutcome};
pub use crate::core::solver::{check_roster, solve, CycleResult, SolveOptions};
pub use domain::model::{
    AssignmentRecord, GroupId, HistoryEntry, Pair, Participant, ParticipantId, Roster, RosterEntry,
};
pub use utils::error::{Result, SantaError};
