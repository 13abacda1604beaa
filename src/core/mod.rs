pub mod candidates;
pub mod engine;
pub mod recording;
pub mod search;
pub mod solver;

pub use crate::domain::model::{AssignmentRecord, GroupId, Pair, Participant, Roster, RosterEntry};
pub use crate::domain::ports::{ConfigProvider, HistoryStore, RosterSource};
pub use crate::utils::error::Result;
