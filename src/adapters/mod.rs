// Adapters layer: concrete roster sources and history stores behind the domain ports.

pub mod file;
pub mod memory;

pub use file::{FileRosterSource, JsonHistoryStore};
pub use memory::{MemoryHistoryStore, MemoryRosterSource};
