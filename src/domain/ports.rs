use crate::domain::model::{AssignmentRecord, GroupId, Roster};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait RosterSource: Send + Sync {
    fn load_roster(
        &self,
        group: &GroupId,
    ) -> impl std::future::Future<Output = Result<Roster>> + Send;
}

/// Append-only assignment history.
///
/// `commit` must apply a batch all-or-nothing and skip records whose
/// `(giver, receiver, group, year)` already exists.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn contains(&self, record: &AssignmentRecord) -> Result<bool>;
    async fn commit(&self, records: Vec<AssignmentRecord>) -> Result<usize>;
    async fn records(&self, group: &GroupId, year: Option<i32>) -> Result<Vec<AssignmentRecord>>;
}

pub trait ConfigProvider: Send + Sync {
    fn roster_path(&self) -> &Path;
    fn history_path(&self) -> Option<&Path>;
    fn seed(&self) -> Option<u64>;
    fn year(&self) -> Option<i32>;
}
