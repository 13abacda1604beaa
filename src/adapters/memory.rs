use crate::domain::model::{AssignmentRecord, GroupId, Roster};
use crate::domain::ports::{HistoryStore, RosterSource};
use crate::utils::error::{Result, SantaError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default)]
pub struct MemoryRosterSource {
    rosters: Arc<Mutex<HashMap<GroupId, Roster>>>,
}

impl MemoryRosterSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roster(roster: Roster) -> Self {
        let mut rosters = HashMap::new();
        rosters.insert(roster.group.clone(), roster);
        Self {
            rosters: Arc::new(Mutex::new(rosters)),
        }
    }
}

impl RosterSource for MemoryRosterSource {
    async fn load_roster(&self, group: &GroupId) -> Result<Roster> {
        let rosters = self.rosters.lock().await;
        rosters
            .get(group)
            .cloned()
            .ok_or_else(|| SantaError::GroupNotFound {
                group: group.to_string(),
            })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryStore {
    records: Arc<Mutex<Vec<AssignmentRecord>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<AssignmentRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn contains(&self, record: &AssignmentRecord) -> Result<bool> {
        let records = self.records.lock().await;
        Ok(records.iter().any(|existing| existing.same_edge(record)))
    }

    async fn commit(&self, batch: Vec<AssignmentRecord>) -> Result<usize> {
        // Holding the lock for the whole batch keeps it all-or-nothing.
        let mut records = self.records.lock().await;
        let mut inserted = 0;
        for record in batch {
            if records.iter().any(|existing| existing.same_edge(&record)) {
                continue;
            }
            records.push(record);
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn records(&self, group: &GroupId, year: Option<i32>) -> Result<Vec<AssignmentRecord>> {
        let records = self.records.lock().await;
        Ok(records
            .iter()
            .filter(|record| &record.group == group)
            .filter(|record| year.map_or(true, |year| record.year == year))
            .cloned()
            .collect())
    }
}
