use crate::core::candidates::CandidateSets;
use crate::core::recording::{current_year, record_history};
use crate::core::solver::{check_roster, solve, SolveOptions};
use crate::core::{HistoryStore, RosterSource};
use crate::domain::model::{GroupId, HistoryEntry, Pair, Participant, Roster};
use crate::utils::error::{Result, SantaError};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default)]
pub struct AssignRequest {
    /// Defaults to the current calendar year.
    pub year: Option<i32>,
    pub seed: Option<u64>,
    /// Solve without touching the history store.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentOutcome {
    pub group: GroupId,
    pub year: i32,
    pub seed: u64,
    pub cycle: Vec<Participant>,
    pub pairs: Vec<Pair>,
    pub recorded: usize,
}

/// Loads a roster, folds in past assignments, solves and records the result.
///
/// Solves for the same group are serialized; different groups run
/// independently.
pub struct AssignmentEngine<R: RosterSource, H: HistoryStore> {
    roster_source: R,
    history: H,
    group_locks: StdMutex<HashMap<GroupId, Arc<Mutex<()>>>>,
}

impl<R: RosterSource, H: HistoryStore> AssignmentEngine<R, H> {
    pub fn new(roster_source: R, history: H) -> Self {
        Self {
            roster_source,
            history,
            group_locks: StdMutex::new(HashMap::new()),
        }
    }

    pub fn history_store(&self) -> &H {
        &self.history
    }

    fn group_lock(&self, group: &GroupId) -> Result<Arc<Mutex<()>>> {
        let mut locks = self.group_locks.lock().map_err(|_| SantaError::StorageError {
            message: "group lock registry poisoned".to_string(),
        })?;
        Ok(locks.entry(group.clone()).or_default().clone())
    }

    /// Hand back a lock taken with `group_lock`; the entry is dropped once no
    /// other solve for the group holds or waits on it.
    fn release_group_lock(&self, group: &GroupId, lock: Arc<Mutex<()>>) {
        let Ok(mut locks) = self.group_locks.lock() else {
            return;
        };
        drop(lock);
        if locks.get(group).is_some_and(|held| Arc::strong_count(held) == 1) {
            locks.remove(group);
        }
    }

    /// Roster with every recorded recipient, from any year, added to each
    /// giver's exclusions.
    pub async fn load_constrained_roster(&self, group: &GroupId) -> Result<Roster> {
        let mut roster = self.roster_source.load_roster(group).await?;
        let past = self.history.records(group, None).await?;

        for entry in &mut roster.entries {
            entry.excluded.extend(
                past.iter()
                    .filter(|record| record.giver == entry.participant.id)
                    .map(|record| record.receiver.clone()),
            );
        }

        tracing::debug!(group = %group, past_records = past.len(), "applied assignment history");
        Ok(roster)
    }

    pub async fn assign(&self, group: &GroupId, request: AssignRequest) -> Result<AssignmentOutcome> {
        let lock = self.group_lock(group)?;
        let outcome = {
            let _guard = lock.lock().await;
            self.assign_locked(group, request).await
        };
        self.release_group_lock(group, lock);
        outcome
    }

    async fn assign_locked(&self, group: &GroupId, request: AssignRequest) -> Result<AssignmentOutcome> {
        let year = request.year.unwrap_or_else(current_year);
        tracing::info!(group = %group, year, dry_run = request.dry_run, "starting assignment");

        let roster = self.load_constrained_roster(group).await?;
        tracing::info!("Loaded {} participants", roster.len());

        let result = solve(&roster, &SolveOptions { seed: request.seed })?;
        tracing::info!(seed = result.seed, "found cycle of {} participants", result.cycle.len());

        let recorded = if request.dry_run {
            tracing::info!("dry run, history left untouched");
            0
        } else {
            record_history(&self.history, &result.cycle, group, year).await?
        };

        Ok(AssignmentOutcome {
            group: result.group,
            year,
            seed: result.seed,
            cycle: result.cycle,
            pairs: result.pairs,
            recorded,
        })
    }

    /// Candidate sets as the next solve would see them.
    pub async fn candidates(&self, group: &GroupId) -> Result<Vec<(Participant, Vec<Participant>)>> {
        let roster = self.load_constrained_roster(group).await?;
        check_roster(&roster)?;
        let sets = CandidateSets::build(&roster)?;
        Ok(sets
            .iter()
            .map(|(giver, receivers)| (giver.clone(), receivers.into_iter().cloned().collect()))
            .collect())
    }

    /// Recorded assignments with names resolved; records for people no longer
    /// on the roster are skipped.
    pub async fn history(&self, group: &GroupId, year: Option<i32>) -> Result<Vec<HistoryEntry>> {
        let roster = self.roster_source.load_roster(group).await?;
        let mut records = self.history.records(group, year).await?;
        records.sort_by(|a, b| a.year.cmp(&b.year).then(a.created_at.cmp(&b.created_at)));

        Ok(records
            .into_iter()
            .filter_map(|record| {
                let giver = roster.participant(&record.giver)?;
                let receiver = roster.participant(&record.receiver)?;
                Some(HistoryEntry {
                    giver_name: giver.name.clone(),
                    receiver_name: receiver.name.clone(),
                    year: record.year,
                })
            })
            .collect())
    }
}
