use crate::domain::model::{AssignmentRecord, GroupId, Pair, Participant};
use crate::domain::ports::HistoryStore;
use crate::utils::error::Result;
use chrono::{Datelike, Local};

pub fn current_year() -> i32 {
    Local::now().year()
}

/// Each participant gives to their successor; the last gives to the first.
pub fn project_pairs(cycle: &[Participant]) -> Vec<Pair> {
    let size = cycle.len();
    (0..size)
        .map(|i| Pair {
            giver: cycle[i].clone(),
            receiver: cycle[(i + 1) % size].clone(),
        })
        .collect()
}

pub fn to_records(cycle: &[Participant], group: &GroupId, year: i32) -> Vec<AssignmentRecord> {
    project_pairs(cycle)
        .into_iter()
        .map(|pair| AssignmentRecord::new(pair.giver.id, pair.receiver.id, group.clone(), year))
        .collect()
}

/// Persist every edge of `cycle` for `year`, skipping edges already on record.
///
/// The missing edges go to the store as one batch. Returns how many records
/// were actually inserted.
pub async fn record_history<H>(
    store: &H,
    cycle: &[Participant],
    group: &GroupId,
    year: i32,
) -> Result<usize>
where
    H: HistoryStore + ?Sized,
{
    let mut pending = Vec::new();
    for record in to_records(cycle, group, year) {
        if store.contains(&record).await? {
            tracing::debug!(giver = %record.giver, receiver = %record.receiver, year, "already recorded");
            continue;
        }
        pending.push(record);
    }

    if pending.is_empty() {
        return Ok(0);
    }

    let inserted = store.commit(pending).await?;
    tracing::info!(group = %group, year, inserted, "recorded assignment history");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryHistoryStore;
    use crate::domain::model::ParticipantId;

    fn participant(name: &str) -> Participant {
        Participant {
            id: ParticipantId::new(name),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            group: GroupId::new("family"),
        }
    }

    fn cycle(names: &[&str]) -> Vec<Participant> {
        names.iter().map(|name| participant(name)).collect()
    }

    #[test]
    fn test_projection_wraps_around() {
        let pairs = project_pairs(&cycle(&["A", "B", "C"]));
        let edges: Vec<(String, String)> = pairs
            .iter()
            .map(|pair| (pair.giver.name.clone(), pair.receiver.name.clone()))
            .collect();

        assert_eq!(
            edges,
            vec![
                ("A".to_string(), "B".to_string()),
                ("B".to_string(), "C".to_string()),
                ("C".to_string(), "A".to_string()),
            ]
        );
    }

    #[test]
    fn test_projection_of_empty_cycle_is_empty() {
        assert!(project_pairs(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_recording_twice_is_idempotent() {
        let store = MemoryHistoryStore::new();
        let group = GroupId::new("family");
        let cycle = cycle(&["A", "B", "C", "D"]);

        assert_eq!(record_history(&store, &cycle, &group, 2024).await.unwrap(), 4);
        assert_eq!(record_history(&store, &cycle, &group, 2024).await.unwrap(), 0);
        assert_eq!(store.records(&group, Some(2024)).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_dedup_is_per_edge() {
        let store = MemoryHistoryStore::new();
        let group = GroupId::new("family");

        record_history(&store, &cycle(&["A", "B", "C", "D"]), &group, 2024)
            .await
            .unwrap();
        // Shares A -> B and B -> C with the first cycle.
        let inserted = record_history(&store, &cycle(&["A", "B", "C"]), &group, 2024)
            .await
            .unwrap();

        assert_eq!(inserted, 1);
        assert_eq!(store.records(&group, Some(2024)).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_years_are_kept_apart() {
        let store = MemoryHistoryStore::new();
        let group = GroupId::new("family");
        let cycle = cycle(&["A", "B"]);

        record_history(&store, &cycle, &group, 2023).await.unwrap();
        record_history(&store, &cycle, &group, 2024).await.unwrap();

        assert_eq!(store.records(&group, None).await.unwrap().len(), 4);
        assert_eq!(store.records(&group, Some(2023)).await.unwrap().len(), 2);
    }
}
