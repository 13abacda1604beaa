use anyhow::Result;
use santa_cycle::core::HistoryStore;
use santa_cycle::{
    AssignRequest, AssignmentEngine, FileRosterSource, GroupId, JsonHistoryStore,
    MemoryHistoryStore, MemoryRosterSource, Participant, ParticipantId, Roster, RosterEntry,
    SantaError,
};
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;

const FAMILY_ROSTER: &str = r#"
group = "family"

[[participants]]
name = "Alice"
email = "alice@example.com"

[[participants]]
name = "Bob"
email = "bob@example.com"

[[participants]]
name = "Carol"
email = "carol@example.com"

[[participants]]
name = "Dave"
email = "dave@example.com"
allowed = ["Alice", "Bob"]
"#;

#[tokio::test]
async fn test_end_to_end_with_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let roster_path = temp_dir.path().join("family.toml");
    let history_path = temp_dir.path().join("history").join("family.json");
    tokio::fs::write(&roster_path, FAMILY_ROSTER).await?;

    let group = GroupId::new("family");
    let engine = AssignmentEngine::new(
        FileRosterSource::new(&roster_path),
        JsonHistoryStore::new(&history_path),
    );

    let outcome = engine
        .assign(
            &group,
            AssignRequest {
                year: Some(2024),
                seed: Some(9),
                dry_run: false,
            },
        )
        .await?;

    assert_eq!(outcome.year, 2024);
    assert_eq!(outcome.recorded, 4);
    let dave = outcome
        .pairs
        .iter()
        .find(|pair| pair.giver.name == "Dave")
        .unwrap();
    assert!(["Alice", "Bob"].contains(&dave.receiver.name.as_str()));
    assert!(history_path.exists());

    // A fresh store over the same file sees what was written.
    let reopened = JsonHistoryStore::new(&history_path);
    assert_eq!(reopened.records(&group, Some(2024)).await?.len(), 4);

    let history = engine.history(&group, Some(2024)).await?;
    assert_eq!(history.len(), 4);
    assert!(history.iter().all(|entry| entry.year == 2024));
    Ok(())
}

#[tokio::test]
async fn test_following_year_avoids_previous_recipients() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let roster_path = temp_dir.path().join("family.toml");
    let history_path = temp_dir.path().join("family.json");
    tokio::fs::write(&roster_path, FAMILY_ROSTER.replace("allowed = [\"Alice\", \"Bob\"]", "")).await?;

    let group = GroupId::new("family");
    let engine = AssignmentEngine::new(
        FileRosterSource::new(&roster_path),
        JsonHistoryStore::new(&history_path),
    );

    let first = engine
        .assign(&group, AssignRequest { year: Some(2023), seed: Some(1), dry_run: false })
        .await?;
    let second = engine
        .assign(&group, AssignRequest { year: Some(2024), seed: Some(1), dry_run: false })
        .await?;

    let first_edges: HashSet<(String, String)> = first
        .pairs
        .iter()
        .map(|p| (p.giver.name.clone(), p.receiver.name.clone()))
        .collect();
    for pair in &second.pairs {
        assert!(!first_edges.contains(&(pair.giver.name.clone(), pair.receiver.name.clone())));
    }

    assert_eq!(engine.history(&group, None).await?.len(), 8);
    Ok(())
}

#[tokio::test]
async fn test_exhausted_history_reports_starved_participant() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let roster_path = temp_dir.path().join("trio.csv");
    let history_path = temp_dir.path().join("trio.json");
    tokio::fs::write(
        &roster_path,
        "id,name,email,allowed,excluded\n\
         a,Ann,ann@example.com,,\n\
         b,Ben,ben@example.com,,\n\
         c,Cat,cat@example.com,,\n",
    )
    .await?;

    let group = GroupId::new("trio");
    let engine = AssignmentEngine::new(
        FileRosterSource::new(&roster_path),
        JsonHistoryStore::new(&history_path),
    );

    // Three people only have two possible cycles; a third year cannot be drawn.
    engine
        .assign(&group, AssignRequest { year: Some(2022), seed: Some(0), dry_run: false })
        .await?;
    engine
        .assign(&group, AssignRequest { year: Some(2023), seed: Some(0), dry_run: false })
        .await?;

    let before = tokio::fs::read(&history_path).await?;
    let err = engine
        .assign(&group, AssignRequest { year: Some(2024), seed: Some(0), dry_run: false })
        .await
        .unwrap_err();
    assert!(matches!(err, SantaError::NoFeasibleOptions { .. }));

    let after = tokio::fs::read(&history_path).await?;
    assert_eq!(before, after, "failed solve must not touch history");
    Ok(())
}

#[tokio::test]
async fn test_concurrent_solves_for_one_group_record_consistent_history() -> Result<()> {
    let group = GroupId::new("office");
    let entries = ["Ann", "Ben", "Cat", "Dan", "Eve", "Fay"]
        .iter()
        .map(|name| {
            RosterEntry::new(Participant {
                id: ParticipantId::new(*name),
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                group: group.clone(),
            })
        })
        .collect();
    let engine = Arc::new(AssignmentEngine::new(
        MemoryRosterSource::with_roster(Roster::new(group.clone(), entries)),
        MemoryHistoryStore::new(),
    ));

    let mut handles = Vec::new();
    for seed in 0..2u64 {
        let engine = Arc::clone(&engine);
        let group = group.clone();
        handles.push(tokio::spawn(async move {
            engine
                .assign(&group, AssignRequest { year: Some(2024), seed: Some(seed), dry_run: false })
                .await
        }));
    }

    let mut recorded = 0;
    for handle in handles {
        recorded += handle.await??.recorded;
    }

    // Serialized solves: the second one already sees the first one's edges as exclusions.
    let stored = engine.history_store().records(&group, Some(2024)).await?;
    assert_eq!(stored.len(), recorded);
    assert_eq!(stored.len(), 12);
    Ok(())
}

#[tokio::test]
async fn test_unknown_group_is_an_error() {
    let engine = AssignmentEngine::new(MemoryRosterSource::new(), MemoryHistoryStore::new());
    let err = engine
        .assign(&GroupId::new("missing"), AssignRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SantaError::GroupNotFound { .. }));
}
