use crate::domain::model::{
    AssignmentRecord, GroupId, Participant, ParticipantId, Roster, RosterEntry,
};
use crate::domain::ports::{HistoryStore, RosterSource};
use crate::utils::error::{Result, SantaError};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;

pub const ROSTER_EXTENSIONS: [&str; 2] = ["toml", "csv"];

#[derive(Debug, Deserialize)]
struct RosterFile {
    group: String,
    participants: Vec<ParticipantRow>,
}

#[derive(Debug, Deserialize)]
struct ParticipantRow {
    #[serde(default)]
    id: Option<String>,
    name: String,
    email: String,
    #[serde(default)]
    allowed: Vec<String>,
    #[serde(default)]
    excluded: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    id: Option<String>,
    name: String,
    email: String,
    #[serde(default)]
    allowed: Option<String>,
    #[serde(default)]
    excluded: Option<String>,
}

impl From<CsvRow> for ParticipantRow {
    fn from(row: CsvRow) -> Self {
        Self {
            id: row.id.filter(|id| !id.trim().is_empty()),
            name: row.name,
            email: row.email,
            allowed: split_list(row.allowed.as_deref()),
            excluded: split_list(row.excluded.as_deref()),
        }
    }
}

fn split_list(cell: Option<&str>) -> Vec<String> {
    cell.unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// `allowed` and `excluded` may name people by id or by display name; an id
/// wins over a name, and roster validation rejects rosters where the two clash.
/// Unknown references are kept verbatim so roster validation can report them.
fn build_roster(group: &str, rows: Vec<ParticipantRow>) -> Roster {
    let group = GroupId::new(group.trim());
    let ids: Vec<String> = rows
        .iter()
        .map(|row| row.id.clone().unwrap_or_else(|| row.name.clone()))
        .collect();

    let mut lookup: HashMap<&str, &str> = HashMap::new();
    for (row, id) in rows.iter().zip(&ids) {
        lookup.insert(row.name.as_str(), id.as_str());
    }
    for id in &ids {
        lookup.insert(id.as_str(), id.as_str());
    }
    let resolve = |reference: &String| {
        ParticipantId::new(lookup.get(reference.as_str()).copied().unwrap_or(reference.as_str()))
    };

    let entries = rows
        .iter()
        .zip(&ids)
        .map(|(row, id)| RosterEntry {
            participant: Participant {
                id: ParticipantId::new(id.clone()),
                name: row.name.clone(),
                email: row.email.clone(),
                group: group.clone(),
            },
            allowed: row.allowed.iter().map(&resolve).collect(),
            excluded: row.excluded.iter().map(&resolve).collect(),
        })
        .collect();

    Roster::new(group, entries)
}

pub fn parse_toml_roster(content: &str) -> Result<Roster> {
    let file: RosterFile = toml::from_str(content)?;
    Ok(build_roster(&file.group, file.participants))
}

/// CSV rosters carry no group column; the caller names the group.
pub fn parse_csv_roster(group: &str, content: &str) -> Result<Roster> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        rows.push(ParticipantRow::from(row?));
    }
    Ok(build_roster(group, rows))
}

/// A roster kept in a single `.toml` or `.csv` file, one group per file.
#[derive(Debug, Clone)]
pub struct FileRosterSource {
    path: PathBuf,
}

impl FileRosterSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn read(&self) -> Result<Roster> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => parse_toml_roster(&content),
            Some("csv") => {
                let group = self
                    .path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or("default");
                parse_csv_roster(group, &content)
            }
            _ => Err(SantaError::InvalidConfigValueError {
                field: "roster.path".to_string(),
                value: self.path.display().to_string(),
                reason: format!("Roster files must be one of: {}", ROSTER_EXTENSIONS.join(", ")),
            }),
        }
    }
}

impl RosterSource for FileRosterSource {
    async fn load_roster(&self, group: &GroupId) -> Result<Roster> {
        let roster = self.read().await?;
        if &roster.group != group {
            return Err(SantaError::GroupNotFound {
                group: group.to_string(),
            });
        }
        tracing::debug!(path = %self.path.display(), participants = roster.len(), "loaded roster");
        Ok(roster)
    }
}

/// History kept as a JSON array of records.
///
/// Each commit rewrites the whole file through a sibling temp file and a
/// rename, so a batch either lands completely or not at all.
#[derive(Debug)]
pub struct JsonHistoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<Vec<AssignmentRecord>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, records: &[AssignmentRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let data = serde_json::to_vec_pretty(records)?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, data).await?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| SantaError::StorageError {
                message: format!("failed to replace {}: {}", self.path.display(), e),
            })
    }
}

#[async_trait]
impl HistoryStore for JsonHistoryStore {
    async fn contains(&self, record: &AssignmentRecord) -> Result<bool> {
        let records = self.read_all().await?;
        Ok(records.iter().any(|existing| existing.same_edge(record)))
    }

    async fn commit(&self, batch: Vec<AssignmentRecord>) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_all().await?;
        let before = records.len();

        for record in batch {
            if !records.iter().any(|existing| existing.same_edge(&record)) {
                records.push(record);
            }
        }

        let inserted = records.len() - before;
        if inserted > 0 {
            self.write_all(&records).await?;
        }
        Ok(inserted)
    }

    async fn records(&self, group: &GroupId, year: Option<i32>) -> Result<Vec<AssignmentRecord>> {
        Ok(self
            .read_all()
            .await?
            .into_iter()
            .filter(|record| &record.group == group)
            .filter(|record| year.map_or(true, |year| record.year == year))
            .collect())
    }
}
