use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub email: String,
    pub group: GroupId,
}

/// A participant together with the constraints on who they may give to.
///
/// An empty `allowed` set means "anyone else in the group". `excluded` only
/// ever removes candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub participant: Participant,
    pub allowed: BTreeSet<ParticipantId>,
    pub excluded: BTreeSet<ParticipantId>,
}

impl RosterEntry {
    pub fn new(participant: Participant) -> Self {
        Self {
            participant,
            allowed: BTreeSet::new(),
            excluded: BTreeSet::new(),
        }
    }

    pub fn allow<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed
            .extend(ids.into_iter().map(|id| ParticipantId::new(id)));
        self
    }

    pub fn exclude<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded
            .extend(ids.into_iter().map(|id| ParticipantId::new(id)));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    pub group: GroupId,
    pub entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new(group: GroupId, entries: Vec<RosterEntry>) -> Self {
        Self { group, entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.entries.iter().map(|entry| &entry.participant)
    }

    pub fn position(&self, id: &ParticipantId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| &entry.participant.id == id)
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants().find(|p| &p.id == id)
    }
}

/// One giver -> receiver edge of a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub giver: Participant,
    pub receiver: Participant,
}

/// Persisted fact that `giver` was assigned `receiver` in `group` for `year`.
///
/// Identity is `(giver, receiver, group, year)`; `created_at` is informational.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub giver: ParticipantId,
    pub receiver: ParticipantId,
    pub group: GroupId,
    pub year: i32,
    pub created_at: DateTime<Utc>,
}

impl AssignmentRecord {
    pub fn new(giver: ParticipantId, receiver: ParticipantId, group: GroupId, year: i32) -> Self {
        Self {
            giver,
            receiver,
            group,
            year,
            created_at: Utc::now(),
        }
    }

    pub fn key(&self) -> (&ParticipantId, &ParticipantId, &GroupId, i32) {
        (&self.giver, &self.receiver, &self.group, self.year)
    }

    pub fn same_edge(&self, other: &AssignmentRecord) -> bool {
        self.key() == other.key()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub giver_name: String,
    pub receiver_name: String,
    pub year: i32,
}
