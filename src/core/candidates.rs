use crate::domain::model::{Participant, ParticipantId, Roster};
use crate::utils::error::{Result, SantaError};

/// Who each participant may legally give to in this run.
///
/// Candidates are stored as roster indices, in roster order. Every list is
/// non-empty once `build` succeeds.
#[derive(Debug, Clone)]
pub struct CandidateSets<'a> {
    roster: &'a Roster,
    options: Vec<Vec<usize>>,
}

impl<'a> CandidateSets<'a> {
    /// Start from everyone else, narrow to the allow-list when one is set,
    /// then drop every past recipient. Fails on the first participant left
    /// with nobody to give to.
    pub fn build(roster: &'a Roster) -> Result<Self> {
        let mut options = Vec::with_capacity(roster.len());

        for (giver_idx, entry) in roster.entries.iter().enumerate() {
            let candidates: Vec<usize> = roster
                .entries
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != giver_idx)
                .filter(|(_, other)| {
                    entry.allowed.is_empty() || entry.allowed.contains(&other.participant.id)
                })
                .filter(|(_, other)| !entry.excluded.contains(&other.participant.id))
                .map(|(idx, _)| idx)
                .collect();

            if candidates.is_empty() {
                tracing::debug!(
                    participant = %entry.participant.name,
                    allowed = entry.allowed.len(),
                    excluded = entry.excluded.len(),
                    "participant has no candidates left"
                );
                return Err(SantaError::NoFeasibleOptions {
                    participant: entry.participant.name.clone(),
                });
            }

            options.push(candidates);
        }

        Ok(Self { roster, options })
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn options(&self, giver: usize) -> &[usize] {
        &self.options[giver]
    }

    pub fn allows(&self, giver: usize, receiver: usize) -> bool {
        self.options
            .get(giver)
            .is_some_and(|candidates| candidates.contains(&receiver))
    }

    pub fn participant(&self, idx: usize) -> &'a Participant {
        &self.roster.entries[idx].participant
    }

    pub fn candidates_for(&self, id: &ParticipantId) -> Option<Vec<&'a Participant>> {
        let giver = self.roster.position(id)?;
        Some(
            self.options[giver]
                .iter()
                .map(|&idx| self.participant(idx))
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a Participant, Vec<&'a Participant>)> + '_ {
        self.options.iter().enumerate().map(|(giver, candidates)| {
            (
                self.participant(giver),
                candidates.iter().map(|&idx| self.participant(idx)).collect(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{GroupId, RosterEntry};

    fn entry(name: &str) -> RosterEntry {
        RosterEntry::new(Participant {
            id: ParticipantId::new(name),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            group: GroupId::new("test"),
        })
    }

    fn names(candidates: Option<Vec<&Participant>>) -> Vec<String> {
        candidates
            .unwrap()
            .into_iter()
            .map(|p| p.name.clone())
            .collect()
    }

    #[test]
    fn test_defaults_to_everyone_else() {
        let roster = Roster::new(
            GroupId::new("test"),
            vec![entry("A"), entry("B"), entry("C")],
        );
        let sets = CandidateSets::build(&roster).unwrap();

        assert_eq!(names(sets.candidates_for(&ParticipantId::new("A"))), ["B", "C"]);
        assert_eq!(names(sets.candidates_for(&ParticipantId::new("C"))), ["A", "B"]);
        assert!(!sets.allows(0, 0));
    }

    #[test]
    fn test_allow_list_restricts_instead_of_extending() {
        let roster = Roster::new(
            GroupId::new("test"),
            vec![entry("A").allow(["C"]), entry("B"), entry("C")],
        );
        let sets = CandidateSets::build(&roster).unwrap();

        assert_eq!(names(sets.candidates_for(&ParticipantId::new("A"))), ["C"]);
        assert!(sets.allows(0, 2));
        assert!(!sets.allows(0, 1));
    }

    #[test]
    fn test_exclusions_apply_after_allow_list() {
        let roster = Roster::new(
            GroupId::new("test"),
            vec![
                entry("A").allow(["B", "C"]).exclude(["B"]),
                entry("B").exclude(["A", "Zed"]),
                entry("C"),
            ],
        );
        let sets = CandidateSets::build(&roster).unwrap();

        assert_eq!(names(sets.candidates_for(&ParticipantId::new("A"))), ["C"]);
        assert_eq!(names(sets.candidates_for(&ParticipantId::new("B"))), ["C"]);
    }

    #[test]
    fn test_starved_participant_is_named() {
        let roster = Roster::new(
            GroupId::new("test"),
            vec![entry("A"), entry("B").allow(["C"]).exclude(["C"]), entry("C")],
        );

        match CandidateSets::build(&roster) {
            Err(SantaError::NoFeasibleOptions { participant }) => assert_eq!(participant, "B"),
            other => panic!("expected NoFeasibleOptions, got {:?}", other.map(|s| s.len())),
        }
    }

    #[test]
    fn test_unknown_participant_has_no_candidates() {
        let roster = Roster::new(GroupId::new("test"), vec![entry("A"), entry("B")]);
        let sets = CandidateSets::build(&roster).unwrap();
        assert!(sets.candidates_for(&ParticipantId::new("Nobody")).is_none());
        assert_eq!(sets.iter().count(), 2);
    }
}
