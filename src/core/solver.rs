use crate::core::candidates::CandidateSets;
use crate::core::recording::project_pairs;
use crate::core::search::find_cycle;
use crate::domain::model::{GroupId, Pair, Participant, Roster};
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::Validate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolveOptions {
    /// Fixed seed for reproducible runs; a fresh one is drawn when unset.
    pub seed: Option<u64>,
}

impl SolveOptions {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleResult {
    pub group: GroupId,
    pub cycle: Vec<Participant>,
    pub pairs: Vec<Pair>,
    pub seed: u64,
}

/// Checks every roster must pass before candidate sets are worth building:
/// at least two participants, then `Roster::validate`.
pub fn check_roster(roster: &Roster) -> Result<()> {
    if roster.len() < 2 {
        return Err(SantaError::TooFewParticipants {
            count: roster.len(),
        });
    }
    roster.validate()
}

/// Find one gift cycle over the whole roster.
///
/// Performs no I/O. `TooFewParticipants` and `InvalidRoster` come first,
/// `NoFeasibleOptions` is raised before any search and `NoFeasibleAssignment`
/// only once every starting point has been exhausted.
pub fn solve(roster: &Roster, options: &SolveOptions) -> Result<CycleResult> {
    check_roster(roster)?;

    let sets = CandidateSets::build(roster)?;
    let seed = options.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    tracing::debug!(group = %roster.group, participants = roster.len(), seed, "searching for cycle");

    let order = find_cycle(&sets, &mut rng).ok_or_else(|| SantaError::NoFeasibleAssignment {
        group: roster.group.to_string(),
    })?;

    let cycle: Vec<Participant> = order
        .into_iter()
        .map(|idx| sets.participant(idx).clone())
        .collect();
    let pairs = project_pairs(&cycle);

    Ok(CycleResult {
        group: roster.group.clone(),
        cycle,
        pairs,
        seed,
    })
}
