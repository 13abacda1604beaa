//! Backtracking search for a single cycle through every participant.
//!
//! The search walks partial paths depth first. A path is extended from its
//! last participant with any candidate not already on it, and a full-length
//! path only counts when its last participant may also give to the first.
//! Worst case is factorial in the roster size, which is fine for gift
//! exchange groups.

use crate::core::candidates::CandidateSets;
use rand::seq::SliceRandom;
use rand::Rng;

/// Find one cycle as roster indices, or `None` if the constraints admit none.
///
/// The RNG shuffles the order in which starting points are tried and ranks
/// each candidate list by that same permutation. It only changes which cycle
/// comes back when several exist, never whether one is found.
pub fn find_cycle<R: Rng + ?Sized>(sets: &CandidateSets<'_>, rng: &mut R) -> Option<Vec<usize>> {
    let size = sets.len();
    if size < 2 {
        return None;
    }

    let mut order: Vec<usize> = (0..size).collect();
    order.shuffle(rng);

    let mut rank = vec![0; size];
    for (position, &idx) in order.iter().enumerate() {
        rank[idx] = position;
    }

    let ranked: Vec<Vec<usize>> = (0..size)
        .map(|giver| {
            let mut candidates = sets.options(giver).to_vec();
            candidates.sort_by_key(|&idx| rank[idx]);
            candidates
        })
        .collect();

    order.iter().find_map(|&start| {
        tracing::trace!(start = %sets.participant(start).name, "trying start");
        extend(&ranked, vec![start])
    })
}

fn extend(options: &[Vec<usize>], path: Vec<usize>) -> Option<Vec<usize>> {
    let last = *path.last()?;

    if path.len() == options.len() {
        return options[last].contains(&path[0]).then_some(path);
    }

    options[last]
        .iter()
        .filter(|&&next| !path.contains(&next))
        .find_map(|&next| {
            let mut longer = path.clone();
            longer.push(next);
            extend(options, longer)
        })
}

/// True when `cycle` visits every participant once and each step, including
/// the wrap back to the start, is an allowed edge.
pub fn is_valid_cycle(sets: &CandidateSets<'_>, cycle: &[usize]) -> bool {
    let size = sets.len();
    if size < 2 || cycle.len() != size {
        return false;
    }

    let mut seen = vec![false; size];
    for &idx in cycle {
        if idx >= size || seen[idx] {
            return false;
        }
        seen[idx] = true;
    }

    (0..size).all(|i| sets.allows(cycle[i], cycle[(i + 1) % size]))
}
