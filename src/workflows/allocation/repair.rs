use std::cmp::Reverse;

use serde::Serialize;
use tracing::{debug, warn};

use super::domain::{ApplicationId, ReviewerId, ReviewerUniverse};
use super::matrix::AssignmentMatrix;
use super::pools::PoolSet;

/// Knobs for the minimum-load top-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairSettings {
    pub minimum: usize,
    pub allow_fallback: bool,
    pub max_passes: usize,
}

/// An assignee removed from a full application to make room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Displacement {
    pub application_id: ApplicationId,
    pub evicted: ReviewerId,
    pub evicted_load_before: usize,
    pub evicted_load_after: usize,
    pub inserted: ReviewerId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairOutcome {
    pub passes: usize,
    /// `false` only when the pass cap ran out while loads were still moving.
    pub converged: bool,
    pub placements: usize,
    pub fallback_placements: usize,
    pub displacements: Vec<Displacement>,
}

/// Reviewers whose load must reach the minimum.
///
/// With `require_preferred` only reviewers present in some pool count,
/// ascending by id; otherwise the whole universe in table order.
pub fn required_reviewers(
    require_preferred: bool,
    universe: &ReviewerUniverse,
    pools: &PoolSet,
) -> Vec<ReviewerId> {
    if require_preferred {
        pools.pooled_reviewers().into_iter().collect()
    } else {
        universe.ids().to_vec()
    }
}

/// Greedy fixed-point repair raising every required reviewer to `minimum`.
///
/// Never fails: reviewers that cannot be placed are left below the minimum
/// for the report to surface.
pub fn top_up_to_minimum(
    matrix: &mut AssignmentMatrix,
    pools: &PoolSet,
    required: &[ReviewerId],
    settings: &RepairSettings,
) -> RepairOutcome {
    let mut outcome = RepairOutcome::default();
    let satisfied = |matrix: &AssignmentMatrix| {
        required
            .iter()
            .all(|reviewer| matrix.load(*reviewer) >= settings.minimum)
    };

    if settings.minimum == 0 || satisfied(matrix) {
        outcome.converged = true;
        return outcome;
    }

    while outcome.passes < settings.max_passes {
        outcome.passes += 1;
        let mut changed = false;

        for &reviewer in required {
            while matrix.load(reviewer) < settings.minimum {
                if !place_reviewer(matrix, pools, reviewer, settings, &mut outcome) {
                    break;
                }
                changed = true;
            }
        }

        if !changed || satisfied(matrix) {
            outcome.converged = true;
            break;
        }
    }

    if !outcome.converged {
        warn!(
            passes = outcome.passes,
            "repair pass limit reached; keeping best-effort allocation"
        );
    }

    outcome
}

fn place_reviewer(
    matrix: &mut AssignmentMatrix,
    pools: &PoolSet,
    reviewer: ReviewerId,
    settings: &RepairSettings,
    outcome: &mut RepairOutcome,
) -> bool {
    let mut candidates: Vec<usize> = (0..matrix.len())
        .filter(|&index| {
            pools.pools[index].contains(reviewer) && !matrix.row(index).holds(reviewer)
        })
        .collect();
    candidates.sort_by_key(|&index| matrix.row(index).fill());

    for index in candidates {
        if insert(matrix, index, reviewer, settings.minimum, outcome) {
            outcome.placements += 1;
            return true;
        }
    }

    if !settings.allow_fallback {
        return false;
    }

    // Pool members were already tried above; conflicts stay off limits.
    for index in 0..matrix.len() {
        let pool = &pools.pools[index];
        if pool.contains(reviewer) || pool.is_excluded(reviewer) || matrix.row(index).holds(reviewer)
        {
            continue;
        }

        if insert(matrix, index, reviewer, settings.minimum, outcome) {
            matrix.mark_fallback(index);
            outcome.placements += 1;
            outcome.fallback_placements += 1;
            return true;
        }
    }

    false
}

/// Fills an empty slot, or evicts the highest-loaded assignee above the
/// minimum. Highest-load-first is a heuristic tie-break, not a proven policy.
fn insert(
    matrix: &mut AssignmentMatrix,
    index: usize,
    reviewer: ReviewerId,
    minimum: usize,
    outcome: &mut RepairOutcome,
) -> bool {
    if matrix.place(index, reviewer) {
        return true;
    }

    let mut occupants: Vec<(usize, ReviewerId)> = matrix
        .row(index)
        .slots()
        .iter()
        .enumerate()
        .filter_map(|(slot, occupant)| occupant.map(|id| (slot, id)))
        .collect();
    occupants.sort_by_key(|(_, id)| Reverse(matrix.load(*id)));

    let Some((slot, evicted)) = occupants
        .into_iter()
        .find(|(_, id)| matrix.load(*id) > minimum)
    else {
        return false;
    };

    let evicted_load_before = matrix.load(evicted);
    matrix.replace(index, slot, reviewer);
    let application_id = matrix.row(index).application_id.clone();

    debug!(
        application = %application_id,
        %evicted,
        %reviewer,
        evicted_load = evicted_load_before,
        "displaced reviewer above minimum"
    );

    outcome.displacements.push(Displacement {
        application_id,
        evicted,
        evicted_load_before,
        evicted_load_after: matrix.load(evicted),
        inserted: reviewer,
    });

    true
}
