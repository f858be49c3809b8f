use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use super::matrix::AssignmentMatrix;
use super::pools::PoolSet;

/// Draws `min(k, |pool|)` reviewers per application uniformly without
/// replacement, in table order, from a single RNG stream.
pub fn allocate_initial<R: Rng + ?Sized>(
    pools: &PoolSet,
    reviewers_per_application: usize,
    rng: &mut R,
) -> AssignmentMatrix {
    let mut matrix = AssignmentMatrix::new(&pools.application_ids, reviewers_per_application);

    for (index, pool) in pools.pools.iter().enumerate() {
        let mut candidates = pool.candidates().to_vec();
        let take = reviewers_per_application.min(candidates.len());
        let (picks, _) = candidates.partial_shuffle(rng, take);

        for reviewer in picks.iter().copied() {
            matrix.place(index, reviewer);
        }

        if take < reviewers_per_application {
            warn!(
                application = %pools.application_ids[index],
                eligible = take,
                needed = reviewers_per_application,
                "application under-filled: not enough eligible reviewers"
            );
        }
    }

    matrix
}
