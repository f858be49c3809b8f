use std::collections::{BTreeSet, HashSet};

use tracing::warn;

use super::domain::{ApplicationId, ApplicationRecord, PoolMode, ReviewerId, ReviewerUniverse};

/// Reviewers an application may legally be assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePool {
    candidates: Vec<ReviewerId>,
    excluded: BTreeSet<ReviewerId>,
    listed: usize,
}

impl CandidatePool {
    /// Everyone in `order` except the excluded reviewers, keeping `order`.
    pub fn excluding(order: &[ReviewerId], excluded: BTreeSet<ReviewerId>) -> Self {
        let candidates = order
            .iter()
            .copied()
            .filter(|id| !excluded.contains(id))
            .collect();
        let listed = excluded.len();
        Self {
            candidates,
            excluded,
            listed,
        }
    }

    /// Ranked preferred reviewers; the first occurrence of an id wins.
    pub fn preferring<I>(preferred: I) -> Self
    where
        I: IntoIterator<Item = ReviewerId>,
    {
        let mut seen = HashSet::new();
        let candidates: Vec<ReviewerId> = preferred
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();
        let listed = candidates.len();
        Self {
            candidates,
            excluded: BTreeSet::new(),
            listed,
        }
    }

    pub fn candidates(&self) -> &[ReviewerId] {
        &self.candidates
    }

    pub fn contains(&self, reviewer: ReviewerId) -> bool {
        self.candidates.contains(&reviewer)
    }

    /// Conflicts that must never be assigned, even through fallback.
    pub fn is_excluded(&self, reviewer: ReviewerId) -> bool {
        self.excluded.contains(&reviewer)
    }

    /// Number of distinct references listed for the application.
    pub fn listed(&self) -> usize {
        self.listed
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Candidate pools for every application, in table order.
#[derive(Debug, Clone)]
pub struct PoolSet {
    pub mode: PoolMode,
    pub application_ids: Vec<ApplicationId>,
    pub pools: Vec<CandidatePool>,
}

impl PoolSet {
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Reviewers present in at least one pool, ascending.
    pub fn pooled_reviewers(&self) -> BTreeSet<ReviewerId> {
        self.pools
            .iter()
            .flat_map(|pool| pool.candidates().iter().copied())
            .collect()
    }

    /// Most distinct reviewers a single application could end up holding.
    /// Without fallback that is the largest pool; with it, any required
    /// reviewer may also be seated outside its pools.
    pub fn seat_ceiling(&self, required: &[ReviewerId], allow_fallback: bool) -> usize {
        let largest = self.pools.iter().map(CandidatePool::len).max().unwrap_or(0);
        if !allow_fallback {
            return largest;
        }

        let mut seatable = self.pooled_reviewers();
        seatable.extend(required.iter().copied());
        largest.max(seatable.len())
    }
}

/// Derives candidate pools from the normalized references of each record.
///
/// `universe_order` decides the candidate order in exclusion mode; the
/// allocator passes a shuffled copy of the universe so draws follow the seed.
pub fn build_pools(
    mode: PoolMode,
    records: &[ApplicationRecord],
    universe: &ReviewerUniverse,
    universe_order: &[ReviewerId],
) -> PoolSet {
    let mut unknown = BTreeSet::new();

    let pools = records
        .iter()
        .map(|record| match mode {
            PoolMode::Exclusion => {
                let excluded = record.references.iter().copied().collect();
                CandidatePool::excluding(universe_order, excluded)
            }
            PoolMode::Preference => {
                let pool = CandidatePool::preferring(record.references.iter().copied());
                unknown.extend(
                    pool.candidates()
                        .iter()
                        .copied()
                        .filter(|id| !universe.contains(*id)),
                );
                pool
            }
        })
        .collect();

    if !unknown.is_empty() {
        let ids: Vec<String> = unknown.iter().map(ToString::to_string).collect();
        warn!(
            count = unknown.len(),
            reviewers = %ids.join(", "),
            "preferred reviewers missing from the reviewers table"
        );
    }

    PoolSet {
        mode,
        application_ids: records
            .iter()
            .map(|record| record.application_id.clone())
            .collect(),
        pools,
    }
}
