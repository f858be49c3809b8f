use crate::workflows::allocation::domain::{
    AllocationInput, ApplicationId, ApplicationRecord, PoolMode, ReviewerId, ReviewerUniverse,
};
use crate::workflows::allocation::matrix::AssignmentMatrix;
use crate::workflows::allocation::pools::{build_pools, PoolSet};
use crate::workflows::allocation::repair::RepairSettings;
use crate::workflows::allocation::AllocationConfig;

pub(super) fn rid(value: u64) -> ReviewerId {
    ReviewerId(value)
}

pub(super) fn rids(values: &[u64]) -> Vec<ReviewerId> {
    values.iter().copied().map(ReviewerId).collect()
}

pub(super) fn universe(values: &[u64]) -> ReviewerUniverse {
    ReviewerUniverse::new(rids(values))
}

pub(super) fn records(rows: &[&[u64]]) -> Vec<ApplicationRecord> {
    rows.iter()
        .enumerate()
        .map(|(index, references)| ApplicationRecord {
            application_id: ApplicationId(format!("APP-{:03}", index + 1)),
            references: rids(references),
        })
        .collect()
}

pub(super) fn input(rows: &[&[u64]], reviewers: &[u64]) -> AllocationInput {
    AllocationInput {
        applications: records(rows),
        reviewers: universe(reviewers),
        reviewer_columns: vec!["Reviewer 1".to_string(), "Reviewer 2".to_string()],
    }
}

pub(super) fn preference_pools(rows: &[&[u64]]) -> PoolSet {
    let universe = ReviewerUniverse::default();
    build_pools(PoolMode::Preference, &records(rows), &universe, &[])
}

pub(super) fn exclusion_pools(rows: &[&[u64]], reviewers: &[u64]) -> PoolSet {
    let universe = universe(reviewers);
    build_pools(PoolMode::Exclusion, &records(rows), &universe, universe.ids())
}

/// Matrix with the given reviewers already seated, row by row.
pub(super) fn seeded_matrix(pools: &PoolSet, k: usize, seats: &[&[u64]]) -> AssignmentMatrix {
    let mut matrix = AssignmentMatrix::new(&pools.application_ids, k);
    for (index, row) in seats.iter().enumerate() {
        for reviewer in row.iter().copied() {
            assert!(matrix.place(index, ReviewerId(reviewer)), "fixture seat fits");
        }
    }
    matrix
}

pub(super) fn settings(minimum: usize, allow_fallback: bool) -> RepairSettings {
    RepairSettings {
        minimum,
        allow_fallback,
        max_passes: 100,
    }
}

pub(super) fn preference_config(k: usize, minimum: usize) -> AllocationConfig {
    AllocationConfig {
        mode: PoolMode::Preference,
        reviewers_per_application: k,
        minimum_per_reviewer: minimum,
        require_preferred: true,
        allow_fallback: false,
        seed: Some(7),
        max_repair_passes: 100,
    }
}

pub(super) fn exclusion_config(k: usize, minimum: usize) -> AllocationConfig {
    AllocationConfig {
        mode: PoolMode::Exclusion,
        reviewers_per_application: k,
        minimum_per_reviewer: minimum,
        require_preferred: false,
        allow_fallback: false,
        seed: Some(42),
        max_repair_passes: 100,
    }
}
