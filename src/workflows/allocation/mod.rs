//! Reviewer-to-application allocation.
//!
//! A run reads the applications and reviewers tables, derives a candidate pool
//! per application, sizes the per-application slot count, draws an initial
//! random allocation and then tops up reviewers below the minimum workload,
//! displacing over-loaded assignees where an application is already full.

pub mod capacity;
pub mod config;
pub mod domain;
pub mod initial;
pub mod matrix;
pub(crate) mod normalizer;
pub(crate) mod parser;
pub mod pools;
pub mod repair;
pub mod report;
pub mod writer;

#[cfg(test)]
mod tests;

use std::io::Read;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

pub use capacity::{plan_capacity, CapacityPlan};
pub use config::AllocationConfig;
pub use domain::{
    AllocationInput, ApplicationId, ApplicationRecord, PoolMode, ReviewerId, ReviewerUniverse,
};
pub use initial::allocate_initial;
pub use matrix::{AssignmentMatrix, AssignmentRow, LoadLedger};
pub use normalizer::normalize_reviewer_id;
pub use pools::{build_pools, CandidatePool, PoolSet};
pub use repair::{required_reviewers, top_up_to_minimum, Displacement, RepairOutcome};
pub use report::views::{AllocationSummary, AssignmentView, LoadEntry, UnderFill};
pub use report::AllocationReport;
pub use writer::{write_assignments, write_load_counts, write_report_files};

/// Error raised by an allocation run.
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error("failed to access allocation table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("applications table must contain an '{column}' column")]
    MissingColumn { column: &'static str },
    #[error("no reviewer ids found in the reviewers table")]
    EmptyReviewerUniverse,
    #[error(
        "conflict detected for application {application_id}: assigned excluded reviewers {}",
        join_ids(.reviewers)
    )]
    ExcludedReviewerAssigned {
        application_id: ApplicationId,
        reviewers: Vec<ReviewerId>,
    },
    #[error("reviewer {reviewer} assigned more than once to application {application_id}")]
    DuplicateReviewer {
        application_id: ApplicationId,
        reviewer: ReviewerId,
    },
    #[error("capacity total overflows: {factor} x {count} does not fit in a usize")]
    CapacityOverflow { factor: usize, count: usize },
}

fn join_ids(ids: &[ReviewerId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl AllocationInput {
    pub fn from_paths<P, Q>(applications: P, reviewers: Q) -> Result<Self, AllocationError>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let applications = std::fs::File::open(applications)?;
        let reviewers = std::fs::File::open(reviewers)?;
        Self::from_readers(applications, reviewers)
    }

    pub fn from_readers<A: Read, B: Read>(
        applications: A,
        reviewers: B,
    ) -> Result<Self, AllocationError> {
        let table = parser::parse_applications(applications)?;
        let reviewers = parser::parse_reviewers(reviewers)?;

        Ok(Self {
            applications: table.records,
            reviewers,
            reviewer_columns: table.reviewer_columns,
        })
    }
}

/// Runs the full pipeline for one batch with an explicit configuration.
pub struct ReviewerAllocator {
    config: AllocationConfig,
}

impl ReviewerAllocator {
    pub fn new(config: AllocationConfig) -> Self {
        Self { config }
    }

    /// Allocates with an RNG derived from the configured seed.
    pub fn run(&self, input: &AllocationInput) -> Result<AllocationReport, AllocationError> {
        let mut rng = self.config.rng();
        self.run_with_rng(input, &mut rng)
    }

    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        input: &AllocationInput,
        rng: &mut R,
    ) -> Result<AllocationReport, AllocationError> {
        let config = &self.config;
        validate_input(input)?;

        let mut order = input.reviewers.ids().to_vec();
        if config.mode == PoolMode::Exclusion {
            order.shuffle(rng);
        }

        let pools = build_pools(config.mode, &input.applications, &input.reviewers, &order);
        let required = required_reviewers(config.require_preferred, &input.reviewers, &pools);
        let capacity = plan_capacity(
            config.reviewers_per_application,
            config.minimum_per_reviewer,
            required.len(),
            pools.len(),
            pools.seat_ceiling(&required, config.allow_fallback),
        )?;

        let mut matrix = allocate_initial(&pools, capacity.effective, rng);
        matrix.verify(&pools)?;
        info!(
            mode = %config.mode,
            applications = matrix.len(),
            reviewers_per_application = capacity.effective,
            under_filled = matrix.under_filled().count(),
            "initial allocation complete"
        );

        let repair = top_up_to_minimum(&mut matrix, &pools, &required, &config.repair_settings());
        matrix.verify(&pools)?;

        let report = AllocationReport::build(
            &matrix,
            &pools,
            &input.reviewers,
            required,
            capacity,
            config.minimum_per_reviewer,
            repair,
        );

        info!(
            passes = report.repair.passes,
            displacements = report.repair.displacements.len(),
            fallback_placements = report.repair.fallback_placements,
            meeting_minimum = report.meeting_minimum(),
            required = report.required.len(),
            "minimum-load repair complete"
        );
        if !report.below_minimum.is_empty() {
            warn!(
                count = report.below_minimum.len(),
                reviewers = %join_ids(&report.below_minimum),
                minimum = config.minimum_per_reviewer,
                "could not reach minimum for some reviewers"
            );
        }

        Ok(report)
    }

    /// Pools as the allocator would see them, in universe order.
    pub fn inspect_pools(&self, input: &AllocationInput) -> Result<PoolSet, AllocationError> {
        validate_input(input)?;
        Ok(build_pools(
            self.config.mode,
            &input.applications,
            &input.reviewers,
            input.reviewers.ids(),
        ))
    }
}

fn validate_input(input: &AllocationInput) -> Result<(), AllocationError> {
    if input.reviewers.is_empty() {
        return Err(AllocationError::EmptyReviewerUniverse);
    }

    if input.reviewer_columns.is_empty() {
        warn!(
            "no 'Reviewer N' columns found; pools fall back to the whole universe or stay empty"
        );
    }

    Ok(())
}
