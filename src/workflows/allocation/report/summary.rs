use std::cmp::Reverse;
use std::collections::BTreeMap;

use super::super::capacity::CapacityPlan;
use super::super::domain::{PoolMode, ReviewerId, ReviewerUniverse};
use super::super::matrix::AssignmentMatrix;
use super::super::pools::PoolSet;
use super::super::repair::RepairOutcome;
use super::views::{AllocationSummary, AssignmentView, LoadEntry, RepairView, UnderFill};

/// Final state of a run: assignment table, load table, and unmet minimums.
#[derive(Debug, Clone)]
pub struct AllocationReport {
    pub mode: PoolMode,
    pub capacity: CapacityPlan,
    pub minimum_per_reviewer: usize,
    pub assignments: Vec<AssignmentView>,
    /// Sorted by descending count, then ascending reviewer id.
    pub loads: Vec<LoadEntry>,
    pub required: Vec<ReviewerId>,
    /// Required reviewers still below the minimum, in required order.
    pub below_minimum: Vec<ReviewerId>,
    pub repair: RepairOutcome,
}

impl AllocationReport {
    pub fn build(
        matrix: &AssignmentMatrix,
        pools: &PoolSet,
        universe: &ReviewerUniverse,
        required: Vec<ReviewerId>,
        capacity: CapacityPlan,
        minimum_per_reviewer: usize,
        repair: RepairOutcome,
    ) -> Self {
        let assignments = matrix
            .rows()
            .iter()
            .zip(&pools.pools)
            .map(|(row, pool)| AssignmentView {
                application_id: row.application_id.clone(),
                reviewers: row.slots().to_vec(),
                listed: pool.listed(),
                eligible: pool.len(),
                under_filled: !row.is_full(),
                used_fallback: row.used_fallback,
            })
            .collect();

        let mut counts: BTreeMap<ReviewerId, usize> = universe
            .ids()
            .iter()
            .chain(required.iter())
            .map(|id| (*id, 0))
            .collect();
        counts.extend(matrix.loads().iter());

        let mut loads: Vec<LoadEntry> = counts
            .into_iter()
            .map(|(reviewer_id, assigned_count)| LoadEntry {
                reviewer_id,
                assigned_count,
            })
            .collect();
        loads.sort_by_key(|entry| (Reverse(entry.assigned_count), entry.reviewer_id));

        let below_minimum = required
            .iter()
            .copied()
            .filter(|id| matrix.load(*id) < minimum_per_reviewer)
            .collect();

        Self {
            mode: pools.mode,
            capacity,
            minimum_per_reviewer,
            assignments,
            loads,
            required,
            below_minimum,
            repair,
        }
    }

    pub fn meeting_minimum(&self) -> usize {
        self.required.len() - self.below_minimum.len()
    }

    pub fn under_filled(&self) -> impl Iterator<Item = &AssignmentView> {
        self.assignments.iter().filter(|view| view.under_filled)
    }

    pub fn load_of(&self, reviewer: ReviewerId) -> usize {
        self.loads
            .iter()
            .find(|entry| entry.reviewer_id == reviewer)
            .map_or(0, |entry| entry.assigned_count)
    }

    pub fn summary(&self) -> AllocationSummary {
        let needed = self.capacity.effective;
        let under_filled = self
            .under_filled()
            .map(|view| UnderFill {
                application_id: view.application_id.clone(),
                assigned: view.reviewers.iter().flatten().count(),
                needed,
            })
            .collect();

        AllocationSummary {
            mode: self.mode,
            capacity: self.capacity,
            minimum_per_reviewer: self.minimum_per_reviewer,
            applications: self.assignments.len(),
            required_reviewers: self.required.len(),
            meeting_minimum: self.meeting_minimum(),
            below_minimum: self.below_minimum.clone(),
            under_filled,
            repair: RepairView {
                passes: self.repair.passes,
                converged: self.repair.converged,
                placements: self.repair.placements,
                fallback_placements: self.repair.fallback_placements,
                displacements: self.repair.displacements.len(),
            },
            loads: self.loads.clone(),
            assignments: self.assignments.clone(),
        }
    }
}
