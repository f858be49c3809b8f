use serde::Serialize;

use super::super::capacity::CapacityPlan;
use super::super::domain::{ApplicationId, PoolMode, ReviewerId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentView {
    pub application_id: ApplicationId,
    pub reviewers: Vec<Option<ReviewerId>>,
    /// Excluded count or preferred pool size, depending on the mode.
    pub listed: usize,
    pub eligible: usize,
    pub under_filled: bool,
    pub used_fallback: bool,
}

/// Application holding fewer than k reviewers after repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnderFill {
    pub application_id: ApplicationId,
    pub assigned: usize,
    pub needed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadEntry {
    pub reviewer_id: ReviewerId,
    pub assigned_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairView {
    pub passes: usize,
    pub converged: bool,
    pub placements: usize,
    pub fallback_placements: usize,
    pub displacements: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationSummary {
    pub mode: PoolMode,
    pub capacity: CapacityPlan,
    pub minimum_per_reviewer: usize,
    pub applications: usize,
    pub required_reviewers: usize,
    pub meeting_minimum: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub below_minimum: Vec<ReviewerId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub under_filled: Vec<UnderFill>,
    pub repair: RepairView,
    pub loads: Vec<LoadEntry>,
    pub assignments: Vec<AssignmentView>,
}
