use serde::Serialize;
use tracing::{info, warn};

use super::AllocationError;

/// Outcome of checking whether k slots per application can hold the minimum
/// workload of every required reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapacityPlan {
    pub requested: usize,
    pub effective: usize,
    pub required_total: usize,
    pub available_total: usize,
}

impl CapacityPlan {
    pub fn raised(&self) -> bool {
        self.effective > self.requested
    }
}

/// Raises k to `ceil(required_total / applications)` when the requested k
/// cannot host `minimum * required_reviewers` assignments. A raised k never
/// exceeds `seat_ceiling`, the most distinct reviewers any one application
/// could hold; rows that still cannot fill are reported as under-filled.
///
/// With no applications there is nothing to resize and k is kept.
pub fn plan_capacity(
    requested: usize,
    minimum: usize,
    required_reviewers: usize,
    applications: usize,
    seat_ceiling: usize,
) -> Result<CapacityPlan, AllocationError> {
    let required_total = minimum
        .checked_mul(required_reviewers)
        .ok_or(AllocationError::CapacityOverflow {
            factor: minimum,
            count: required_reviewers,
        })?;
    let available_total = applications
        .checked_mul(requested)
        .ok_or(AllocationError::CapacityOverflow {
            factor: requested,
            count: applications,
        })?;

    let effective = if applications > 0 && available_total < required_total {
        let needed = required_total.div_ceil(applications);
        let raised = needed.min(seat_ceiling).max(requested);
        if raised < needed {
            warn!(
                needed,
                seat_ceiling,
                "minimum workload needs more seats than any application can hold"
            );
        }
        info!(
            from = requested,
            to = raised,
            minimum,
            required_reviewers,
            "increasing reviewers per application to satisfy minimum workload"
        );
        raised
    } else {
        requested
    };

    Ok(CapacityPlan {
        requested,
        effective,
        required_total,
        available_total,
    })
}
