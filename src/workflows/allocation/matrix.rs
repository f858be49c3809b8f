use std::collections::{BTreeMap, HashSet};

use super::domain::{ApplicationId, ReviewerId};
use super::pools::PoolSet;
use super::AllocationError;

/// Per-reviewer count of applications currently assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadLedger {
    counts: BTreeMap<ReviewerId, usize>,
}

impl LoadLedger {
    pub fn get(&self, reviewer: ReviewerId) -> usize {
        self.counts.get(&reviewer).copied().unwrap_or(0)
    }

    pub(crate) fn increment(&mut self, reviewer: ReviewerId) {
        *self.counts.entry(reviewer).or_insert(0) += 1;
    }

    pub(crate) fn decrement(&mut self, reviewer: ReviewerId) {
        if let Some(count) = self.counts.get_mut(&reviewer) {
            *count = count.saturating_sub(1);
        }
    }

    /// Every reviewer that has held a slot during the run.
    pub fn iter(&self) -> impl Iterator<Item = (ReviewerId, usize)> + '_ {
        self.counts.iter().map(|(id, count)| (*id, *count))
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Slots of one application plus its run diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRow {
    pub application_id: ApplicationId,
    slots: Vec<Option<ReviewerId>>,
    pub used_fallback: bool,
}

impl AssignmentRow {
    pub fn slots(&self) -> &[Option<ReviewerId>] {
        &self.slots
    }

    pub fn assigned(&self) -> impl Iterator<Item = ReviewerId> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn fill(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.fill() == self.capacity()
    }

    pub fn holds(&self, reviewer: ReviewerId) -> bool {
        self.slots.contains(&Some(reviewer))
    }
}

/// Application → k reviewer slots, kept consistent with a [`LoadLedger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentMatrix {
    rows: Vec<AssignmentRow>,
    loads: LoadLedger,
}

impl AssignmentMatrix {
    pub fn new(application_ids: &[ApplicationId], reviewers_per_application: usize) -> Self {
        let rows = application_ids
            .iter()
            .map(|application_id| AssignmentRow {
                application_id: application_id.clone(),
                slots: vec![None; reviewers_per_application],
                used_fallback: false,
            })
            .collect();

        Self {
            rows,
            loads: LoadLedger::default(),
        }
    }

    pub fn rows(&self) -> &[AssignmentRow] {
        &self.rows
    }

    /// Rows holding fewer reviewers than they have slots.
    pub fn under_filled(&self) -> impl Iterator<Item = &AssignmentRow> {
        self.rows.iter().filter(|row| !row.is_full())
    }

    pub fn row(&self, index: usize) -> &AssignmentRow {
        &self.rows[index]
    }

    pub fn loads(&self) -> &LoadLedger {
        &self.loads
    }

    pub fn load(&self, reviewer: ReviewerId) -> usize {
        self.loads.get(reviewer)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Places `reviewer` in the first empty slot of the row.
    ///
    /// Returns `false` when the row is full or already holds the reviewer.
    pub(crate) fn place(&mut self, index: usize, reviewer: ReviewerId) -> bool {
        let row = &mut self.rows[index];
        if row.holds(reviewer) {
            return false;
        }

        match row.slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(reviewer);
                self.loads.increment(reviewer);
                true
            }
            None => false,
        }
    }

    /// Swaps the occupant of `slot` for `reviewer`, returning the evicted id.
    pub(crate) fn replace(
        &mut self,
        index: usize,
        slot: usize,
        reviewer: ReviewerId,
    ) -> Option<ReviewerId> {
        let evicted = self.rows[index].slots[slot].replace(reviewer);
        if let Some(evicted) = evicted {
            self.loads.decrement(evicted);
        }
        self.loads.increment(reviewer);
        evicted
    }

    pub(crate) fn mark_fallback(&mut self, index: usize) {
        self.rows[index].used_fallback = true;
    }

    /// Fails on duplicate reviewers within a row or an excluded reviewer
    /// holding a slot. Either means the allocator itself is broken.
    pub fn verify(&self, pools: &PoolSet) -> Result<(), AllocationError> {
        for (row, pool) in self.rows.iter().zip(&pools.pools) {
            let mut seen = HashSet::new();
            for reviewer in row.assigned() {
                if !seen.insert(reviewer) {
                    return Err(AllocationError::DuplicateReviewer {
                        application_id: row.application_id.clone(),
                        reviewer,
                    });
                }
            }

            let conflicts: Vec<ReviewerId> =
                row.assigned().filter(|id| pool.is_excluded(*id)).collect();
            if !conflicts.is_empty() {
                return Err(AllocationError::ExcludedReviewerAssigned {
                    application_id: row.application_id.clone(),
                    reviewers: conflicts,
                });
            }
        }

        Ok(())
    }
}
