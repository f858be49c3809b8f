use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use super::domain::PoolMode;
use super::repair::RepairSettings;

pub const DEFAULT_REVIEWERS_PER_APPLICATION: usize = 2;
pub const DEFAULT_MIN_PER_REVIEWER: usize = 2;
pub const DEFAULT_REQUIRE_PREFERRED: bool = true;
pub const DEFAULT_ALLOW_FALLBACK: bool = false;
pub const DEFAULT_SEED: Option<u64> = Some(7);
pub const DEFAULT_MAX_REPAIR_PASSES: usize = 100;

/// Upper bounds accepted from configuration; each row allocates k slots.
pub const MAX_REVIEWERS_PER_APPLICATION: usize = 1_000;
pub const MAX_MIN_PER_REVIEWER: usize = 100_000;

/// Batch settings for one allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationConfig {
    pub mode: PoolMode,
    pub reviewers_per_application: usize,
    pub minimum_per_reviewer: usize,
    /// Only reviewers appearing in some candidate pool must reach the minimum.
    pub require_preferred: bool,
    /// Let repair place reviewers outside their pools (never across exclusions).
    pub allow_fallback: bool,
    /// `None` draws from OS entropy and makes runs non-reproducible.
    pub seed: Option<u64>,
    pub max_repair_passes: usize,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            mode: PoolMode::Preference,
            reviewers_per_application: DEFAULT_REVIEWERS_PER_APPLICATION,
            minimum_per_reviewer: DEFAULT_MIN_PER_REVIEWER,
            require_preferred: DEFAULT_REQUIRE_PREFERRED,
            allow_fallback: DEFAULT_ALLOW_FALLBACK,
            seed: DEFAULT_SEED,
            max_repair_passes: DEFAULT_MAX_REPAIR_PASSES,
        }
    }
}

impl AllocationConfig {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn repair_settings(&self) -> RepairSettings {
        RepairSettings {
            minimum: self.minimum_per_reviewer,
            allow_fallback: self.allow_fallback,
            max_passes: self.max_repair_passes,
        }
    }
}
