use std::env;
use std::fmt;

use crate::workflows::allocation::config::{
    MAX_MIN_PER_REVIEWER, MAX_REVIEWERS_PER_APPLICATION,
};
use crate::workflows::allocation::{AllocationConfig, PoolMode};

const ENV_MODE: &str = "ALLOC_MODE";
const ENV_REVIEWERS_PER_APPLICATION: &str = "ALLOC_REVIEWERS_PER_APPLICATION";
const ENV_MIN_PER_REVIEWER: &str = "ALLOC_MIN_PER_REVIEWER";
const ENV_REQUIRE_PREFERRED: &str = "ALLOC_REQUIRE_PREFERRED";
const ENV_ALLOW_FALLBACK: &str = "ALLOC_ALLOW_FALLBACK";
const ENV_SEED: &str = "ALLOC_SEED";
const ENV_MAX_REPAIR_PASSES: &str = "ALLOC_MAX_REPAIR_PASSES";
const ENV_LOG_LEVEL: &str = "APP_LOG_LEVEL";

/// Top-level configuration for an allocation run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub allocation: AllocationConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Built-in defaults overlaid with `ALLOC_*` variables from the
    /// environment or a `.env` file.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = AllocationConfig::default();

        let mode = match env::var(ENV_MODE) {
            Ok(value) => PoolMode::parse(&value).ok_or(ConfigError::InvalidMode { value })?,
            Err(_) => defaults.mode,
        };

        let reviewers_per_application =
            read_count(ENV_REVIEWERS_PER_APPLICATION, defaults.reviewers_per_application)?;
        let minimum_per_reviewer = read_count(ENV_MIN_PER_REVIEWER, defaults.minimum_per_reviewer)?;
        let require_preferred = read_flag(ENV_REQUIRE_PREFERRED, defaults.require_preferred)?;
        let allow_fallback = read_flag(ENV_ALLOW_FALLBACK, defaults.allow_fallback)?;
        let max_repair_passes = read_count(ENV_MAX_REPAIR_PASSES, defaults.max_repair_passes)?;

        let seed = match env::var(ENV_SEED) {
            Ok(value) => parse_seed(&value).ok_or(ConfigError::InvalidNumber {
                variable: ENV_SEED,
                value,
            })?,
            Err(_) => defaults.seed,
        };

        let log_level = env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| "info".to_string());

        let config = Self {
            allocation: AllocationConfig {
                mode,
                reviewers_per_application,
                minimum_per_reviewer,
                require_preferred,
                allow_fallback,
                seed,
                max_repair_passes,
            },
            telemetry: TelemetryConfig { log_level },
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the allocator cannot run with. Re-run after applying
    /// command-line overrides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allocation.reviewers_per_application == 0 {
            return Err(ConfigError::ZeroReviewersPerApplication);
        }
        if self.allocation.max_repair_passes == 0 {
            return Err(ConfigError::ZeroRepairPasses);
        }
        if self.allocation.reviewers_per_application > MAX_REVIEWERS_PER_APPLICATION {
            return Err(ConfigError::OutOfRange {
                setting: "reviewers per application",
                value: self.allocation.reviewers_per_application,
                max: MAX_REVIEWERS_PER_APPLICATION,
            });
        }
        if self.allocation.minimum_per_reviewer > MAX_MIN_PER_REVIEWER {
            return Err(ConfigError::OutOfRange {
                setting: "minimum per reviewer",
                value: self.allocation.minimum_per_reviewer,
                max: MAX_MIN_PER_REVIEWER,
            });
        }
        Ok(())
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Accepts a decimal seed, or `none`/`random`/empty for an unseeded run.
pub fn parse_seed(value: &str) -> Option<Option<u64>> {
    let trimmed = value.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "" | "none" | "random" | "off" => Some(None),
        _ => trimmed.parse().ok().map(Some),
    }
}

fn read_count(variable: &'static str, default: usize) -> Result<usize, ConfigError> {
    match env::var(variable) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { variable, value }),
        Err(_) => Ok(default),
    }
}

fn read_flag(variable: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Ok(value) = env::var(variable) else {
        return Ok(default);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { variable, value }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidMode {
        value: String,
    },
    InvalidNumber {
        variable: &'static str,
        value: String,
    },
    InvalidFlag {
        variable: &'static str,
        value: String,
    },
    ZeroReviewersPerApplication,
    ZeroRepairPasses,
    OutOfRange {
        setting: &'static str,
        value: usize,
        max: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidMode { value } => write!(
                f,
                "{ENV_MODE} must be 'exclusion' or 'preference' (got '{value}')"
            ),
            ConfigError::InvalidNumber { variable, value } => {
                write!(f, "{variable} must be a non-negative integer (got '{value}')")
            }
            ConfigError::InvalidFlag { variable, value } => {
                write!(f, "{variable} must be true or false (got '{value}')")
            }
            ConfigError::ZeroReviewersPerApplication => {
                write!(f, "reviewers per application must be at least 1")
            }
            ConfigError::ZeroRepairPasses => write!(f, "max repair passes must be at least 1"),
            ConfigError::OutOfRange {
                setting,
                value,
                max,
            } => write!(f, "{setting} must be at most {max} (got {value})"),
        }
    }
}

impl std::error::Error for ConfigError {}
