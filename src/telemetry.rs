use crate::config::TelemetryConfig;
use std::env;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    /// `RUST_LOG` or `APP_LOG_LEVEL` holds something that is not a tracing directive.
    InvalidFilter {
        variable: &'static str,
        value: String,
        source: ParseError,
    },
    /// A global subscriber is already set, e.g. when `allocate` runs twice in-process.
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter {
                variable, value, ..
            } => write!(
                f,
                "{variable}='{value}' is not a log level or filter (try 'info' or 'reviewer_allocation=debug')"
            ),
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "allocation logging was already initialised: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// Picks the log filter: a non-empty `RUST_LOG` wins over the configured level.
fn log_filter(
    rust_log: Option<String>,
    config: &TelemetryConfig,
) -> Result<EnvFilter, TelemetryError> {
    let (variable, value) = match rust_log.filter(|value| !value.trim().is_empty()) {
        Some(value) => ("RUST_LOG", value),
        None => ("APP_LOG_LEVEL", config.log_level.clone()),
    };

    EnvFilter::try_new(&value).map_err(|source| TelemetryError::InvalidFilter {
        variable,
        value,
        source,
    })
}

/// Installs the global subscriber.
///
/// Logs go to stderr so the allocation summary on stdout stays pipeable.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = log_filter(env::var("RUST_LOG").ok(), config)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(level: &str) -> TelemetryConfig {
        TelemetryConfig {
            log_level: level.to_string(),
        }
    }

    #[test]
    fn configured_level_applies_without_rust_log() {
        assert!(log_filter(None, &config("debug")).is_ok());
        assert!(log_filter(Some("  ".to_string()), &config("warn")).is_ok());
    }

    #[test]
    fn bad_filters_name_the_variable_they_came_from() {
        let err = log_filter(Some("reviewer_allocation=loud".to_string()), &config("info"))
            .expect_err("malformed RUST_LOG");
        assert!(matches!(
            err,
            TelemetryError::InvalidFilter {
                variable: "RUST_LOG",
                ..
            }
        ));

        let err = log_filter(None, &config("reviewer_allocation=loud")).expect_err("malformed level");
        assert!(err.to_string().starts_with("APP_LOG_LEVEL='reviewer_allocation=loud'"));
    }
}
