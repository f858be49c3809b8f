pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

mod cli;
mod commands;

use error::AppError;

/// Parses the command line and runs the selected command.
pub fn run() -> Result<(), AppError> {
    cli::run()
}
