use crate::commands::{run_allocate, run_pools};
use crate::config::parse_seed;
use crate::error::AppError;
use crate::workflows::allocation::PoolMode;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "reviewer-allocation",
    about = "Assign reviewers to applications under exclusion, preference, and minimum-load constraints",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Allocate reviewers and write the assignment and load-count tables
    Allocate(AllocateArgs),
    /// Show each application's candidate pool sizes without allocating
    Pools(PoolsArgs),
}

#[derive(Args, Debug)]
pub(crate) struct InputArgs {
    /// Applications CSV with an `Application ID` column and `Reviewer 1`..`Reviewer 5`
    #[arg(long)]
    pub(crate) applications: PathBuf,
    /// Reviewers CSV; ids are read from the first column
    #[arg(long)]
    pub(crate) reviewers: PathBuf,
    /// How the `Reviewer N` columns are read (defaults to ALLOC_MODE or preference)
    #[arg(long, value_enum)]
    pub(crate) mode: Option<ModeArg>,
}

#[derive(Args, Debug)]
pub(crate) struct AllocateArgs {
    #[command(flatten)]
    pub(crate) input: InputArgs,
    /// Reviewers per application before any capacity increase
    #[arg(long, short = 'k')]
    pub(crate) reviewers_per_application: Option<usize>,
    /// Minimum number of applications per required reviewer (0 disables repair)
    #[arg(long)]
    pub(crate) min_per_reviewer: Option<usize>,
    /// Only reviewers that appear in some pool must reach the minimum
    #[arg(long)]
    pub(crate) require_preferred: Option<bool>,
    /// Allow repair to place reviewers outside their pools (never across exclusions)
    #[arg(long)]
    pub(crate) allow_fallback: Option<bool>,
    /// Random seed, or `none` for an unseeded run
    #[arg(long, value_parser = parse_seed_arg)]
    pub(crate) seed: Option<SeedArg>,
    /// Upper bound on repair sweeps
    #[arg(long)]
    pub(crate) max_repair_passes: Option<usize>,
    /// Assignment table path (defaults to <YYYYMMDD>_reviewer_allocation.csv)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Load-count table path (defaults to <YYYYMMDD>_reviewer_allocation_counts.csv)
    #[arg(long)]
    pub(crate) counts_output: Option<PathBuf>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PoolsArgs {
    #[command(flatten)]
    pub(crate) input: InputArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ModeArg {
    Exclusion,
    Preference,
}

impl From<ModeArg> for PoolMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Exclusion => PoolMode::Exclusion,
            ModeArg::Preference => PoolMode::Preference,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SeedArg(pub(crate) Option<u64>);

fn parse_seed_arg(raw: &str) -> Result<SeedArg, String> {
    parse_seed(raw)
        .map(SeedArg)
        .ok_or_else(|| format!("'{raw}' is neither a non-negative integer nor 'none'"))
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Allocate(args) => run_allocate(args),
        Command::Pools(args) => run_pools(args),
    }
}
