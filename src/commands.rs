use crate::cli::{AllocateArgs, InputArgs, PoolsArgs};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::telemetry;
use crate::workflows::allocation::{
    write_report_files, AllocationInput, AllocationReport, PoolSet, ReviewerAllocator,
};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::info;

pub(crate) fn run_allocate(args: AllocateArgs) -> Result<(), AppError> {
    let AllocateArgs {
        input,
        reviewers_per_application,
        min_per_reviewer,
        require_preferred,
        allow_fallback,
        seed,
        max_repair_passes,
        output,
        counts_output,
        json,
    } = args;

    let mut config = AppConfig::load()?;
    let allocation = &mut config.allocation;
    if let Some(mode) = input.mode {
        allocation.mode = mode.into();
    }
    if let Some(k) = reviewers_per_application {
        allocation.reviewers_per_application = k;
    }
    if let Some(minimum) = min_per_reviewer {
        allocation.minimum_per_reviewer = minimum;
    }
    if let Some(flag) = require_preferred {
        allocation.require_preferred = flag;
    }
    if let Some(flag) = allow_fallback {
        allocation.allow_fallback = flag;
    }
    if let Some(seed) = seed {
        allocation.seed = seed.0;
    }
    if let Some(passes) = max_repair_passes {
        allocation.max_repair_passes = passes;
    }
    config.validate()?;

    telemetry::init(&config.telemetry)?;

    let allocation_input = load_input(&input)?;
    let allocator = ReviewerAllocator::new(config.allocation.clone());
    let report = allocator.run(&allocation_input)?;

    let today = Local::now().date_naive();
    let (assignments_path, counts_path) = output_paths(output, counts_output, today);
    write_report_files(&report, &assignments_path, &counts_path)?;
    info!(
        assignments = %assignments_path.display(),
        counts = %counts_path.display(),
        "allocation tables written"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report.summary())?);
    } else {
        render_allocation_report(&report, &assignments_path, &counts_path);
    }

    Ok(())
}

pub(crate) fn run_pools(args: PoolsArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(mode) = args.input.mode {
        config.allocation.mode = mode.into();
    }

    telemetry::init(&config.telemetry)?;

    let input = load_input(&args.input)?;
    let pools = ReviewerAllocator::new(config.allocation).inspect_pools(&input)?;
    render_pools(&pools, &input);
    Ok(())
}

fn load_input(args: &InputArgs) -> Result<AllocationInput, AppError> {
    let input = AllocationInput::from_paths(&args.applications, &args.reviewers)?;
    info!(
        applications = input.applications.len(),
        reviewers = input.reviewers.len(),
        reviewer_columns = input.reviewer_columns.len(),
        "input tables loaded"
    );
    Ok(input)
}

/// Missing paths default to date-stamped names in the working directory.
fn output_paths(
    output: Option<PathBuf>,
    counts_output: Option<PathBuf>,
    today: NaiveDate,
) -> (PathBuf, PathBuf) {
    let stamp = today.format("%Y%m%d");
    let assignments =
        output.unwrap_or_else(|| PathBuf::from(format!("{stamp}_reviewer_allocation.csv")));
    let counts = counts_output
        .unwrap_or_else(|| PathBuf::from(format!("{stamp}_reviewer_allocation_counts.csv")));
    (assignments, counts)
}

fn display_path(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

fn render_allocation_report(report: &AllocationReport, assignments: &Path, counts: &Path) {
    let capacity = report.capacity;

    println!("Reviewer allocation ({} mode)", report.mode);
    println!("Applications: {}", report.assignments.len());
    if capacity.raised() {
        println!(
            "Reviewers per application: {} (raised from {} so {} reviewers can reach minimum {})",
            capacity.effective,
            capacity.requested,
            report.required.len(),
            report.minimum_per_reviewer
        );
    } else {
        println!("Reviewers per application: {}", capacity.effective);
    }

    println!("\nOutput files");
    println!("- {}", display_path(assignments));
    println!("- {}", display_path(counts));

    let repair = &report.repair;
    println!(
        "\nRepair: {} pass(es), {} placement(s) ({} via fallback), {} displacement(s){}",
        repair.passes,
        repair.placements,
        repair.fallback_placements,
        repair.displacements.len(),
        if repair.converged {
            ""
        } else {
            ", stopped at pass limit"
        }
    );

    let under_filled: Vec<_> = report.under_filled().collect();
    if under_filled.is_empty() {
        println!("\nUnder-filled applications: none");
    } else {
        println!("\nUnder-filled applications");
        for view in under_filled {
            println!(
                "- {}: {} of {} reviewers ({} eligible)",
                view.application_id,
                view.reviewers.iter().flatten().count(),
                capacity.effective,
                view.eligible
            );
        }
    }

    println!(
        "\nReviewers at/above minimum: {} / {}",
        report.meeting_minimum(),
        report.required.len()
    );
    if !report.below_minimum.is_empty() {
        println!("Could not reach minimum for these reviewers");
        for reviewer in &report.below_minimum {
            println!("- {}: {} assigned", reviewer, report.load_of(*reviewer));
        }
    }
}

fn render_pools(pools: &PoolSet, input: &AllocationInput) {
    println!("Candidate pools ({} mode)", pools.mode);
    println!(
        "Reviewers: {}; reference columns: {}",
        input.reviewers.len(),
        if input.reviewer_columns.is_empty() {
            "none".to_string()
        } else {
            input.reviewer_columns.join(", ")
        }
    );

    println!();
    for (application_id, pool) in pools.application_ids.iter().zip(&pools.pools) {
        println!(
            "- {}: {} {}, {} eligible",
            application_id,
            pool.listed(),
            pools.mode.listed_column().to_lowercase(),
            pool.len()
        );
    }

    let pooled = pools.pooled_reviewers();
    let idle = input
        .reviewers
        .ids()
        .iter()
        .filter(|id| !pooled.contains(*id))
        .count();
    println!(
        "\nReviewers in at least one pool: {} ({} in no pool)",
        pooled.len(),
        idle
    );
}
