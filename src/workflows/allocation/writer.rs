use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::parser::APPLICATION_ID_COLUMN;
use super::report::AllocationReport;
use super::AllocationError;

pub fn write_assignments<W: Write>(
    writer: W,
    report: &AllocationReport,
) -> Result<(), AllocationError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let k = report.capacity.effective;

    let mut header = vec![APPLICATION_ID_COLUMN.to_string()];
    header.extend((1..=k).map(|slot| format!("Assigned Reviewer {slot}")));
    header.extend(
        [
            report.mode.listed_column(),
            "Eligible Pool Size",
            "Under Filled",
            "Used Fallback",
        ]
        .map(String::from),
    );
    csv_writer.write_record(&header)?;

    for view in &report.assignments {
        let mut record = Vec::with_capacity(header.len());
        record.push(view.application_id.0.clone());
        record.extend(
            view.reviewers
                .iter()
                .map(|slot| slot.map(|id| id.to_string()).unwrap_or_default()),
        );
        record.push(view.listed.to_string());
        record.push(view.eligible.to_string());
        record.push(flag(view.under_filled).to_string());
        record.push(flag(view.used_fallback).to_string());
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn write_load_counts<W: Write>(
    writer: W,
    report: &AllocationReport,
) -> Result<(), AllocationError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Reviewer ID", "Assigned Count"])?;

    for entry in &report.loads {
        csv_writer.write_record([
            entry.reviewer_id.to_string(),
            entry.assigned_count.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes both output tables, creating or truncating the files.
pub fn write_report_files<P, Q>(
    report: &AllocationReport,
    assignments_path: P,
    counts_path: Q,
) -> Result<(), AllocationError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    write_assignments(File::create(assignments_path)?, report)?;
    write_load_counts(File::create(counts_path)?, report)
}

fn flag(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}
