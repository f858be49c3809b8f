use std::io::Read;

use super::domain::{ApplicationId, ApplicationRecord, ReviewerUniverse};
use super::normalizer::normalize_reviewer_id;
use super::AllocationError;

pub(crate) const APPLICATION_ID_COLUMN: &str = "Application ID";

/// Reference columns recognised in the applications table, in rank order.
pub(crate) const REVIEWER_COLUMNS: [&str; 5] = [
    "Reviewer 1",
    "Reviewer 2",
    "Reviewer 3",
    "Reviewer 4",
    "Reviewer 5",
];

#[derive(Debug)]
pub(crate) struct ApplicationsTable {
    pub(crate) records: Vec<ApplicationRecord>,
    pub(crate) reviewer_columns: Vec<String>,
}

pub(crate) fn parse_applications<R: Read>(reader: R) -> Result<ApplicationsTable, AllocationError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let id_index = headers
        .iter()
        .position(|header| clean_header(header) == APPLICATION_ID_COLUMN)
        .ok_or(AllocationError::MissingColumn {
            column: APPLICATION_ID_COLUMN,
        })?;

    let reviewer_columns: Vec<(usize, &'static str)> = REVIEWER_COLUMNS
        .iter()
        .filter_map(|column| {
            headers
                .iter()
                .position(|header| clean_header(header) == *column)
                .map(|index| (index, *column))
        })
        .collect();

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let application_id = ApplicationId(row.get(id_index).unwrap_or_default().to_string());
        let references = reviewer_columns
            .iter()
            .filter_map(|(index, _)| row.get(*index).and_then(normalize_reviewer_id))
            .collect();

        records.push(ApplicationRecord {
            application_id,
            references,
        });
    }

    Ok(ApplicationsTable {
        records,
        reviewer_columns: reviewer_columns
            .into_iter()
            .map(|(_, column)| column.to_string())
            .collect(),
    })
}

/// Reads reviewer ids from the first column, skipping anything that does not
/// normalize (header rows, blank lines, notes).
pub(crate) fn parse_reviewers<R: Read>(reader: R) -> Result<ReviewerUniverse, AllocationError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut ids = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        if let Some(id) = row.get(0).and_then(normalize_reviewer_id) {
            ids.push(id);
        }
    }

    Ok(ReviewerUniverse::new(ids))
}

fn clean_header(value: &str) -> &str {
    value.trim_start_matches('\u{feff}').trim()
}
