use std::fs;
use std::path::PathBuf;

use reviewer_allocation::workflows::allocation::{
    write_report_files, AllocationConfig, AllocationError, AllocationInput, PoolMode, ReviewerAllocator,
    ReviewerId,
};
use tempfile::TempDir;

const APPLICANTS: &str = "Application ID,Title,Reviewer 1,Reviewer 2,Reviewer 3\n\
CASDAR-01,Soil carbon,138590,\"200,114\",\n\
CASDAR-02,Coastal erosion,1.3859E+05,,\n\
CASDAR-03,Grid storage,300201.0,n/a,200114\n\
CASDAR-04,Urban heat,,,\n";

const REVIEWERS: &str = "Reviewer ID,Name\n\
138590,A. Lovelace\n\
200114,G. Hopper\n\
300201,K. Johnson\n\
400377,M. Hamilton\n\
500412,R. Franklin\n";

fn write_inputs(dir: &TempDir) -> (PathBuf, PathBuf) {
    let applicants = dir.path().join("applicants.csv");
    let reviewers = dir.path().join("reviewers.csv");
    fs::write(&applicants, APPLICANTS).expect("write applicants");
    fs::write(&reviewers, REVIEWERS).expect("write reviewers");
    (applicants, reviewers)
}

fn config(mode: PoolMode) -> AllocationConfig {
    AllocationConfig {
        mode,
        reviewers_per_application: 2,
        minimum_per_reviewer: 1,
        require_preferred: mode == PoolMode::Preference,
        allow_fallback: false,
        seed: Some(42),
        max_repair_passes: 50,
    }
}

fn run_to_files(dir: &TempDir, config: AllocationConfig, tag: &str) -> (String, String) {
    let (applicants, reviewers) = write_inputs(dir);
    let input = AllocationInput::from_paths(&applicants, &reviewers).expect("input loads");
    let report = ReviewerAllocator::new(config)
        .run(&input)
        .expect("allocation succeeds");

    let assignments = dir.path().join(format!("{tag}_allocation.csv"));
    let counts = dir.path().join(format!("{tag}_counts.csv"));
    write_report_files(&report, &assignments, &counts).expect("tables written");

    (
        fs::read_to_string(assignments).expect("read assignments"),
        fs::read_to_string(counts).expect("read counts"),
    )
}

#[test]
fn exclusion_run_writes_conflict_free_tables() {
    let dir = TempDir::new().expect("tempdir");
    let (assignments, counts) = run_to_files(&dir, config(PoolMode::Exclusion), "exclusion");

    let mut rows = assignments.lines();
    assert_eq!(
        rows.next(),
        Some("Application ID,Assigned Reviewer 1,Assigned Reviewer 2,Excluded Count,Eligible Pool Size,Under Filled,Used Fallback")
    );

    let conflicts: [&[&str]; 4] = [
        &["138590", "200114"],
        &["138590"],
        &["300201", "200114"],
        &[],
    ];
    for (row, excluded) in rows.zip(conflicts) {
        let cells: Vec<&str> = row.split(',').collect();
        assert_eq!(cells.len(), 7);
        assert!(cells[1..3].iter().all(|cell| !cell.is_empty()));
        for assigned in &cells[1..3] {
            assert!(!excluded.contains(assigned), "{row} assigns an excluded reviewer");
        }
        assert_eq!(cells[3], excluded.len().to_string());
    }

    assert!(counts.starts_with("Reviewer ID,Assigned Count\n"));
    assert_eq!(counts.lines().count(), 6);
}

#[test]
fn preference_run_reports_empty_pools_as_under_filled() {
    let dir = TempDir::new().expect("tempdir");
    let (assignments, _) = run_to_files(&dir, config(PoolMode::Preference), "preference");

    let last = assignments.lines().last().expect("rows");
    assert_eq!(last, "CASDAR-04,,,0,0,True,False");

    let second = assignments.lines().nth(2).expect("second application");
    assert_eq!(second, "CASDAR-02,138590,,1,1,True,False");
}

#[test]
fn identical_seeds_produce_identical_tables() {
    for mode in [PoolMode::Exclusion, PoolMode::Preference] {
        let first_dir = TempDir::new().expect("tempdir");
        let second_dir = TempDir::new().expect("tempdir");

        let first = run_to_files(&first_dir, config(mode), "run");
        let second = run_to_files(&second_dir, config(mode), "run");

        assert_eq!(first, second, "{mode} mode is not reproducible");
    }
}

#[test]
fn missing_application_id_column_aborts() {
    let dir = TempDir::new().expect("tempdir");
    let applicants = dir.path().join("applicants.csv");
    let reviewers = dir.path().join("reviewers.csv");
    fs::write(&applicants, "Id,Reviewer 1\nA,1\n").expect("write applicants");
    fs::write(&reviewers, REVIEWERS).expect("write reviewers");

    match AllocationInput::from_paths(&applicants, &reviewers) {
        Err(AllocationError::MissingColumn { column }) => assert_eq!(column, "Application ID"),
        other => panic!("expected missing column error, got {other:?}"),
    }
}

#[test]
fn reviewers_without_ids_abort_the_run() {
    let dir = TempDir::new().expect("tempdir");
    let applicants = dir.path().join("applicants.csv");
    let reviewers = dir.path().join("reviewers.csv");
    fs::write(&applicants, APPLICANTS).expect("write applicants");
    fs::write(&reviewers, "Reviewer ID\nTBC\n").expect("write reviewers");

    let input = AllocationInput::from_paths(&applicants, &reviewers).expect("tables parse");
    let error = ReviewerAllocator::new(config(PoolMode::Exclusion))
        .run(&input)
        .expect_err("empty universe is fatal");
    assert!(matches!(error, AllocationError::EmptyReviewerUniverse));
}

#[test]
fn missing_input_file_propagates_io_error() {
    let error = AllocationInput::from_paths("./no-such-applicants.csv", "./no-such-reviewers.csv")
        .expect_err("expected io error");

    match error {
        AllocationError::Io(_) => {}
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn minimum_repair_reaches_every_pooled_reviewer() {
    let dir = TempDir::new().expect("tempdir");
    let (applicants, reviewers) = write_inputs(&dir);
    let input = AllocationInput::from_paths(&applicants, &reviewers).expect("input loads");

    let report = ReviewerAllocator::new(AllocationConfig {
        minimum_per_reviewer: 2,
        ..config(PoolMode::Exclusion)
    })
    .run(&input)
    .expect("allocation succeeds");

    // 5 reviewers x 2 > 4 applications x 2 slots, so k grows to 3.
    assert_eq!(report.capacity.effective, 3);
    assert!(report.below_minimum.is_empty());
    assert_eq!(report.meeting_minimum(), 5);
    assert!(report.load_of(ReviewerId(500412)) >= 2);
}
