use super::common::*;
use crate::workflows::allocation::repair::{required_reviewers, top_up_to_minimum, RepairSettings};

#[test]
fn fills_empty_slots_in_least_filled_applications_first() {
    let pools = preference_pools(&[&[1, 2, 3], &[1, 2, 3], &[1, 2, 3]]);
    let mut matrix = seeded_matrix(&pools, 2, &[&[2, 3], &[2], &[]]);

    let outcome = top_up_to_minimum(&mut matrix, &pools, &rids(&[1]), &settings(1, false));

    assert!(outcome.converged);
    assert_eq!(outcome.placements, 1);
    assert!(matrix.row(2).holds(rid(1)), "empty application is preferred");
    assert!(outcome.displacements.is_empty());
}

#[test]
fn displaces_the_most_loaded_assignee_above_minimum() {
    let pools = preference_pools(&[&[1, 2, 3], &[1, 2, 3], &[1, 2, 3]]);
    let mut matrix = seeded_matrix(&pools, 2, &[&[3, 1], &[1, 3], &[1, 3]]);

    let outcome = top_up_to_minimum(&mut matrix, &pools, &rids(&[1, 2, 3]), &settings(1, false));

    assert_eq!(matrix.load(rid(2)), 1);
    assert_eq!(outcome.displacements.len(), 1);
    let displacement = &outcome.displacements[0];
    assert_eq!(displacement.application_id, matrix.row(0).application_id);
    assert_eq!(displacement.inserted, rid(2));
    // Both assignees carry load 3; the earlier slot wins the tie.
    assert_eq!(displacement.evicted, rid(3));
    assert_eq!(displacement.evicted_load_before, 3);
    assert_eq!(displacement.evicted_load_after, 2);
    assert_eq!(matrix.row(0).slots(), &[Some(rid(2)), Some(rid(1))]);
}

#[test]
fn never_evicts_reviewers_at_the_minimum() {
    let pools = preference_pools(&[&[1, 2]]);
    let mut matrix = seeded_matrix(&pools, 1, &[&[1]]);

    let outcome = top_up_to_minimum(&mut matrix, &pools, &rids(&[1, 2]), &settings(1, false));

    assert!(outcome.converged);
    assert!(outcome.displacements.is_empty());
    assert_eq!(matrix.load(rid(1)), 1);
    assert_eq!(matrix.load(rid(2)), 0);
}

#[test]
fn fallback_places_outside_pools_and_flags_the_application() {
    let pools = preference_pools(&[&[1], &[2]]);
    let mut matrix = seeded_matrix(&pools, 2, &[&[1], &[2]]);

    let without = top_up_to_minimum(
        &mut matrix.clone(),
        &pools,
        &rids(&[1, 2]),
        &settings(2, false),
    );
    assert_eq!(without.placements, 0);

    let outcome = top_up_to_minimum(&mut matrix, &pools, &rids(&[1, 2]), &settings(2, true));

    assert_eq!(outcome.fallback_placements, 2);
    assert_eq!(matrix.load(rid(1)), 2);
    assert_eq!(matrix.load(rid(2)), 2);
    assert!(matrix.rows().iter().all(|row| row.used_fallback));
}

#[test]
fn fallback_never_crosses_an_exclusion() {
    let pools = exclusion_pools(&[&[1], &[1]], &[1, 2]);
    let mut matrix = seeded_matrix(&pools, 1, &[&[], &[]]);

    let outcome = top_up_to_minimum(&mut matrix, &pools, &rids(&[1, 2]), &settings(1, true));

    assert_eq!(matrix.load(rid(1)), 0);
    assert_eq!(matrix.load(rid(2)), 1);
    assert_eq!(outcome.fallback_placements, 0);
    assert!(matrix.verify(&pools).is_ok());
}

#[test]
fn pass_limit_reports_best_effort_without_failing() {
    let pools = preference_pools(&[&[1, 2]]);
    let required = rids(&[1, 2]);

    let mut capped = seeded_matrix(&pools, 1, &[&[]]);
    let limited = RepairSettings {
        max_passes: 1,
        ..settings(1, false)
    };
    let outcome = top_up_to_minimum(&mut capped, &pools, &required, &limited);
    assert_eq!(outcome.passes, 1);
    assert!(!outcome.converged);

    let mut open = seeded_matrix(&pools, 1, &[&[]]);
    let outcome = top_up_to_minimum(&mut open, &pools, &required, &settings(1, false));
    assert_eq!(outcome.passes, 2);
    assert!(outcome.converged);
    assert_eq!(capped, open);
}

#[test]
fn zero_minimum_skips_repair() {
    let pools = preference_pools(&[&[1, 2]]);
    let mut matrix = seeded_matrix(&pools, 1, &[&[]]);

    let outcome = top_up_to_minimum(&mut matrix, &pools, &rids(&[1, 2]), &settings(0, true));

    assert_eq!(outcome.passes, 0);
    assert!(outcome.converged);
    assert_eq!(matrix.row(0).fill(), 0);
}

#[test]
fn required_reviewers_follow_require_preferred_flag() {
    let pools = preference_pools(&[&[9, 4], &[4, 2]]);
    let universe = universe(&[5, 4, 1]);

    assert_eq!(required_reviewers(true, &universe, &pools), rids(&[2, 4, 9]));
    assert_eq!(required_reviewers(false, &universe, &pools), rids(&[5, 4, 1]));
}
