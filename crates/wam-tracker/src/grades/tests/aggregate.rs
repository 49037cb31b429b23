use super::common::*;
use crate::grades::aggregate::{aggregate_breakdown, compute_aggregate, current_percent, MarksTally};

#[test]
fn empty_collection_yields_zero() {
    assert_eq!(compute_aggregate(&[]), 0.0);
}

#[test]
fn all_excluded_subjects_yield_zero() {
    let subjects = vec![
        excluded(subject(12.0, vec![assessment(100.0, Some(90.0))])),
        excluded(subject(6.0, vec![assessment(50.0, Some(10.0))])),
    ];
    assert_eq!(compute_aggregate(&subjects), 0.0);
}

#[test]
fn weights_subject_percentages_by_credit() {
    let subjects = vec![
        // 80%
        subject(12.0, vec![assessment(40.0, Some(30.0)), assessment(60.0, Some(50.0))]),
        // 50%
        subject(6.0, vec![assessment(20.0, Some(10.0))]),
    ];
    assert_close(compute_aggregate(&subjects), (80.0 * 12.0 + 50.0 * 6.0) / 18.0);
}

#[test]
fn ungraded_assessments_count_as_zero() {
    let subjects = vec![subject(
        12.0,
        vec![assessment(50.0, Some(50.0)), assessment(50.0, None)],
    )];
    assert_close(compute_aggregate(&subjects), 50.0);
}

#[test]
fn subjects_without_assessments_are_skipped() {
    let subjects = vec![
        subject(12.0, vec![assessment(100.0, Some(70.0))]),
        subject(24.0, Vec::new()),
    ];
    assert_close(compute_aggregate(&subjects), 70.0);
}

#[test]
fn zero_full_marks_subject_is_skipped() {
    let scored = subject(12.0, vec![assessment(100.0, Some(64.0))]);
    let degenerate = subject(12.0, vec![assessment(0.0, None)]);

    let with = compute_aggregate(&[scored.clone(), degenerate.clone()]);
    let without = compute_aggregate(&[scored]);

    assert!(with.is_finite());
    assert_close(with, without);
    assert_eq!(compute_aggregate(&[degenerate]), 0.0);
}

#[test]
fn zero_credit_subject_carries_no_weight() {
    let subjects = vec![
        subject(12.0, vec![assessment(100.0, Some(90.0))]),
        subject(0.0, vec![assessment(100.0, Some(10.0))]),
    ];
    assert_close(compute_aggregate(&subjects), 90.0);
}

#[test]
fn single_subject_matches_its_current_percent() {
    let only = subject(3.0, vec![assessment(30.0, Some(21.0)), assessment(70.0, None)]);
    assert_close(compute_aggregate(&[only.clone()]), current_percent(&only));
}

#[test]
fn breakdown_lists_contributing_subjects_only() {
    let counted = subject(12.0, vec![assessment(10.0, Some(5.0))]);
    let skipped = excluded(subject(12.0, vec![assessment(10.0, Some(10.0))]));
    let breakdown = aggregate_breakdown(&[counted.clone(), skipped]);

    assert_eq!(breakdown.contributions.len(), 1);
    assert_eq!(breakdown.contributions[0].subject_id, counted.id);
    assert_close(breakdown.total_credit, 12.0);
    assert_close(breakdown.wam, 50.0);
}

#[test]
fn tally_percent_is_none_without_full_marks() {
    assert_eq!(MarksTally::default().percent(), None);
    let tally = MarksTally::of(&[assessment(0.0, Some(0.0))]);
    assert_eq!(tally.percent(), None);
}
