//! Property-based checks for WAM aggregation and goal projection.

use proptest::prelude::*;
use wam_tracker::grades::{
    compute_aggregate, current_percent, project_goal, Assessment, AssessmentId, GoalOutcome,
    Subject, SubjectId,
};

prop_compose! {
    fn arb_assessment()(full in 1u32..200, graded in any::<bool>(), share in 0.0f64..=1.0)
        -> Assessment {
        let full_marks = f64::from(full);
        Assessment {
            id: AssessmentId(String::new()),
            name: "Assessment".to_string(),
            weight: 0.0,
            full_marks,
            minimum_pass_requirement: full_marks / 2.0,
            obtained_marks: graded.then(|| (full_marks * share).round()),
        }
    }
}

prop_compose! {
    fn arb_subject()(
        credit in 0u32..=24,
        included in any::<bool>(),
        assessments in prop::collection::vec(arb_assessment(), 0..5),
    ) -> Subject {
        Subject {
            id: SubjectId(String::new()),
            name: "Subject".to_string(),
            passing_grade: 50.0,
            bg_color: None,
            credit: f64::from(credit),
            included,
            semester: String::new(),
            assessments,
        }
    }
}

fn numbered(mut subjects: Vec<Subject>) -> Vec<Subject> {
    for (index, subject) in subjects.iter_mut().enumerate() {
        subject.id = SubjectId(format!("subj-{index:06}"));
        for (position, assessment) in subject.assessments.iter_mut().enumerate() {
            assessment.id = AssessmentId(format!("asmt-{index:06}-{position}"));
        }
    }
    subjects
}

proptest! {
    /// Aggregation does not depend on subject order.
    #[test]
    fn prop_order_invariant(subjects in prop::collection::vec(arb_subject(), 0..8)) {
        let forward = compute_aggregate(&subjects);
        let mut reversed = subjects.clone();
        reversed.reverse();
        prop_assert!((forward - compute_aggregate(&reversed)).abs() < 1e-9);
    }

    /// WAM stays within the percentage scale.
    #[test]
    fn prop_wam_is_a_percentage(subjects in prop::collection::vec(arb_subject(), 0..8)) {
        let wam = compute_aggregate(&subjects);
        prop_assert!((0.0..=100.0 + 1e-9).contains(&wam), "wam out of range: {}", wam);
    }

    /// A lone included subject with credit aggregates to its own percentage.
    #[test]
    fn prop_single_subject_identity(mut subject in arb_subject()) {
        prop_assume!(subject.credit > 0.0 && !subject.assessments.is_empty());
        subject.included = true;
        let wam = compute_aggregate(std::slice::from_ref(&subject));
        prop_assert!((wam - current_percent(&subject)).abs() < 1e-9);
    }

    /// Subjects without any full marks never move the WAM.
    #[test]
    fn prop_zero_full_marks_subject_is_ignored(
        subjects in prop::collection::vec(arb_subject(), 1..6),
        credit in 1u32..=24,
    ) {
        let before = compute_aggregate(&subjects);
        let mut with_empty = subjects.clone();
        let mut hollow = subjects[0].clone();
        hollow.included = true;
        hollow.credit = f64::from(credit);
        for assessment in &mut hollow.assessments {
            assessment.full_marks = 0.0;
            assessment.minimum_pass_requirement = 0.0;
            assessment.obtained_marks = assessment.obtained_marks.map(|_| 0.0);
        }
        with_empty.push(hollow);
        prop_assert!((before - compute_aggregate(&with_empty)).abs() < 1e-9);
    }

    /// Persisted subjects aggregate identically after reloading.
    #[test]
    fn prop_storage_round_trip_preserves_wam(
        subjects in prop::collection::vec(arb_subject(), 0..6),
    ) {
        let subjects = numbered(subjects);
        let json = serde_json::to_string(&subjects).expect("subjects serialize");
        let reloaded: Vec<Subject> = serde_json::from_str(&json).expect("subjects parse");
        prop_assert_eq!(&reloaded, &subjects);
        prop_assert!((compute_aggregate(&reloaded) - compute_aggregate(&subjects)).abs() < 1e-9);
    }

    /// Any achievable projection asks for a positive average no higher than full marks.
    #[test]
    fn prop_required_average_is_attainable(subject in arb_subject(), target in 0.0f64..=100.0) {
        if let GoalOutcome::Achievable { required_average } = project_goal(&subject, target) {
            prop_assert!(required_average > 0.0);
            prop_assert!(required_average <= 100.0 + 1e-9);
        }
    }
}
