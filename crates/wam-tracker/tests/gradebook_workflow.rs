use std::sync::Arc;

use tempfile::tempdir;
use wam_tracker::grades::{
    compute_aggregate, import_subject_drafts, share_url, AssessmentPatch, GoalStatus, GoalTarget,
    GradebookService, JsonFileRepository, SemesterFilter, SubjectDraft, SubjectRepository,
};

const SHEET: &str = "\
Subject,Semester,Credit,Included,Assessment,Weight,Full Marks,Minimum Pass,Obtained Marks
Databases,2025 First Semester,6,yes,Assignment,30,30,15,24
Databases,,,,Final Exam,70,70,35,
Networks,2025 First Semester,12,yes,Lab,40,40,20,30
Networks,,,,Exam,60,60,30,42
Seminar,2025 Second Semester,6,no,Reflection,100,100,50,90
";

#[test]
fn imported_gradebook_survives_a_restart() {
    let dir = tempdir().expect("temp dir");
    let repository = Arc::new(JsonFileRepository::new(dir.path(), "subjects"));

    let service = GradebookService::new(repository.clone()).expect("empty storage hydrates");
    let drafts = import_subject_drafts(SHEET.as_bytes()).expect("sheet parses");
    let subjects = service.import(drafts).expect("drafts are valid");
    assert_eq!(subjects.len(), 3);

    let summary = service
        .wam_summary(&SemesterFilter::All)
        .expect("summary builds");
    // Databases 24%, Networks 72%; Seminar is excluded.
    let expected = (24.0 * 6.0 + 72.0 * 12.0) / 18.0;
    assert!((summary.wam - expected).abs() < 1e-9);
    assert_eq!(summary.total_credit, 18.0);

    let restarted = GradebookService::new(repository.clone()).expect("saved storage hydrates");
    let reloaded = restarted
        .subjects(&SemesterFilter::All)
        .expect("listing succeeds");
    assert_eq!(reloaded, subjects);
    assert!((compute_aggregate(&reloaded) - summary.wam).abs() < 1e-9);
}

#[test]
fn partially_filled_records_keep_the_gradebook_intact() {
    let dir = tempdir().expect("temp dir");
    let repository = Arc::new(JsonFileRepository::new(dir.path(), "subjects"));
    let stored = r#"[
  { "id": "subj-000001", "name": "Physics", "passingGrade": "", "credit": "",
    "assessments": [
      { "id": "asmt-000001", "name": "Quiz", "weight": "", "full_marks": "40",
        "minimum_pass_requirement": 20, "obtained_marks": 30 },
      { "id": "asmt-000002", "name": "Report", "obtained_marks": "" }
    ] },
  { "id": "subj-000002", "name": "Chemistry", "credit": 6,
    "assessments": [{ "id": "asmt-000003", "name": "Lab", "obtained_marks": 4 }] }
]"#;
    std::fs::write(repository.path(), stored).expect("write fixture");

    let service = GradebookService::new(repository.clone()).expect("stored subjects hydrate");
    let subjects = service
        .subjects(&SemesterFilter::All)
        .expect("listing succeeds");
    assert_eq!(subjects.len(), 2);
    assert_eq!(subjects[0].credit, 12.0);
    assert_eq!(subjects[0].assessments[1].full_marks, 0.0);
    assert_eq!(subjects[0].assessments[1].obtained_marks, None);
    // Chemistry has no full marks yet, so only Physics (30/40) counts.
    assert!((compute_aggregate(&subjects) - 75.0).abs() < 1e-9);

    service
        .add_subject(SubjectDraft::new("Biology"))
        .expect("valid draft");
    let saved = repository.load().expect("saved storage loads");
    assert_eq!(saved.len(), 3);
    assert_eq!(saved[1].name, "Chemistry");
}

#[test]
fn grading_remaining_work_reaches_the_goal() {
    let dir = tempdir().expect("temp dir");
    let repository = Arc::new(JsonFileRepository::new(dir.path(), "subjects"));
    let service = GradebookService::new(repository.clone()).expect("empty storage hydrates");
    let subjects = service
        .import(import_subject_drafts(SHEET.as_bytes()).expect("sheet parses"))
        .expect("drafts are valid");
    let databases = &subjects[0];

    let evaluation = service
        .evaluate_goal(&databases.id, GoalTarget::HighPass(65.0))
        .expect("subject exists");
    assert_eq!(evaluation.target_percent, 65.0);
    assert_eq!(evaluation.outcome.status(), GoalStatus::Achievable);
    // 65 of 100 needed, 24 held, 41 required from the 70-mark exam.
    let required = evaluation.outcome.value();
    assert!((required - 41.0 / 70.0 * 100.0).abs() < 1e-9);

    let exam = &databases.assessments[1];
    service
        .update_assessment(
            &databases.id,
            &exam.id,
            AssessmentPatch {
                obtained_marks: Some(Some(41.0)),
                ..AssessmentPatch::default()
            },
        )
        .expect("marks within range");

    let after = service
        .evaluate_goal(&databases.id, GoalTarget::HighPass(65.0))
        .expect("subject exists");
    assert_eq!(after.outcome.status(), GoalStatus::AlreadyAchieved);
    assert_eq!(
        after.message(),
        "Congratulations! You have reached your goal. Current WAM: 65.00%"
    );

    let persisted = repository.load().expect("storage readable");
    assert_eq!(persisted[0].assessments[1].obtained_marks, Some(41.0));
}

#[test]
fn semester_filter_narrows_the_share_link() {
    let dir = tempdir().expect("temp dir");
    let repository = Arc::new(JsonFileRepository::new(dir.path(), "subjects"));
    let service = GradebookService::new(repository).expect("empty storage hydrates");
    service
        .import(import_subject_drafts(SHEET.as_bytes()).expect("sheet parses"))
        .expect("drafts are valid");

    let second = service
        .wam_summary(&SemesterFilter::parse("2025 Second Semester"))
        .expect("summary builds");
    // Only the excluded seminar is in that semester.
    assert_eq!(second.wam, 0.0);
    assert_eq!(second.subjects.len(), 1);
    assert!(!second.subjects[0].counts_toward_wam);

    let first = service
        .wam_summary(&SemesterFilter::parse("2025 First Semester"))
        .expect("summary builds");
    assert_eq!(
        share_url("http://localhost:3000/gpa-calculator", first.wam),
        "http://localhost:3000/gpa-calculator?wam=56.00"
    );
}
