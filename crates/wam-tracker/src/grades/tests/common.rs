use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::Value;

use crate::grades::domain::{Assessment, AssessmentId, Subject, SubjectId};
use crate::grades::repository::{InMemorySubjectRepository, RepositoryError, SubjectRepository};
use crate::grades::service::GradebookService;

static FIXTURE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn fixture_id(prefix: &str) -> String {
    let id = FIXTURE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-fixture-{id}")
}

/// Assessment with the given marks; `None` leaves it ungraded.
pub(super) fn assessment(full_marks: f64, obtained_marks: Option<f64>) -> Assessment {
    Assessment {
        id: AssessmentId(fixture_id("asmt")),
        name: "Assessment".to_string(),
        weight: 0.0,
        full_marks,
        minimum_pass_requirement: full_marks / 2.0,
        obtained_marks,
    }
}

pub(super) fn subject(credit: f64, assessments: Vec<Assessment>) -> Subject {
    Subject {
        id: SubjectId(fixture_id("subj")),
        name: "Subject".to_string(),
        passing_grade: 50.0,
        bg_color: None,
        credit,
        included: true,
        semester: "2025 First Semester".to_string(),
        assessments,
    }
}

pub(super) fn excluded(mut subject: Subject) -> Subject {
    subject.included = false;
    subject
}

pub(super) fn in_semester(mut subject: Subject, semester: &str) -> Subject {
    subject.semester = semester.to_string();
    subject
}

/// 200 full marks, 100 obtained, with 100 marks still ungraded.
pub(super) fn half_way_subject() -> Subject {
    subject(
        12.0,
        vec![
            assessment(60.0, Some(60.0)),
            assessment(40.0, Some(40.0)),
            assessment(100.0, None),
        ],
    )
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn memory_service(
    subjects: Vec<Subject>,
) -> Arc<GradebookService<InMemorySubjectRepository>> {
    let repository = Arc::new(InMemorySubjectRepository::with_subjects(subjects));
    Arc::new(GradebookService::new(repository).expect("service hydrates"))
}

/// Repository that records every save and can be told to fail.
#[derive(Default)]
pub(super) struct RecordingRepository {
    pub(super) initial: Vec<Subject>,
    pub(super) saves: Mutex<Vec<Vec<Subject>>>,
    pub(super) fail_saves: bool,
}

impl RecordingRepository {
    pub(super) fn save_count(&self) -> usize {
        self.saves.lock().expect("saves mutex poisoned").len()
    }

    pub(super) fn last_saved(&self) -> Option<Vec<Subject>> {
        self.saves.lock().expect("saves mutex poisoned").last().cloned()
    }
}

impl SubjectRepository for RecordingRepository {
    fn load(&self) -> Result<Vec<Subject>, RepositoryError> {
        Ok(self.initial.clone())
    }

    fn save(&self, subjects: &[Subject]) -> Result<(), RepositoryError> {
        if self.fail_saves {
            return Err(RepositoryError::Unavailable("disk full".to_string()));
        }
        self.saves
            .lock()
            .expect("saves mutex poisoned")
            .push(subjects.to_vec());
        Ok(())
    }
}

pub(super) fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub(super) fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub(super) async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is json")
    };
    (status, value)
}
