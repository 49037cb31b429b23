use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AssessmentId, Subject, SubjectId};
use super::edit::{AssessmentDraft, AssessmentPatch, SubjectDraft, SubjectPatch};
use super::goal::GoalTarget;
use super::input::ensure_range;
use super::report::SubjectSummaryView;
use super::repository::SubjectRepository;
use super::semester::SemesterFilter;
use super::service::{GradebookService, ServiceError};

/// Router builder exposing subject, assessment, WAM and goal endpoints.
pub fn gradebook_router<R>(service: Arc<GradebookService<R>>) -> Router
where
    R: SubjectRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/subjects",
            get(list_handler::<R>)
                .post(create_handler::<R>)
                .put(replace_handler::<R>),
        )
        .route(
            "/api/v1/subjects/:subject_id",
            get(fetch_handler::<R>)
                .patch(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .route(
            "/api/v1/subjects/:subject_id/assessments",
            post(add_assessment_handler::<R>),
        )
        .route(
            "/api/v1/subjects/:subject_id/assessments/:assessment_id",
            patch(update_assessment_handler::<R>).delete(delete_assessment_handler::<R>),
        )
        .route(
            "/api/v1/subjects/:subject_id/goal",
            post(goal_handler::<R>),
        )
        .route("/api/v1/wam", get(wam_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SemesterQuery {
    #[serde(default)]
    semester: Option<String>,
}

impl SemesterQuery {
    fn filter(&self) -> SemesterFilter {
        self.semester
            .as_deref()
            .map(SemesterFilter::parse)
            .unwrap_or_default()
    }
}

/// Goal request body. Either a preset (`{"goal": "low_pass"}`,
/// `{"goal": "high_pass", "percentage": 75}`) or a bare `{"target_percent": 82.5}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum GoalRequest {
    Preset(GoalTarget),
    Target { target_percent: f64 },
}

impl GoalRequest {
    fn into_target(self) -> Result<GoalTarget, ServiceError> {
        let target = match self {
            GoalRequest::Preset(GoalTarget::Custom(percent))
            | GoalRequest::Target {
                target_percent: percent,
            } => GoalTarget::Custom(ensure_range("target", percent, 0.0, 100.0)?),
            GoalRequest::Preset(target) => target,
        };
        Ok(target)
    }
}

#[derive(Debug, serde::Serialize)]
struct SubjectDetailView {
    #[serde(flatten)]
    subject: Subject,
    summary: SubjectSummaryView,
}

impl SubjectDetailView {
    fn new(subject: Subject) -> Self {
        let summary = SubjectSummaryView::from_subject(&subject);
        Self { subject, summary }
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<GradebookService<R>>>,
    Query(query): Query<SemesterQuery>,
) -> Response
where
    R: SubjectRepository + 'static,
{
    match service.subjects(&query.filter()) {
        Ok(subjects) => (StatusCode::OK, Json(subjects)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<GradebookService<R>>>,
    Json(draft): Json<SubjectDraft>,
) -> Response
where
    R: SubjectRepository + 'static,
{
    match service.add_subject(draft) {
        Ok(subject) => {
            (StatusCode::CREATED, Json(SubjectDetailView::new(subject))).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn replace_handler<R>(
    State(service): State<Arc<GradebookService<R>>>,
    Json(subjects): Json<Vec<Subject>>,
) -> Response
where
    R: SubjectRepository + 'static,
{
    let count = subjects.len();
    match service.replace_all(subjects) {
        Ok(()) => (StatusCode::OK, Json(json!({ "subjects": count }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<Arc<GradebookService<R>>>,
    Path(subject_id): Path<String>,
) -> Response
where
    R: SubjectRepository + 'static,
{
    match service.subject(&SubjectId(subject_id)) {
        Ok(subject) => (StatusCode::OK, Json(SubjectDetailView::new(subject))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<GradebookService<R>>>,
    Path(subject_id): Path<String>,
    Json(patch): Json<SubjectPatch>,
) -> Response
where
    R: SubjectRepository + 'static,
{
    match service.update_subject(&SubjectId(subject_id), patch) {
        Ok(subject) => (StatusCode::OK, Json(SubjectDetailView::new(subject))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<GradebookService<R>>>,
    Path(subject_id): Path<String>,
) -> Response
where
    R: SubjectRepository + 'static,
{
    match service.delete_subject(&SubjectId(subject_id)) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_assessment_handler<R>(
    State(service): State<Arc<GradebookService<R>>>,
    Path(subject_id): Path<String>,
    Json(draft): Json<AssessmentDraft>,
) -> Response
where
    R: SubjectRepository + 'static,
{
    match service.add_assessment(&SubjectId(subject_id), draft) {
        Ok(assessment) => (StatusCode::CREATED, Json(assessment)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_assessment_handler<R>(
    State(service): State<Arc<GradebookService<R>>>,
    Path((subject_id, assessment_id)): Path<(String, String)>,
    Json(patch): Json<AssessmentPatch>,
) -> Response
where
    R: SubjectRepository + 'static,
{
    let subject_id = SubjectId(subject_id);
    let assessment_id = AssessmentId(assessment_id);
    match service.update_assessment(&subject_id, &assessment_id, patch) {
        Ok(assessment) => (StatusCode::OK, Json(assessment)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_assessment_handler<R>(
    State(service): State<Arc<GradebookService<R>>>,
    Path((subject_id, assessment_id)): Path<(String, String)>,
) -> Response
where
    R: SubjectRepository + 'static,
{
    let subject_id = SubjectId(subject_id);
    let assessment_id = AssessmentId(assessment_id);
    match service.delete_assessment(&subject_id, &assessment_id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn goal_handler<R>(
    State(service): State<Arc<GradebookService<R>>>,
    Path(subject_id): Path<String>,
    Json(request): Json<GoalRequest>,
) -> Response
where
    R: SubjectRepository + 'static,
{
    let result = request
        .into_target()
        .and_then(|target| service.evaluate_goal(&SubjectId(subject_id), target));

    match result {
        Ok(evaluation) => {
            let payload = json!({
                "subject_id": evaluation.subject_id,
                "target_percent": evaluation.target_percent,
                "current_percent": evaluation.current_percent,
                "outcome": evaluation.outcome,
                "message": evaluation.message(),
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn wam_handler<R>(
    State(service): State<Arc<GradebookService<R>>>,
    Query(query): Query<SemesterQuery>,
) -> Response
where
    R: SubjectRepository + 'static,
{
    match service.wam_summary(&query.filter()) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: ServiceError) -> Response {
    let status = match &err {
        ServiceError::Store(_) => StatusCode::NOT_FOUND,
        ServiceError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!(error = %err, "gradebook request failed");
    }
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
