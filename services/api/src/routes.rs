use crate::infra::AppState;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use wam_tracker::error::AppError;
use wam_tracker::grades::{
    gradebook_router, import_subject_drafts, share_caption, share_url, GradebookService,
    SemesterFilter, Subject, SubjectRepository,
};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ShareQuery {
    #[serde(default)]
    pub(crate) semester: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ShareResponse {
    pub(crate) semester: String,
    pub(crate) wam: f64,
    pub(crate) url: String,
    pub(crate) caption: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ImportResponse {
    pub(crate) imported: usize,
    pub(crate) subjects: Vec<Subject>,
}

pub(crate) fn with_gradebook_routes<R>(service: Arc<GradebookService<R>>) -> Router
where
    R: SubjectRepository + 'static,
{
    let service_routes = Router::new()
        .route("/api/v1/import", post(import_endpoint::<R>))
        .route("/api/v1/wam/share", get(share_endpoint::<R>))
        .with_state(service.clone());

    gradebook_router(service)
        .merge(service_routes)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Accepts a CSV grade sheet as the raw request body.
pub(crate) async fn import_endpoint<R>(
    State(service): State<Arc<GradebookService<R>>>,
    body: String,
) -> Result<(StatusCode, Json<ImportResponse>), AppError>
where
    R: SubjectRepository + 'static,
{
    let drafts = import_subject_drafts(body.as_bytes())?;
    let subjects = service.import(drafts)?;

    Ok((
        StatusCode::CREATED,
        Json(ImportResponse {
            imported: subjects.len(),
            subjects,
        }),
    ))
}

pub(crate) async fn share_endpoint<R>(
    State(service): State<Arc<GradebookService<R>>>,
    Extension(state): Extension<AppState>,
    Query(query): Query<ShareQuery>,
) -> Result<Json<ShareResponse>, AppError>
where
    R: SubjectRepository + 'static,
{
    let filter = query
        .semester
        .as_deref()
        .map(SemesterFilter::parse)
        .unwrap_or_default();
    let summary = service.wam_summary(&filter)?;

    Ok(Json(ShareResponse {
        url: share_url(&state.share_base_url, summary.wam),
        caption: share_caption(summary.wam),
        semester: summary.semester,
        wam: summary.wam,
    }))
}
