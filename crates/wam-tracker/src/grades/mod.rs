//! Gradebook domain: subjects, assessments, WAM aggregation and goal projection.

pub mod aggregate;
pub mod domain;
pub mod edit;
pub mod goal;
pub mod import;
pub mod input;
pub mod report;
pub mod repository;
pub mod router;
pub mod semester;
pub mod service;
pub mod share;
pub mod store;

#[cfg(test)]
mod tests;

pub use aggregate::{
    aggregate_breakdown, compute_aggregate, current_percent, AggregateBreakdown, MarksTally,
    SubjectContribution,
};
pub use domain::{Assessment, AssessmentId, Subject, SubjectId, DEFAULT_CREDIT};
pub use edit::{validate_subjects, AssessmentDraft, AssessmentPatch, SubjectDraft, SubjectPatch};
pub use goal::{
    project_goal, project_goal_with, GoalEvaluation, GoalOutcome, GoalStatus, GoalTarget,
    RemainingPolicy,
};
pub use import::{import_subject_drafts, ImportError};
pub use input::{
    parse_number, parse_optional_number, parse_target_percent, BoundedInput, InputError,
};
pub use report::{SubjectSummaryView, WamSummary};
pub use repository::{
    InMemorySubjectRepository, JsonFileRepository, RepositoryError, SubjectRepository,
};
pub use router::gradebook_router;
pub use semester::{current_semester_options, filter_subjects, semester_options, SemesterFilter};
pub use service::{GradebookService, ServiceError};
pub use share::{share_caption, share_url};
pub use store::{StoreError, SubjectStore};
