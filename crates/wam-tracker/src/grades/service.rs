use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use super::domain::{Assessment, AssessmentId, Subject, SubjectId};
use super::edit::{
    validate_subjects, AssessmentDraft, AssessmentPatch, SubjectDraft, SubjectPatch,
};
use super::goal::{GoalEvaluation, GoalTarget, RemainingPolicy};
use super::input::InputError;
use super::report::WamSummary;
use super::repository::{RepositoryError, SubjectRepository};
use super::semester::{filter_subjects, SemesterFilter};
use super::store::{StoreError, SubjectStore};

/// Service composing the subject store with its persistence backend.
///
/// Every mutation is validated, applied to the store and then written back as a whole
/// collection. Reads hand out owned snapshots.
pub struct GradebookService<R> {
    store: Mutex<SubjectStore>,
    repository: Arc<R>,
    policy: RemainingPolicy,
}

impl<R> GradebookService<R>
where
    R: SubjectRepository + 'static,
{
    /// Hydrate from the repository. Unparsable storage is discarded with a warning.
    pub fn new(repository: Arc<R>) -> Result<Self, ServiceError> {
        let subjects = match repository.load() {
            Ok(subjects) => subjects,
            Err(err @ RepositoryError::Corrupt { .. }) => {
                warn!(error = %err, "discarding unreadable subject storage");
                Vec::new()
            }
            Err(err) => return Err(err.into()),
        };
        info!(subjects = subjects.len(), "gradebook hydrated");

        Ok(Self {
            store: Mutex::new(SubjectStore::with_subjects(subjects)),
            repository,
            policy: RemainingPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: RemainingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RemainingPolicy {
        self.policy
    }

    pub fn subjects(&self, filter: &SemesterFilter) -> Result<Vec<Subject>, ServiceError> {
        let store = self.lock()?;
        Ok(filter_subjects(store.subjects(), filter))
    }

    pub fn subject(&self, id: &SubjectId) -> Result<Subject, ServiceError> {
        let store = self.lock()?;
        Ok(store.get(id)?.clone())
    }

    /// Replace the whole collection. Nothing changes unless every record validates.
    pub fn replace_all(&self, subjects: Vec<Subject>) -> Result<(), ServiceError> {
        validate_subjects(&subjects)?;
        let mut store = self.lock()?;
        store.replace_all(subjects);
        self.persist(&store)?;
        info!(subjects = store.len(), "subject collection replaced");
        Ok(())
    }

    pub fn add_subject(&self, draft: SubjectDraft) -> Result<Subject, ServiceError> {
        draft.validate()?;
        let mut store = self.lock()?;
        let subject = store.add_subject(draft);
        self.persist(&store)?;
        info!(subject_id = %subject.id, name = %subject.name, "subject added");
        Ok(subject)
    }

    /// Add every draft in order, persisting once at the end.
    pub fn import(&self, drafts: Vec<SubjectDraft>) -> Result<Vec<Subject>, ServiceError> {
        drafts.iter().try_for_each(SubjectDraft::validate)?;
        let mut store = self.lock()?;
        let added: Vec<Subject> = drafts
            .into_iter()
            .map(|draft| store.add_subject(draft))
            .collect();
        self.persist(&store)?;
        info!(subjects = added.len(), "subjects imported");
        Ok(added)
    }

    pub fn update_subject(
        &self,
        id: &SubjectId,
        patch: SubjectPatch,
    ) -> Result<Subject, ServiceError> {
        patch.validate()?;
        let mut store = self.lock()?;
        let subject = store.update_subject(id, &patch)?;
        self.persist(&store)?;
        info!(subject_id = %id, "subject updated");
        Ok(subject)
    }

    pub fn delete_subject(&self, id: &SubjectId) -> Result<Subject, ServiceError> {
        let mut store = self.lock()?;
        let removed = store.delete_subject(id)?;
        self.persist(&store)?;
        info!(
            subject_id = %id,
            assessments = removed.assessments.len(),
            "subject deleted"
        );
        Ok(removed)
    }

    pub fn add_assessment(
        &self,
        subject_id: &SubjectId,
        draft: AssessmentDraft,
    ) -> Result<Assessment, ServiceError> {
        draft.validate()?;
        let mut store = self.lock()?;
        let assessment = store.add_assessment(subject_id, draft)?;
        self.persist(&store)?;
        info!(%subject_id, assessment_id = %assessment.id, "assessment added");
        Ok(assessment)
    }

    pub fn update_assessment(
        &self,
        subject_id: &SubjectId,
        assessment_id: &AssessmentId,
        patch: AssessmentPatch,
    ) -> Result<Assessment, ServiceError> {
        let mut store = self.lock()?;
        patch.validate_against(store.assessment(subject_id, assessment_id)?)?;
        let assessment = store.update_assessment(subject_id, assessment_id, &patch)?;
        self.persist(&store)?;
        info!(%subject_id, %assessment_id, "assessment updated");
        Ok(assessment)
    }

    pub fn delete_assessment(
        &self,
        subject_id: &SubjectId,
        assessment_id: &AssessmentId,
    ) -> Result<Assessment, ServiceError> {
        let mut store = self.lock()?;
        let removed = store.delete_assessment(subject_id, assessment_id)?;
        self.persist(&store)?;
        info!(%subject_id, %assessment_id, "assessment deleted");
        Ok(removed)
    }

    pub fn wam_summary(&self, filter: &SemesterFilter) -> Result<WamSummary, ServiceError> {
        let snapshot = self.lock()?.snapshot();
        let summary = WamSummary::build(&snapshot, filter);
        debug!(semester = %summary.semester, wam = summary.wam, "wam computed");
        Ok(summary)
    }

    pub fn evaluate_goal(
        &self,
        subject_id: &SubjectId,
        target: GoalTarget,
    ) -> Result<GoalEvaluation, ServiceError> {
        let subject = self.subject(subject_id)?;
        let evaluation = GoalEvaluation::evaluate(&subject, target, self.policy);
        debug!(
            %subject_id,
            target = evaluation.target_percent,
            status = evaluation.outcome.status().label(),
            "goal projected"
        );
        Ok(evaluation)
    }

    fn lock(&self) -> Result<MutexGuard<'_, SubjectStore>, ServiceError> {
        self.store.lock().map_err(|_| {
            RepositoryError::Unavailable("subject store mutex poisoned".to_string()).into()
        })
    }

    fn persist(&self, store: &SubjectStore) -> Result<(), ServiceError> {
        self.repository.save(store.subjects())?;
        Ok(())
    }
}

/// Error raised by the gradebook service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Invalid(#[from] InputError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
