use super::domain::{Assessment, AssessmentId, Subject, SubjectId};
use super::edit::{AssessmentDraft, AssessmentPatch, SubjectDraft, SubjectPatch};

/// Error raised when an edit targets a record that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("subject {0} not found")]
    SubjectNotFound(SubjectId),
    #[error("assessment {assessment_id} not found in subject {subject_id}")]
    AssessmentNotFound {
        subject_id: SubjectId,
        assessment_id: AssessmentId,
    },
}

/// Ordered, in-memory subject collection.
///
/// Callers read through [`SubjectStore::snapshot`], which hands out an owned copy so the
/// aggregation functions never observe the store mid-edit.
#[derive(Debug, Clone, Default)]
pub struct SubjectStore {
    subjects: Vec<Subject>,
    next_subject: u64,
    next_assessment: u64,
}

impl SubjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subjects(subjects: Vec<Subject>) -> Self {
        let mut store = Self::default();
        store.replace_all(subjects);
        store
    }

    pub fn snapshot(&self) -> Vec<Subject> {
        self.subjects.clone()
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn get(&self, id: &SubjectId) -> Result<&Subject, StoreError> {
        self.subjects
            .iter()
            .find(|subject| &subject.id == id)
            .ok_or_else(|| StoreError::SubjectNotFound(id.clone()))
    }

    /// Swap in a whole collection, e.g. after hydrating from storage.
    pub fn replace_all(&mut self, subjects: Vec<Subject>) {
        self.subjects = subjects;
    }

    pub fn add_subject(&mut self, draft: SubjectDraft) -> Subject {
        let subject_id = self.next_subject_id();
        let subject = draft.into_subject(subject_id, || self.next_assessment_id());
        self.subjects.push(subject.clone());
        subject
    }

    pub fn update_subject(
        &mut self,
        id: &SubjectId,
        patch: &SubjectPatch,
    ) -> Result<Subject, StoreError> {
        let subject = self.subject_mut(id)?;
        patch.apply(subject);
        Ok(subject.clone())
    }

    /// Remove a subject together with all of its assessments.
    pub fn delete_subject(&mut self, id: &SubjectId) -> Result<Subject, StoreError> {
        let index = self
            .subjects
            .iter()
            .position(|subject| &subject.id == id)
            .ok_or_else(|| StoreError::SubjectNotFound(id.clone()))?;
        Ok(self.subjects.remove(index))
    }

    pub fn add_assessment(
        &mut self,
        subject_id: &SubjectId,
        draft: AssessmentDraft,
    ) -> Result<Assessment, StoreError> {
        // Resolve the subject first so a failed add does not burn an identifier.
        self.get(subject_id)?;
        let assessment = draft.into_assessment(self.next_assessment_id());
        self.subject_mut(subject_id)?
            .assessments
            .push(assessment.clone());
        Ok(assessment)
    }

    pub fn update_assessment(
        &mut self,
        subject_id: &SubjectId,
        assessment_id: &AssessmentId,
        patch: &AssessmentPatch,
    ) -> Result<Assessment, StoreError> {
        let assessment = self.assessment_mut(subject_id, assessment_id)?;
        patch.apply(assessment);
        Ok(assessment.clone())
    }

    pub fn delete_assessment(
        &mut self,
        subject_id: &SubjectId,
        assessment_id: &AssessmentId,
    ) -> Result<Assessment, StoreError> {
        let subject = self.subject_mut(subject_id)?;
        let index = subject
            .assessments
            .iter()
            .position(|assessment| &assessment.id == assessment_id)
            .ok_or_else(|| StoreError::AssessmentNotFound {
                subject_id: subject_id.clone(),
                assessment_id: assessment_id.clone(),
            })?;
        Ok(subject.assessments.remove(index))
    }

    pub fn assessment(
        &self,
        subject_id: &SubjectId,
        assessment_id: &AssessmentId,
    ) -> Result<&Assessment, StoreError> {
        self.get(subject_id)?
            .assessment(assessment_id)
            .ok_or_else(|| StoreError::AssessmentNotFound {
                subject_id: subject_id.clone(),
                assessment_id: assessment_id.clone(),
            })
    }

    fn subject_mut(&mut self, id: &SubjectId) -> Result<&mut Subject, StoreError> {
        self.subjects
            .iter_mut()
            .find(|subject| &subject.id == id)
            .ok_or_else(|| StoreError::SubjectNotFound(id.clone()))
    }

    fn assessment_mut(
        &mut self,
        subject_id: &SubjectId,
        assessment_id: &AssessmentId,
    ) -> Result<&mut Assessment, StoreError> {
        self.subject_mut(subject_id)?
            .assessment_mut(assessment_id)
            .ok_or_else(|| StoreError::AssessmentNotFound {
                subject_id: subject_id.clone(),
                assessment_id: assessment_id.clone(),
            })
    }

    fn next_subject_id(&mut self) -> SubjectId {
        loop {
            self.next_subject += 1;
            let candidate = SubjectId(format!("subj-{:06}", self.next_subject));
            if self.subjects.iter().all(|subject| subject.id != candidate) {
                return candidate;
            }
        }
    }

    fn next_assessment_id(&mut self) -> AssessmentId {
        loop {
            self.next_assessment += 1;
            let candidate = AssessmentId(format!("asmt-{:06}", self.next_assessment));
            let taken = self
                .subjects
                .iter()
                .flat_map(|subject| subject.assessments.iter())
                .any(|assessment| assessment.id == candidate);
            if !taken {
                return candidate;
            }
        }
    }
}
