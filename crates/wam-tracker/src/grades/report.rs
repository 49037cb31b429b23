use serde::Serialize;

use super::aggregate::{aggregate_breakdown, current_percent};
use super::domain::{Subject, SubjectId};
use super::semester::{filter_subjects, SemesterFilter};

/// Per-subject line shown in listings and WAM summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectSummaryView {
    pub id: SubjectId,
    pub name: String,
    pub semester: String,
    pub credit: f64,
    pub included: bool,
    pub assessment_count: usize,
    pub graded_count: usize,
    pub current_percent: f64,
    pub passing_grade: f64,
    pub passing: bool,
    pub counts_toward_wam: bool,
}

impl SubjectSummaryView {
    pub fn from_subject(subject: &Subject) -> Self {
        let current = current_percent(subject);
        Self {
            id: subject.id.clone(),
            name: subject.name.clone(),
            semester: subject.semester.clone(),
            credit: subject.credit,
            included: subject.included,
            assessment_count: subject.assessments.len(),
            graded_count: subject
                .assessments
                .iter()
                .filter(|assessment| assessment.is_graded())
                .count(),
            current_percent: current,
            passing_grade: subject.passing_grade,
            passing: current >= subject.passing_grade,
            counts_toward_wam: subject.counts_toward_wam(),
        }
    }
}

/// WAM for a semester selection plus the subjects behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WamSummary {
    pub semester: String,
    pub wam: f64,
    pub total_credit: f64,
    pub subjects: Vec<SubjectSummaryView>,
}

impl WamSummary {
    pub fn build(subjects: &[Subject], filter: &SemesterFilter) -> Self {
        let selected = filter_subjects(subjects, filter);
        let breakdown = aggregate_breakdown(&selected);
        Self {
            semester: filter.label().to_string(),
            wam: breakdown.wam,
            total_credit: breakdown.total_credit,
            subjects: selected
                .iter()
                .map(SubjectSummaryView::from_subject)
                .collect(),
        }
    }
}
