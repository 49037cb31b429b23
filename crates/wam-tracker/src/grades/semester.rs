use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use super::domain::Subject;

const ALL_LABEL: &str = "All";

/// Semester grouping used to narrow subject listings and WAM summaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SemesterFilter {
    #[default]
    All,
    Named(String),
}

impl SemesterFilter {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_LABEL) {
            Self::All
        } else {
            Self::Named(trimmed.to_string())
        }
    }

    pub fn matches(&self, subject: &Subject) -> bool {
        match self {
            SemesterFilter::All => true,
            SemesterFilter::Named(name) => subject.semester == *name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SemesterFilter::All => ALL_LABEL,
            SemesterFilter::Named(name) => name,
        }
    }
}

impl From<String> for SemesterFilter {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<SemesterFilter> for String {
    fn from(value: SemesterFilter) -> Self {
        value.label().to_string()
    }
}

/// Subjects in the selected semester, in their stored order.
pub fn filter_subjects(subjects: &[Subject], filter: &SemesterFilter) -> Vec<Subject> {
    subjects
        .iter()
        .filter(|subject| filter.matches(subject))
        .cloned()
        .collect()
}

/// Selectable semesters for `year` and the following year.
pub fn semester_options(year: i32) -> Vec<String> {
    [year, year + 1]
        .into_iter()
        .flat_map(|year| {
            [
                format!("{year} First Semester"),
                format!("{year} Second Semester"),
            ]
        })
        .collect()
}

pub fn current_semester_options() -> Vec<String> {
    semester_options(Local::now().year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grades::edit::SubjectDraft;
    use crate::grades::domain::{AssessmentId, SubjectId};

    fn subject(id: &str, semester: &str) -> Subject {
        let mut draft = SubjectDraft::new(format!("Subject {id}"));
        draft.semester = semester.to_string();
        draft.into_subject(SubjectId(id.to_string()), || {
            AssessmentId("unused".to_string())
        })
    }

    #[test]
    fn parses_all_and_empty_as_unfiltered() {
        assert_eq!(SemesterFilter::parse("All"), SemesterFilter::All);
        assert_eq!(SemesterFilter::parse(""), SemesterFilter::All);
        assert_eq!(
            SemesterFilter::parse(" 2025 First Semester "),
            SemesterFilter::Named("2025 First Semester".to_string())
        );
    }

    #[test]
    fn filter_preserves_order() {
        let subjects = vec![
            subject("a", "2025 First Semester"),
            subject("b", "2025 Second Semester"),
            subject("c", "2025 First Semester"),
        ];
        let filtered = filter_subjects(
            &subjects,
            &SemesterFilter::Named("2025 First Semester".to_string()),
        );
        let ids: Vec<&str> = filtered.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(filter_subjects(&subjects, &SemesterFilter::All).len(), 3);
    }

    #[test]
    fn semester_options_cover_two_years() {
        assert_eq!(
            semester_options(2025),
            vec![
                "2025 First Semester",
                "2025 Second Semester",
                "2026 First Semester",
                "2026 Second Semester",
            ]
        );
    }
}
