//! Creation inputs and partial updates for subjects and assessments.
//!
//! Patches are applied field by field: anything left as `None` stays untouched.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{Assessment, AssessmentId, Subject, SubjectId, DEFAULT_CREDIT};
use super::input::{ensure_non_negative, ensure_range, InputError};

/// Fields supplied when adding an assessment; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentDraft {
    pub name: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default = "default_full_marks")]
    pub full_marks: f64,
    #[serde(default = "default_minimum_pass")]
    pub minimum_pass_requirement: f64,
    #[serde(default)]
    pub obtained_marks: Option<f64>,
}

impl AssessmentDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: 0.0,
            full_marks: default_full_marks(),
            minimum_pass_requirement: default_minimum_pass(),
            obtained_marks: None,
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        validate_name("assessment name", &self.name)?;
        validate_marks(
            self.weight,
            self.full_marks,
            self.minimum_pass_requirement,
            self.obtained_marks,
        )
    }

    pub fn into_assessment(self, id: AssessmentId) -> Assessment {
        Assessment {
            id,
            name: self.name,
            weight: self.weight,
            full_marks: self.full_marks,
            minimum_pass_requirement: self.minimum_pass_requirement,
            obtained_marks: self.obtained_marks,
        }
    }
}

/// Fields supplied when adding a subject, optionally with initial assessments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectDraft {
    pub name: String,
    #[serde(rename = "passingGrade", default = "default_passing_grade")]
    pub passing_grade: f64,
    #[serde(rename = "bgColor", default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default = "default_credit")]
    pub credit: f64,
    #[serde(default = "default_included")]
    pub included: bool,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub assessments: Vec<AssessmentDraft>,
}

impl SubjectDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passing_grade: default_passing_grade(),
            bg_color: None,
            credit: DEFAULT_CREDIT,
            included: true,
            semester: String::new(),
            assessments: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        validate_name("subject name", &self.name)?;
        ensure_range("passing grade", self.passing_grade, 0.0, 100.0)?;
        ensure_non_negative("credit", self.credit)?;
        self.assessments.iter().try_for_each(AssessmentDraft::validate)
    }

    /// Build the subject, pairing each draft assessment with an identifier from `ids`.
    pub fn into_subject(
        self,
        id: SubjectId,
        mut ids: impl FnMut() -> AssessmentId,
    ) -> Subject {
        let assessments = self
            .assessments
            .into_iter()
            .map(|draft| draft.into_assessment(ids()))
            .collect();

        Subject {
            id,
            name: self.name,
            passing_grade: self.passing_grade,
            bg_color: self.bg_color,
            credit: self.credit,
            included: self.included,
            semester: self.semester,
            assessments,
        }
    }
}

/// Partial subject edit. Assessments are edited through [`AssessmentPatch`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "passingGrade",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub passing_grade: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
}

impl SubjectPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if let Some(name) = &self.name {
            validate_name("subject name", name)?;
        }
        if let Some(passing_grade) = self.passing_grade {
            ensure_range("passing grade", passing_grade, 0.0, 100.0)?;
        }
        if let Some(credit) = self.credit {
            ensure_non_negative("credit", credit)?;
        }
        Ok(())
    }

    pub fn apply(&self, subject: &mut Subject) {
        if let Some(name) = &self.name {
            subject.name = name.clone();
        }
        if let Some(passing_grade) = self.passing_grade {
            subject.passing_grade = passing_grade;
        }
        if let Some(credit) = self.credit {
            subject.credit = credit;
        }
        if let Some(included) = self.included {
            subject.included = included;
        }
        if let Some(semester) = &self.semester {
            subject.semester = semester.clone();
        }
    }
}

/// Partial assessment edit.
///
/// `obtained_marks` is doubly optional: an absent field leaves the marks alone while an
/// explicit `null` clears them back to ungraded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_marks: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_pass_requirement: Option<f64>,
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub obtained_marks: Option<Option<f64>>,
}

impl AssessmentPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Validate the patch against the assessment it will be applied to.
    pub fn validate_against(&self, current: &Assessment) -> Result<(), InputError> {
        if let Some(name) = &self.name {
            validate_name("assessment name", name)?;
        }
        let mut merged = current.clone();
        self.apply(&mut merged);
        validate_marks(
            merged.weight,
            merged.full_marks,
            merged.minimum_pass_requirement,
            merged.obtained_marks,
        )
    }

    pub fn apply(&self, assessment: &mut Assessment) {
        if let Some(name) = &self.name {
            assessment.name = name.clone();
        }
        if let Some(weight) = self.weight {
            assessment.weight = weight;
        }
        if let Some(full_marks) = self.full_marks {
            assessment.full_marks = full_marks;
        }
        if let Some(minimum) = self.minimum_pass_requirement {
            assessment.minimum_pass_requirement = minimum;
        }
        if let Some(obtained) = self.obtained_marks {
            assessment.obtained_marks = obtained;
        }
    }
}

/// Validate a complete collection before it replaces the stored one.
///
/// Applies the draft rules to every subject and assessment and rejects blank or
/// repeated identifiers: subject IDs across the collection, assessment IDs within
/// their subject.
pub fn validate_subjects(subjects: &[Subject]) -> Result<(), InputError> {
    let mut subject_ids = HashSet::new();
    for subject in subjects {
        unique_identifier("subject id", subject.id.as_str(), &mut subject_ids)?;
        validate_name("subject name", &subject.name)?;
        ensure_range("passing grade", subject.passing_grade, 0.0, 100.0)?;
        ensure_non_negative("credit", subject.credit)?;

        let mut assessment_ids = HashSet::new();
        for assessment in &subject.assessments {
            unique_identifier("assessment id", assessment.id.as_str(), &mut assessment_ids)?;
            validate_name("assessment name", &assessment.name)?;
            validate_marks(
                assessment.weight,
                assessment.full_marks,
                assessment.minimum_pass_requirement,
                assessment.obtained_marks,
            )?;
        }
    }
    Ok(())
}

fn unique_identifier<'a>(
    field: &'static str,
    id: &'a str,
    seen: &mut HashSet<&'a str>,
) -> Result<(), InputError> {
    if id.trim().is_empty() {
        return Err(InputError::Blank { field });
    }
    if !seen.insert(id) {
        return Err(InputError::Duplicate {
            field,
            value: id.to_string(),
        });
    }
    Ok(())
}

fn validate_name(field: &'static str, name: &str) -> Result<(), InputError> {
    if name.trim().is_empty() {
        return Err(InputError::Blank { field });
    }
    Ok(())
}

fn validate_marks(
    weight: f64,
    full_marks: f64,
    minimum_pass_requirement: f64,
    obtained_marks: Option<f64>,
) -> Result<(), InputError> {
    ensure_range("weight", weight, 0.0, 100.0)?;
    ensure_non_negative("full marks", full_marks)?;
    ensure_non_negative("minimum pass requirement", minimum_pass_requirement)?;
    if minimum_pass_requirement > full_marks {
        return Err(InputError::ExceedsLimit {
            field: "minimum pass requirement",
            limit_field: "full marks",
            value: minimum_pass_requirement,
            limit: full_marks,
        });
    }
    if let Some(obtained) = obtained_marks {
        ensure_non_negative("obtained marks", obtained)?;
        if obtained > full_marks {
            return Err(InputError::ExceedsLimit {
                field: "obtained marks",
                limit_field: "full marks",
                value: obtained,
                limit: full_marks,
            });
        }
    }
    Ok(())
}

fn present_field<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Some)
}

fn default_full_marks() -> f64 {
    100.0
}

fn default_minimum_pass() -> f64 {
    50.0
}

fn default_passing_grade() -> f64 {
    50.0
}

fn default_credit() -> f64 {
    DEFAULT_CREDIT
}

fn default_included() -> bool {
    true
}
