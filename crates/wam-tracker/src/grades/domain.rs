use serde::{Deserialize, Deserializer, Serialize};

/// Credit applied to subjects stored without one.
pub const DEFAULT_CREDIT: f64 = 12.0;

/// Identifier wrapper for subjects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(pub String);

impl SubjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for assessments. Unique within the owning subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentId(pub String);

impl AssessmentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One gradable component of a subject (exam, assignment, lab).
///
/// `weight` is informational; aggregation works from the marks ratio. Stored numbers
/// may be missing, `null` or `""`; a missing `full_marks` loads as 0 and the
/// assessment then carries no weight in any percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub name: String,
    #[serde(default, deserialize_with = "stored_number_or_zero")]
    pub weight: f64,
    #[serde(default, deserialize_with = "stored_number_or_zero")]
    pub full_marks: f64,
    #[serde(default, deserialize_with = "stored_number_or_zero")]
    pub minimum_pass_requirement: f64,
    /// `None` means the assessment has not been graded yet.
    #[serde(
        default,
        deserialize_with = "stored_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub obtained_marks: Option<f64>,
}

impl Assessment {
    /// Obtained marks with ungraded items counted as zero.
    pub fn obtained_or_zero(&self) -> f64 {
        self.obtained_marks.unwrap_or(0.0)
    }

    pub fn is_graded(&self) -> bool {
        self.obtained_marks.is_some()
    }

    /// Whether the obtained marks meet the assessment's own hurdle.
    pub fn meets_minimum(&self) -> Option<bool> {
        self.obtained_marks
            .map(|marks| marks >= self.minimum_pass_requirement)
    }
}

/// A course or unit owning an ordered list of assessments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    #[serde(
        rename = "passingGrade",
        default,
        deserialize_with = "stored_number_or_zero"
    )]
    pub passing_grade: f64,
    #[serde(
        rename = "bgColor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bg_color: Option<String>,
    #[serde(default = "default_credit", deserialize_with = "stored_credit")]
    pub credit: f64,
    #[serde(default = "default_included")]
    pub included: bool,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub assessments: Vec<Assessment>,
}

impl Subject {
    pub fn assessment(&self, id: &AssessmentId) -> Option<&Assessment> {
        self.assessments.iter().find(|assessment| &assessment.id == id)
    }

    pub fn assessment_mut(&mut self, id: &AssessmentId) -> Option<&mut Assessment> {
        self.assessments
            .iter_mut()
            .find(|assessment| &assessment.id == id)
    }

    /// True when the subject takes part in the WAM calculation.
    pub fn counts_toward_wam(&self) -> bool {
        self.included && !self.assessments.is_empty()
    }
}

fn default_credit() -> f64 {
    DEFAULT_CREDIT
}

/// Numeric cell as written by the subject and assessment forms: a number, a numeric
/// string, or `""` for a field the user cleared.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredNumber {
    Number(f64),
    Text(String),
}

fn stored_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<StoredNumber>::deserialize(deserializer)? {
        None => None,
        Some(StoredNumber::Number(value)) => Some(value),
        Some(StoredNumber::Text(text)) if text.trim().is_empty() => None,
        Some(StoredNumber::Text(text)) => {
            Some(text.trim().parse::<f64>().map_err(|_| {
                serde::de::Error::custom(format!("expected a number, got '{text}'"))
            })?)
        }
    };
    Ok(value.filter(|value| value.is_finite()))
}

fn stored_number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(stored_number(deserializer)?.unwrap_or(0.0))
}

fn stored_credit<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(stored_number(deserializer)?.unwrap_or(DEFAULT_CREDIT))
}

fn default_included() -> bool {
    true
}
