//! Grade sheet import: one CSV row per assessment, grouped into subject drafts.

use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::edit::{AssessmentDraft, SubjectDraft};
use super::input::{parse_optional_number, InputError};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read grade sheet: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: InputError,
    },
    #[error("row {row}: included must be yes/no or true/false (got '{value}')")]
    InvalidFlag { row: usize, value: String },
}

#[derive(Debug, Deserialize)]
struct GradeSheetRow {
    #[serde(rename = "Subject")]
    subject: String,
    #[serde(rename = "Semester", default, deserialize_with = "empty_string_as_none")]
    semester: Option<String>,
    #[serde(rename = "Credit", default, deserialize_with = "empty_string_as_none")]
    credit: Option<String>,
    #[serde(rename = "Included", default, deserialize_with = "empty_string_as_none")]
    included: Option<String>,
    #[serde(rename = "Assessment", default, deserialize_with = "empty_string_as_none")]
    assessment: Option<String>,
    #[serde(rename = "Weight", default, deserialize_with = "empty_string_as_none")]
    weight: Option<String>,
    #[serde(rename = "Full Marks", default, deserialize_with = "empty_string_as_none")]
    full_marks: Option<String>,
    #[serde(rename = "Minimum Pass", default, deserialize_with = "empty_string_as_none")]
    minimum_pass: Option<String>,
    #[serde(
        rename = "Obtained Marks",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    obtained_marks: Option<String>,
}

/// Parse a grade sheet into drafts, one per distinct subject name in first-seen order.
///
/// Subject-level columns are read from the first row that mentions the subject. Rows
/// without an assessment name only declare the subject.
pub fn import_subject_drafts<R: Read>(reader: R) -> Result<Vec<SubjectDraft>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut drafts: Vec<SubjectDraft> = Vec::new();

    for (index, record) in csv_reader.deserialize::<GradeSheetRow>().enumerate() {
        // Header is line 1.
        let row_number = index + 2;
        let row = record?;

        let position = match drafts.iter().position(|draft| draft.name == row.subject) {
            Some(position) => position,
            None => {
                drafts.push(subject_from_row(&row, row_number)?);
                drafts.len() - 1
            }
        };

        if let Some(assessment) = assessment_from_row(&row, row_number)? {
            drafts[position].assessments.push(assessment);
        }
    }

    Ok(drafts)
}

fn subject_from_row(row: &GradeSheetRow, row_number: usize) -> Result<SubjectDraft, ImportError> {
    let mut draft = SubjectDraft::new(row.subject.clone());
    if let Some(semester) = &row.semester {
        draft.semester = semester.clone();
    }
    if let Some(credit) = number(row_number, "credit", row.credit.as_deref())? {
        draft.credit = credit;
    }
    if let Some(included) = &row.included {
        draft.included = parse_flag(included).ok_or_else(|| ImportError::InvalidFlag {
            row: row_number,
            value: included.clone(),
        })?;
    }
    draft
        .validate()
        .map_err(|source| ImportError::InvalidRow {
            row: row_number,
            source,
        })?;
    Ok(draft)
}

fn assessment_from_row(
    row: &GradeSheetRow,
    row_number: usize,
) -> Result<Option<AssessmentDraft>, ImportError> {
    let Some(name) = &row.assessment else {
        return Ok(None);
    };

    let mut draft = AssessmentDraft::new(name.clone());
    if let Some(weight) = number(row_number, "weight", row.weight.as_deref())? {
        draft.weight = weight;
    }
    if let Some(full_marks) = number(row_number, "full marks", row.full_marks.as_deref())? {
        draft.full_marks = full_marks;
    }
    if let Some(minimum) = number(row_number, "minimum pass", row.minimum_pass.as_deref())? {
        draft.minimum_pass_requirement = minimum;
    }
    draft.obtained_marks = number(row_number, "obtained marks", row.obtained_marks.as_deref())?;

    draft
        .validate()
        .map_err(|source| ImportError::InvalidRow {
            row: row_number,
            source,
        })?;
    Ok(Some(draft))
}

fn number(
    row_number: usize,
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<f64>, ImportError> {
    parse_optional_number(field, raw.unwrap_or_default()).map_err(|source| {
        ImportError::InvalidRow {
            row: row_number,
            source,
        }
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
