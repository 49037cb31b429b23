//! Parsing of raw form text into validated numbers before anything reaches the core.

/// Rejection produced while parsing form input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("{field} is required")]
    Empty { field: &'static str },
    #[error("{field} must be a number (got '{raw}')")]
    NotANumber { field: &'static str, raw: String },
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} must not exceed {limit_field} ({value} > {limit})")]
    ExceedsLimit {
        field: &'static str,
        limit_field: &'static str,
        value: f64,
        limit: f64,
    },
    #[error("{field} must not be empty")]
    Blank { field: &'static str },
    #[error("{field} '{value}' is used more than once")]
    Duplicate { field: &'static str, value: String },
}

/// Parse a required numeric field.
pub fn parse_number(field: &'static str, raw: &str) -> Result<f64, InputError> {
    parse_optional_number(field, raw)?.ok_or(InputError::Empty { field })
}

/// Parse a numeric field where empty text means "no value".
pub fn parse_optional_number(field: &'static str, raw: &str) -> Result<Option<f64>, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(InputError::NotANumber {
            field,
            raw: trimmed.to_string(),
        }),
    }
}

/// Parse a goal target percentage in `[0, 100]`.
pub fn parse_target_percent(raw: &str) -> Result<f64, InputError> {
    let value = parse_number("target", raw)?;
    ensure_range("target", value, 0.0, 100.0)
}

pub(crate) fn ensure_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, InputError> {
    if !value.is_finite() {
        return Err(InputError::NotANumber {
            field,
            raw: value.to_string(),
        });
    }
    if value < min || value > max {
        return Err(InputError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64, InputError> {
    ensure_range(field, value, 0.0, f64::MAX)
}

/// Percentage input that tolerates partial edits and settles on commit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedInput {
    pub min: f64,
    pub max: f64,
}

impl BoundedInput {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether an in-progress edit should be kept: empty, or a number in `[0, max]`.
    pub fn accepts(&self, raw: &str) -> bool {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return true;
        }
        trimmed
            .parse::<f64>()
            .map(|value| value >= 0.0 && value <= self.max)
            .unwrap_or(false)
    }

    /// Resolve committed text: empty or unparsable text falls back to `min`.
    pub fn settle(&self, raw: &str) -> f64 {
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => self.settle_value(value),
            _ => self.min,
        }
    }

    /// Clamp into `[min, max]`, rounding values already inside the range.
    pub fn settle_value(&self, value: f64) -> f64 {
        if value.is_nan() || value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value.round()
        }
    }
}
