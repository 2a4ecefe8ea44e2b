//! User input validation.
//!
//! Validation runs after deserialization and is independent of the web
//! framework. Every field is checked and all violations are reported
//! together.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidateLength;

use super::age::calculate_age;
use super::user::NewUser;
use crate::config::{DATE_FORMAT, DEFAULT_MAX_AGE_YEARS, MAX_NAME_LENGTH, MIN_NAME_LENGTH};

/// Field names as they appear on the wire
pub const FIELD_NAME: &str = "name";
pub const FIELD_DOB: &str = "dob";

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error, ToSchema)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Offending request field
    #[schema(example = "dob")]
    pub field: String,
    /// Human-readable description of the violated rule
    #[schema(example = "date of birth cannot be in the future")]
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Every violation found in one request, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", summarize(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<ValidationError> {
        self.0
    }

    /// Whether any violation was reported for `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// chrono alone accepts unpadded and signed fields, so the shape is
/// checked before parsing.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let bytes = input.as_bytes();
    if bytes.len() != 10 {
        return None;
    }

    let well_formed = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !well_formed {
        return None;
    }

    NaiveDate::parse_from_str(input, DATE_FORMAT).ok()
}

/// Validates user name and date of birth against configured bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserValidator {
    min_name_len: u64,
    max_name_len: u64,
    max_age: u32,
}

impl Default for UserValidator {
    fn default() -> Self {
        Self::new(MIN_NAME_LENGTH, MAX_NAME_LENGTH, DEFAULT_MAX_AGE_YEARS)
    }
}

impl UserValidator {
    pub fn new(min_name_len: u64, max_name_len: u64, max_age: u32) -> Self {
        Self {
            min_name_len,
            max_name_len,
            max_age,
        }
    }

    /// Default name bounds with a custom age ceiling
    pub fn with_max_age(max_age: u32) -> Self {
        Self {
            max_age,
            ..Self::default()
        }
    }

    pub fn max_age(&self) -> u32 {
        self.max_age
    }

    /// Validate a candidate record as of `today`.
    ///
    /// On success the name is returned trimmed and the date parsed.
    pub fn validate(
        &self,
        name: &str,
        dob: &str,
        today: NaiveDate,
    ) -> Result<NewUser, ValidationErrors> {
        collect(self.check_name(name), self.check_dob(dob, today))
    }

    /// Validate a record whose date of birth is already parsed.
    pub fn validate_with_date(
        &self,
        name: &str,
        date_of_birth: NaiveDate,
        today: NaiveDate,
    ) -> Result<NewUser, ValidationErrors> {
        collect(self.check_name(name), self.check_date(date_of_birth, today))
    }

    /// Trim and length-check a name.
    pub fn check_name(&self, name: &str) -> Result<String, ValidationError> {
        let trimmed = name.trim().to_string();

        if trimmed.is_empty() {
            return Err(ValidationError::new(FIELD_NAME, "name is required"));
        }

        if !trimmed.validate_length(Some(self.min_name_len), Some(self.max_name_len), None) {
            return Err(ValidationError::new(
                FIELD_NAME,
                format!(
                    "name must be between {} and {} characters",
                    self.min_name_len, self.max_name_len
                ),
            ));
        }

        Ok(trimmed)
    }

    /// Parse a date of birth and check that it is plausible as of `today`.
    ///
    /// The input is parsed as given; surrounding whitespace is a format error.
    pub fn check_dob(&self, dob: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
        if dob.is_empty() {
            return Err(ValidationError::new(FIELD_DOB, "date of birth is required"));
        }

        let date = parse_date(dob).ok_or_else(|| {
            ValidationError::new(FIELD_DOB, "invalid date format, expected YYYY-MM-DD")
        })?;

        self.check_date(date, today)
    }

    /// Reject dates of birth in the future or beyond the age ceiling.
    pub fn check_date(&self, date: NaiveDate, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
        if date > today {
            return Err(ValidationError::new(
                FIELD_DOB,
                "date of birth cannot be in the future",
            ));
        }

        if calculate_age(date, today) > self.max_age {
            return Err(ValidationError::new(
                FIELD_DOB,
                format!("age cannot exceed {} years", self.max_age),
            ));
        }

        Ok(date)
    }
}

fn collect(
    name: Result<String, ValidationError>,
    date_of_birth: Result<NaiveDate, ValidationError>,
) -> Result<NewUser, ValidationErrors> {
    match (name, date_of_birth) {
        (Ok(name), Ok(date_of_birth)) => Ok(NewUser {
            name,
            date_of_birth,
        }),
        (name, date_of_birth) => {
            let mut errors = ValidationErrors::default();
            if let Err(e) = name {
                errors.push(e);
            }
            if let Err(e) = date_of_birth {
                errors.push(e);
            }
            Err(errors)
        }
    }
}
