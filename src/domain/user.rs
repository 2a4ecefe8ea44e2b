//! User domain entity and related types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::age::calculate_age;
use super::validation::{UserValidator, ValidationErrors};
use crate::config::DATE_FORMAT;

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Age in whole years as of the given date
    pub fn age(&self, as_of: NaiveDate) -> u32 {
        calculate_age(self.date_of_birth, as_of)
    }

    /// Date of birth in wire format
    pub fn formatted_dob(&self) -> String {
        self.date_of_birth.format(DATE_FORMAT).to_string()
    }

    /// Project to the client-facing shape, computing age as of `as_of`.
    pub fn to_response(&self, as_of: NaiveDate) -> UserResponse {
        UserResponse {
            id: self.id,
            name: self.name.clone(),
            dob: self.formatted_dob(),
            age: self.age(as_of),
        }
    }

    /// Merge an update request over this record and validate the result.
    ///
    /// Absent or blank fields keep the stored value. The merged record is
    /// validated in full, so a stored value that has become invalid (e.g.
    /// an age past the ceiling) fails the update as well.
    pub fn apply_update(
        &self,
        changes: &UpdateUser,
        validator: &UserValidator,
        today: NaiveDate,
    ) -> Result<NewUser, ValidationErrors> {
        let name = provided(changes.name.as_deref()).unwrap_or(self.name.as_str());

        match provided(changes.dob.as_deref()) {
            Some(dob) => validator.validate(name, dob, today),
            None => validator.validate_with_date(name, self.date_of_birth, today),
        }
    }
}

fn provided(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// A validated record not yet persisted (no id or timestamps)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub date_of_birth: NaiveDate,
}

/// User creation request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateUser {
    /// Display name, 2 to 100 characters
    #[serde(default)]
    #[schema(example = "Alice")]
    pub name: String,
    /// Date of birth as YYYY-MM-DD
    #[serde(default, alias = "date_of_birth")]
    #[schema(example = "1990-05-10")]
    pub dob: String,
}

impl CreateUser {
    /// Validate into a persistable record.
    pub fn validate(
        &self,
        validator: &UserValidator,
        today: NaiveDate,
    ) -> Result<NewUser, ValidationErrors> {
        validator.validate(&self.name, &self.dob, today)
    }
}

/// User update request; omitted or empty fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateUser {
    /// New display name
    #[schema(example = "Alice Smith")]
    pub name: Option<String>,
    /// New date of birth as YYYY-MM-DD
    #[serde(alias = "date_of_birth")]
    #[schema(example = "1990-05-11")]
    pub dob: Option<String>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = 1)]
    pub id: i64,
    /// Display name
    #[schema(example = "Alice")]
    pub name: String,
    /// Date of birth as YYYY-MM-DD
    #[schema(example = "1990-05-10")]
    pub dob: String,
    /// Age in whole years, computed at response time
    #[schema(example = 34)]
    pub age: u32,
}
