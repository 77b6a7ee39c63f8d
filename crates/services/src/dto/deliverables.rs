//! # Deliverable Data Transfer Objects
//!
//! Request types for the deliverable lifecycle. Update fields use a double
//! `Option` so "field absent" and "field set to null" stay distinguishable
//! through deserialization.

use chrono::NaiveDate;
use error::{AppError, Result};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::validate_calendar_date;

/// Request to create a new deliverable
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DeliverableCreateRequest {
    /// Deliverable title
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title:          String,
    /// Deliverable description
    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description:    Option<String>,
    /// Owning team member
    pub owner_id:       Option<Uuid>,
    /// Deadline in YYYY-MM-DD format
    #[validate(custom(function = validate_calendar_date))]
    pub deadline:       Option<String>,
    /// Deliverables this one depends on
    #[serde(default)]
    pub dependency_ids: Vec<Uuid>,
}

impl DeliverableCreateRequest {
    /// Parses the validated deadline string into a calendar date.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the deadline is present but malformed.
    pub fn parsed_deadline(&self) -> Result<Option<NaiveDate>> {
        self.deadline
            .as_deref()
            .map(|d| {
                NaiveDate::parse_from_str(d, "%Y-%m-%d")
                    .map_err(|_| AppError::validation("Deadline must be in YYYY-MM-DD format"))
            })
            .transpose()
    }
}

/// Request to update an existing deliverable
///
/// Inner `None` clears the field; an absent field leaves it untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DeliverableUpdateRequest {
    /// Updated title
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title:       Option<String>,
    /// Updated description
    #[serde(default, deserialize_with = "super::double_option")]
    pub description: Option<Option<String>>,
    /// Updated owner
    #[serde(default, deserialize_with = "super::double_option")]
    pub owner_id:    Option<Option<Uuid>>,
    /// Updated deadline in YYYY-MM-DD format
    #[serde(default, deserialize_with = "super::double_option")]
    pub deadline:    Option<Option<String>>,
    /// Updated progress (0-100)
    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))]
    pub progress:    Option<i32>,
    /// Updated status
    pub status:      Option<entity::deliverables::DeliverableStatus>,
}

impl DeliverableUpdateRequest {
    /// Parses the deadline field into a calendar date, preserving the
    /// absent / cleared / set distinction.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a set deadline is malformed.
    pub fn parsed_deadline(&self) -> Result<Option<Option<NaiveDate>>> {
        match &self.deadline {
            None => Ok(None),
            Some(None) => Ok(Some(None)),
            Some(Some(raw)) => {
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| AppError::validation("Deadline must be in YYYY-MM-DD format"))?;
                Ok(Some(Some(date)))
            },
        }
    }

    /// Validates the request, including the deadline format.
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the failing fields.
    pub fn validated(&self) -> Result<()> {
        use validator::Validate as _;
        self.validate().map_err(AppError::from)?;
        self.parsed_deadline()?;
        Ok(())
    }
}
