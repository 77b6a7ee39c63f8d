//! # Request Data Transfer Objects
//!
//! Validated payloads consumed before every create/update. Schemas are
//! strict: unknown fields in a payload are rejected at deserialization
//! (`deny_unknown_fields`), and field rules are enforced with `validator`.

pub mod agreements;
pub mod deliverables;

pub use agreements::AgreementCreateRequest;
pub use deliverables::{DeliverableCreateRequest, DeliverableUpdateRequest};

use serde::{Deserialize, Deserializer};
use validator::ValidationError;

/// Deserializes a field where "absent" and "set to null" must stay
/// distinguishable: absent stays `None` via `#[serde(default)]`, an
/// explicit null becomes `Some(None)`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Validates a calendar date in `YYYY-MM-DD` format.
pub(crate) fn validate_calendar_date(value: &str) -> Result<(), ValidationError> {
    if chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err(ValidationError::new("calendar_date").with_message("Deadline must be in YYYY-MM-DD format".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_date_valid() {
        assert!(validate_calendar_date("2026-08-07").is_ok());
    }

    #[test]
    fn test_calendar_date_rejects_bad_format() {
        assert!(validate_calendar_date("07/08/2026").is_err());
        assert!(validate_calendar_date("2026-8-7").is_err());
        assert!(validate_calendar_date("not-a-date").is_err());
    }

    #[test]
    fn test_calendar_date_rejects_impossible_date() {
        assert!(validate_calendar_date("2026-02-30").is_err());
    }
}
