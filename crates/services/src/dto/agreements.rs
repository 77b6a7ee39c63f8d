//! # Agreement Data Transfer Objects
//!
//! Request types for the agreement lifecycle.

use serde::Deserialize;
use validator::Validate;

/// Request to create a new agreement
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AgreementCreateRequest {
    /// Agreement title
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title:       String,
    /// Agreement description
    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_valid() {
        let req = AgreementCreateRequest {
            title:       "Core Working Hours".to_string(),
            description: Some("We agree to be online between 10 AM and 3 PM EST.".to_string()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_empty_title() {
        let req = AgreementCreateRequest {
            title:       String::new(),
            description: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_description_too_long() {
        let req = AgreementCreateRequest {
            title:       "Title".to_string(),
            description: Some("x".repeat(2001)),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let payload = r#"{"title": "T", "description": null, "sneaky": true}"#;
        let parsed: Result<AgreementCreateRequest, _> = serde_json::from_str(payload);
        assert!(parsed.is_err(), "strict schemas must reject unknown fields");
    }
}
