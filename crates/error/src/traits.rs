//! # Error Traits
//!
//! Conversion traits for error handling.

use crate::{AppError, Result};

/// Trait for adding context to errors.
pub trait Context<T> {
    fn with_context<C: ToString>(self, context: C) -> Result<T>;
    fn context<C: ToString>(self, context: C) -> Result<T>
    where
        Self: Sized;
}

/// Extension methods for Result types.
pub trait ResultExt<T> {
    fn with_context<C: ToString>(self, context: C) -> Result<T>;
    fn context<C: ToString>(self, context: C) -> Result<T>
    where
        Self: Sized;
    fn log_error(self) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AppError> + std::fmt::Display,
{
    fn with_context<C: ToString>(self, context: C) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            err.context(context)
        })
    }

    fn context<C: ToString>(self, context: C) -> Result<T>
    where
        Self: Sized,
    {
        self.with_context(context)
    }

    fn log_error(self) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            tracing::error!(error = %err, "Error occurred");
            err
        })
    }
}

/// Convert a Result to an Option, logging errors.
pub fn ok_or_log<T>(result: Result<T>) -> Option<T> {
    result
        .map_err(|e| {
            tracing::error!(error = %e, "Operation failed");
            e
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context() {
        let result: Result<i32> = Err(AppError::not_found("Deliverable"));
        let result = result.context("Failed to fetch deliverable");

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to fetch deliverable"));
    }

    #[test]
    fn test_log_error() {
        let result: Result<i32> = Err(AppError::not_found("Deliverable"));
        let result = result.log_error();

        assert!(result.is_err());
    }

    #[test]
    fn test_ok_or_log() {
        let result: Result<i32> = Ok(42);
        assert_eq!(ok_or_log(result), Some(42));

        let result: Result<i32> = Err(AppError::not_found("Deliverable"));
        assert_eq!(ok_or_log(result), None);
    }
}
