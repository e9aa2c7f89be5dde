//! # Error Module
//!
//! Domain errors for Banca built with thiserror.

use thiserror::Error;

/// Core domain errors.
///
/// Raised while validating input before anything touches the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    // === Input errors ===
    #[error("Validation error: {0}")]
    ValidationError(String),

    // === Money errors ===
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// Result type alias với CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::ValidationError(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::ValidationError(_))
    }

    pub fn is_invalid_amount(&self) -> bool {
        matches!(self, CoreError::InvalidAmount(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::validation("name too short");
        assert_eq!(err.to_string(), "Validation error: name too short");

        let err = CoreError::InvalidAmount("0".to_string());
        assert_eq!(err.to_string(), "Invalid amount: 0");
    }

    #[test]
    fn test_error_checks() {
        assert!(CoreError::validation("x").is_validation());
        assert!(!CoreError::validation("x").is_invalid_amount());
        assert!(CoreError::InvalidAmount("-1".into()).is_invalid_amount());
    }
}
