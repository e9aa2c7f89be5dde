//! Business layer errors
//!
//! One variant per failure kind a caller can observe. Transports map
//! [`BusinessError::code`] to their own status codes; the core itself is
//! status-code agnostic.
//!
//! Two pairs of conditions are conflated on purpose so callers learn nothing
//! about other tenants' data:
//! - [`BusinessError::NotFound`] covers both "does not exist" and "belongs to
//!   another client".
//! - [`BusinessError::InsufficientFundsOrNotFound`] covers every way the
//!   guarded withdraw update can match no row.

use banca_core::CoreError;
use banca_persistence::PersistenceError;
use thiserror::Error;

/// Business operation errors
#[derive(Debug, Error)]
pub enum BusinessError {
    // === Input errors ===
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    // === Identity errors ===
    #[error("A client with this email already exists")]
    DuplicateIdentity,

    /// Same error for unknown email and wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid one-time code")]
    InvalidOtp,

    // === Ledger errors ===
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Insufficient funds or product not found")]
    InsufficientFundsOrNotFound,

    // === Infrastructure errors ===
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] PersistenceError),

    /// A capability (hashing, OTP, signing) failed for reasons unrelated to input
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for business operations
pub type BusinessResult<T> = Result<T, BusinessError>;

impl BusinessError {
    /// Stable machine-readable code for this failure kind
    pub fn code(&self) -> &'static str {
        match self {
            BusinessError::Validation(_) => "VALIDATION_ERROR",
            BusinessError::InvalidAmount(_) => "INVALID_AMOUNT",
            BusinessError::DuplicateIdentity => "DUPLICATE_IDENTITY",
            BusinessError::InvalidCredentials => "INVALID_CREDENTIALS",
            BusinessError::InvalidToken => "INVALID_TOKEN",
            BusinessError::TokenExpired => "TOKEN_EXPIRED",
            BusinessError::InvalidOtp => "INVALID_OTP",
            BusinessError::NotFound(_) => "NOT_FOUND",
            BusinessError::InsufficientFundsOrNotFound => "INSUFFICIENT_FUNDS_OR_NOT_FOUND",
            BusinessError::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            BusinessError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Failures of one of the two login steps
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            BusinessError::InvalidCredentials
                | BusinessError::InvalidToken
                | BusinessError::TokenExpired
                | BusinessError::InvalidOtp
        )
    }

    /// Infrastructure failures; the core never retries them
    pub fn is_storage_error(&self) -> bool {
        matches!(self, BusinessError::StorageUnavailable(_))
    }
}

impl From<CoreError> for BusinessError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(message) => BusinessError::Validation(message),
            CoreError::InvalidAmount(message) => BusinessError::InvalidAmount(message),
        }
    }
}

impl From<sqlx::Error> for BusinessError {
    fn from(err: sqlx::Error) -> Self {
        BusinessError::StorageUnavailable(PersistenceError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: BusinessError = CoreError::validation("name too short").into();
        assert_eq!(err.code(), "VALIDATION_ERROR");

        let err: BusinessError = CoreError::InvalidAmount("0".into()).into();
        assert_eq!(err.code(), "INVALID_AMOUNT");
    }

    #[test]
    fn test_storage_errors() {
        let err: BusinessError = sqlx::Error::PoolTimedOut.into();
        assert!(err.is_storage_error());
        assert_eq!(err.code(), "STORAGE_UNAVAILABLE");
        assert!(err.to_string().starts_with("Storage unavailable"));
    }

    #[test]
    fn test_auth_errors_are_grouped() {
        assert!(BusinessError::InvalidCredentials.is_auth_error());
        assert!(BusinessError::InvalidOtp.is_auth_error());
        assert!(!BusinessError::NotFound("Product").is_auth_error());
    }

    #[test]
    fn test_not_found_display() {
        assert_eq!(BusinessError::NotFound("Product").to_string(), "Product not found");
        assert_eq!(
            BusinessError::InsufficientFundsOrNotFound.code(),
            "INSUFFICIENT_FUNDS_OR_NOT_FOUND"
        );
    }
}
