//! # Persistence Errors
//!
//! Error types cho persistence layer, wrapping sqlx errors.

use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    // === Database errors ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    // === Conversion errors ===
    #[error("Invalid enum value: {field} = {value}")]
    InvalidEnumValue { field: String, value: String },

    #[error("Invalid stored value: {field} = {value}")]
    InvalidValue { field: String, value: String },
}

/// Result type alias cho PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl PersistenceError {
    /// Tạo NotFound error
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn invalid_enum(field: &str, value: &str) -> Self {
        Self::InvalidEnumValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Kiểm tra có phải lỗi not found không
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True when a UNIQUE constraint rejected an insert
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }

    /// True when a FOREIGN KEY constraint rejected a write
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(db_err)) => db_err.is_foreign_key_violation(),
            _ => false,
        }
    }

    /// Name of the violated column, when the driver reports one
    /// (SQLite: "UNIQUE constraint failed: clients.email")
    pub fn violated_constraint(&self) -> Option<String> {
        match self {
            Self::Database(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Some(db_err.message().to_string())
            }
            _ => None,
        }
    }

    /// Kiểm tra có phải lỗi database không
    pub fn is_database_error(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Migration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found() {
        let err = PersistenceError::not_found("Product", "p-1");
        assert!(err.is_not_found());
        assert!(!err.is_unique_violation());
        assert_eq!(err.to_string(), "Record not found: Product with id p-1");
    }

    #[test]
    fn test_invalid_enum() {
        let err = PersistenceError::invalid_enum("kind", "TRANSFER");
        assert_eq!(err.to_string(), "Invalid enum value: kind = TRANSFER");
        assert!(!err.is_database_error());
    }

    #[test]
    fn test_pool_timeout_is_database_error() {
        let err = PersistenceError::from(sqlx::Error::PoolTimedOut);
        assert!(err.is_database_error());
        assert!(err.violated_constraint().is_none());
    }
}
