//! Storage error types
//!
//! Error codes:
//! - VALVE_STORAGE_UNIQUE_VIOLATION: a write collided with a UNIQUE column
//! - VALVE_STORAGE_CONFIG: the database URL could not be parsed
//! - VALVE_STORAGE_ROW: a row did not have the expected shape
//! - VALVE_STORAGE_DATABASE: any other driver or engine failure

use std::fmt;

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    UniqueViolation,
    Config,
    Row,
    Database,
}

impl StorageErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::UniqueViolation => "VALVE_STORAGE_UNIQUE_VIOLATION",
            StorageErrorCode::Config => "VALVE_STORAGE_CONFIG",
            StorageErrorCode::Row => "VALVE_STORAGE_ROW",
            StorageErrorCode::Database => "VALVE_STORAGE_DATABASE",
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised by the valve store and its sessions
#[derive(Debug, Error)]
pub enum StorageError {
    /// Insert or update hit the UNIQUE constraint on a column
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Database URL rejected by the driver
    #[error("invalid database url: {0}")]
    InvalidUrl(String),

    /// A row came back without a column we rely on
    #[error("malformed row: {0}")]
    MalformedRow(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StorageError {
    pub fn code(&self) -> StorageErrorCode {
        match self {
            StorageError::UniqueViolation(_) => StorageErrorCode::UniqueViolation,
            StorageError::InvalidUrl(_) => StorageErrorCode::Config,
            StorageError::MalformedRow(_) => StorageErrorCode::Row,
            StorageError::Database(_) => StorageErrorCode::Database,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StorageError::UniqueViolation(_))
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StorageError::UniqueViolation(db.message().to_string())
            }
            sqlx::Error::ColumnNotFound(column) => {
                StorageError::MalformedRow(format!("missing column {column}"))
            }
            sqlx::Error::ColumnDecode { index, source } => {
                StorageError::MalformedRow(format!("column {index}: {source}"))
            }
            sqlx::Error::Configuration(e) => StorageError::InvalidUrl(e.to_string()),
            other => StorageError::Database(other),
        }
    }
}
