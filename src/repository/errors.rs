use thiserror::Error;

use crate::domain::types::{CategoryId, ValidationError};

/// Errors raised by repositories and units of work.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The targeted row does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Stored data or query input failed a domain check.
    #[error("validation error: {0}")]
    Validation(String),
    /// The store rejected a write (unique key, not-null, check).
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    /// No connection could be obtained.
    #[error("connection error: {0}")]
    Connection(String),
    /// Any other failure reported by the database.
    #[error("database error: {0}")]
    Database(String),
    /// The caller's cancellation token fired before the operation finished.
    #[error("operation cancelled")]
    Cancelled,
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl RepositoryError {
    /// Standard not-found error for a category id.
    pub fn category_not_found(id: CategoryId) -> Self {
        Self::NotFound(format!("Category '{id}' not found."))
    }
}

/// Convenient alias for results returned from repository functions.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<ValidationError> for RepositoryError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<tokio::task::JoinError> for RepositoryError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Unexpected(value.to_string())
    }
}

#[cfg(feature = "sqlite")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(value: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match value {
            Error::NotFound => Self::NotFound("record not found".to_string()),
            Error::DatabaseError(
                DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::NotNullViolation
                | DatabaseErrorKind::CheckViolation,
                info,
            ) => Self::ConstraintViolation(info.message().to_string()),
            Error::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
                Self::Connection(info.message().to_string())
            }
            other => Self::Database(other.to_string()),
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(value: diesel::r2d2::PoolError) -> Self {
        Self::Connection(value.to_string())
    }
}
