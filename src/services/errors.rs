use thiserror::Error;

use crate::domain::types::ValidationError;
use crate::repository::RepositoryError;

/// Errors returned by the category use cases.
///
/// Domain and repository errors are carried unchanged so callers can match on
/// the underlying variant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// A category field broke an aggregate invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Raised by a repository or unit of work (not found, persistence, cancellation).
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// Transport-shaped input was rejected before reaching a use case.
    #[error("invalid input: {0}")]
    Form(String),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(RepositoryError::NotFound(_)))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Repository(RepositoryError::Cancelled))
    }
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
