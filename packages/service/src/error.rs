//! Entity service errors.

use std::time::Duration;

use pool_core::{EntityId, RepositoryError, ValidationError};
use thiserror::Error;

/// Errors returned by [`EntityService`](crate::EntityService) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{resource} with ID {id} not found")]
    NotFound { resource: &'static str, id: EntityId },

    #[error("repository error: {0}")]
    Repository(RepositoryError),

    #[error("deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { resource, id } => Self::NotFound { resource, id },
            other => Self::Repository(other),
        }
    }
}

/// Result type for entity service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_keeps_resource_and_id() {
        let id = EntityId::new();
        let err = ServiceError::from(RepositoryError::entity_not_found(id));
        assert_eq!(err, ServiceError::NotFound { resource: "entity", id });
    }

    #[test]
    fn backend_errors_are_wrapped() {
        let err = ServiceError::from(RepositoryError::Backend("disk full".into()));
        assert!(matches!(err, ServiceError::Repository(RepositoryError::Backend(_))));
        assert_eq!(err.to_string(), "repository error: storage backend error: disk full");
    }
}
