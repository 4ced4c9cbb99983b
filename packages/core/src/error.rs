//! Error types shared across the workspace.

use thiserror::Error;

use crate::EntityId;

/// Caller input failed validation. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation error on field '{field}': {reason}")]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `address.city`.
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Failures reported by an entity repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: &'static str, id: EntityId },

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl RepositoryError {
    /// Lookup miss for an entity id.
    pub fn entity_not_found(id: EntityId) -> Self {
        Self::NotFound {
            resource: crate::entity::RESOURCE,
            id,
        }
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
