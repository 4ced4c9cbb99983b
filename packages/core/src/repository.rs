//! Storage collaborator consumed by the entity service.

use async_trait::async_trait;

use crate::{Entity, EntityId, RepositoryResult};

/// Abstract store for entities, keyed by identity.
///
/// Implementations must bound the latency of every call or honor the
/// caller's cancellation: the entity service drops the in-flight future
/// when its deadline expires.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Persist an entity, assigning an identity if it has none.
    ///
    /// Returns the entity as stored.
    async fn save(&self, entity: Entity) -> RepositoryResult<Entity>;

    /// Fetch an entity, failing with `NotFound` when absent.
    async fn find_by_id(&self, id: EntityId) -> RepositoryResult<Entity>;

    /// Remove an entity, failing with `NotFound` when absent.
    async fn delete(&self, id: EntityId) -> RepositoryResult<()>;
}
