//! Process-local entity repository.

use std::collections::HashMap;

use async_trait::async_trait;
use pool_core::{Entity, EntityId, EntityRepository, RepositoryError, RepositoryResult};
use tokio::sync::RwLock;

/// Repository keeping entities in a map. Nothing survives the process.
#[derive(Default)]
pub struct InMemoryEntityRepository {
    entities: RwLock<HashMap<EntityId, Entity>>,
}

impl InMemoryEntityRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entities.
    pub async fn len(&self) -> usize {
        self.entities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entities.read().await.is_empty()
    }

    /// Snapshot of every stored entity, in no particular order.
    pub async fn all(&self) -> Vec<Entity> {
        self.entities.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl EntityRepository for InMemoryEntityRepository {
    async fn save(&self, mut entity: Entity) -> RepositoryResult<Entity> {
        let id = *entity.id.get_or_insert_with(EntityId::new);
        self.entities.write().await.insert(id, entity.clone());
        Ok(entity)
    }

    async fn find_by_id(&self, id: EntityId) -> RepositoryResult<Entity> {
        self.entities
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::entity_not_found(id))
    }

    async fn delete(&self, id: EntityId) -> RepositoryResult<()> {
        self.entities
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::entity_not_found(id))
    }
}
