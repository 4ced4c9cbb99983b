use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use db::InMemoryEntityRepository;
use pool_core::{Entity, EntityId, EntityRepository, RepositoryError, RepositoryResult};
use service::EntityService;

/// Wraps a repository and delays every call.
pub struct SlowRepository {
    pub inner: Arc<InMemoryEntityRepository>,
    pub delay: Duration,
}

#[async_trait]
impl EntityRepository for SlowRepository {
    async fn save(&self, entity: Entity) -> RepositoryResult<Entity> {
        tokio::time::sleep(self.delay).await;
        self.inner.save(entity).await
    }

    async fn find_by_id(&self, id: EntityId) -> RepositoryResult<Entity> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_by_id(id).await
    }

    async fn delete(&self, id: EntityId) -> RepositoryResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete(id).await
    }
}

/// Repository that overwrites an existing entity in two steps: the name
/// first, then, after `pause`, everything else. Unguarded readers can observe
/// the half-written record.
pub struct TwoStepRepository {
    entities: Mutex<HashMap<EntityId, Entity>>,
    pause: Duration,
}

impl TwoStepRepository {
    pub fn new(pause: Duration) -> Self {
        Self {
            entities: Mutex::new(HashMap::new()),
            pause,
        }
    }

    fn entities(&self) -> std::sync::MutexGuard<'_, HashMap<EntityId, Entity>> {
        self.entities.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl EntityRepository for TwoStepRepository {
    async fn save(&self, mut entity: Entity) -> RepositoryResult<Entity> {
        let id = *entity.id.get_or_insert_with(EntityId::new);

        let existed = match self.entities().get_mut(&id) {
            Some(stored) => {
                stored.name = entity.name.clone();
                true
            }
            None => false,
        };
        if existed {
            tokio::time::sleep(self.pause).await;
        }

        self.entities().insert(id, entity.clone());
        Ok(entity)
    }

    async fn find_by_id(&self, id: EntityId) -> RepositoryResult<Entity> {
        self.entities()
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::entity_not_found(id))
    }

    async fn delete(&self, id: EntityId) -> RepositoryResult<()> {
        self.entities()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::entity_not_found(id))
    }
}

/// Service over a fresh in-memory repository, returned alongside it.
pub fn setup_service() -> (EntityService, Arc<InMemoryEntityRepository>) {
    let store = Arc::new(InMemoryEntityRepository::new());
    (EntityService::new(store.clone()), store)
}

/// Service whose repository sleeps `delay` on every call.
pub fn setup_slow_service(delay: Duration) -> (EntityService, Arc<InMemoryEntityRepository>) {
    let store = Arc::new(InMemoryEntityRepository::new());
    let slow = SlowRepository {
        inner: store.clone(),
        delay,
    };
    (EntityService::new(Arc::new(slow)), store)
}
