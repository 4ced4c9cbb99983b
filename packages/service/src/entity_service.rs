use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pool_core::{Entity, EntityId, EntityRepository, ValidationError, validate};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::{ServiceConfig, ServiceError, ServiceResult};

/// CRUD facade over an entity repository.
///
/// Lock discipline: `read` takes the gate shared, `create`, `update` and
/// `delete` take it exclusively. Each call waits for the gate and the
/// repository under one deadline; on expiry the in-flight future is dropped,
/// which releases the gate.
pub struct EntityService {
    repository: Arc<dyn EntityRepository>,
    gate: RwLock<()>,
    config: ServiceConfig,
}

impl EntityService {
    pub fn new(repository: Arc<dyn EntityRepository>) -> Self {
        Self::with_config(repository, ServiceConfig::default())
    }

    pub fn with_config(repository: Arc<dyn EntityRepository>, config: ServiceConfig) -> Self {
        Self {
            repository,
            gate: RwLock::new(()),
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Create a pending entity and persist it.
    ///
    /// The returned entity carries its assigned identity. Invalid input is
    /// rejected before the repository is contacted.
    #[instrument(skip(self, contact))]
    pub async fn create(
        &self,
        name: &str,
        contact: &str,
        timeout: Option<Duration>,
    ) -> ServiceResult<Entity> {
        let entity = Entity::new(name, contact);
        validate(&entity)?;

        let created = self
            .within(timeout, async {
                let _guard = self.gate.write().await;
                self.repository.save(entity).await.map_err(ServiceError::from)
            })
            .await?;

        debug!(id = ?created.id, "created entity");
        Ok(created)
    }

    /// Fetch an entity by identity.
    #[instrument(skip(self))]
    pub async fn read(&self, id: EntityId, timeout: Option<Duration>) -> ServiceResult<Entity> {
        self.within(timeout, async {
            let _guard = self.gate.read().await;
            self.repository.find_by_id(id).await.map_err(ServiceError::from)
        })
        .await
    }

    /// Validate, stamp and persist changes to an existing entity.
    #[instrument(skip(self, entity), fields(id = ?entity.id))]
    pub async fn update(
        &self,
        mut entity: Entity,
        timeout: Option<Duration>,
    ) -> ServiceResult<Entity> {
        if entity.id.is_none() {
            return Err(ValidationError::new("id", "entity has no identity").into());
        }
        validate(&entity)?;

        self.within(timeout, async {
            let _guard = self.gate.write().await;
            entity.touch();
            self.repository.save(entity).await.map_err(ServiceError::from)
        })
        .await
    }

    /// Remove an entity. Unknown identities fail with `NotFound`.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: EntityId, timeout: Option<Duration>) -> ServiceResult<()> {
        self.within(timeout, async {
            let _guard = self.gate.write().await;
            self.repository.delete(id).await.map_err(ServiceError::from)
        })
        .await?;

        debug!("deleted entity");
        Ok(())
    }

    async fn within<T>(
        &self,
        timeout: Option<Duration>,
        call: impl Future<Output = ServiceResult<T>>,
    ) -> ServiceResult<T> {
        let budget = timeout.unwrap_or(self.config.default_timeout);
        tokio::time::timeout(budget, call)
            .await
            .map_err(|_| ServiceError::DeadlineExceeded(budget))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pool_core::{EntityStatus, MockEntityRepository, RepositoryError};

    fn assign_id(mut entity: Entity) -> Result<Entity, RepositoryError> {
        entity.id.get_or_insert_with(EntityId::new);
        Ok(entity)
    }

    #[tokio::test]
    async fn test_create_assigns_identity() {
        let mut mock_repo = MockEntityRepository::new();
        mock_repo
            .expect_save()
            .withf(|entity: &Entity| entity.name == "johndoe" && entity.id.is_none())
            .times(1)
            .returning(assign_id);

        let service = EntityService::new(Arc::new(mock_repo));
        let entity = service
            .create("johndoe", "john@example.com", None)
            .await
            .unwrap();

        assert!(entity.id.is_some());
        assert_eq!(entity.status, EntityStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_short_name_never_saves() {
        let mut mock_repo = MockEntityRepository::new();
        mock_repo.expect_save().never();

        let service = EntityService::new(Arc::new(mock_repo));
        let err = service
            .create("ab", "john@example.com", None)
            .await
            .unwrap_err();

        match err {
            ServiceError::Validation(e) => assert_eq!(e.field, "name"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_bad_contact_never_saves() {
        let mut mock_repo = MockEntityRepository::new();
        mock_repo.expect_save().never();

        let service = EntityService::new(Arc::new(mock_repo));
        let err = service.create("johndoe", "bad-email", None).await.unwrap_err();

        assert!(matches!(err, ServiceError::Validation(ref e) if e.field == "contact"));
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let mut mock_repo = MockEntityRepository::new();
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|id| Err(RepositoryError::entity_not_found(id)));

        let service = EntityService::new(Arc::new(mock_repo));
        let id = EntityId::new();
        let err = service.read(id, None).await.unwrap_err();

        assert_eq!(err, ServiceError::NotFound { resource: "entity", id });
    }

    #[tokio::test]
    async fn test_update_without_identity_rejected() {
        let mut mock_repo = MockEntityRepository::new();
        mock_repo.expect_save().never();

        let service = EntityService::new(Arc::new(mock_repo));
        let err = service
            .update(Entity::new("johndoe", "john@example.com"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(ref e) if e.field == "id"));
    }

    #[tokio::test]
    async fn test_update_validates_before_saving() {
        let mut mock_repo = MockEntityRepository::new();
        mock_repo.expect_save().never();

        let service = EntityService::new(Arc::new(mock_repo));
        let mut entity = Entity::new("johndoe", "john@example.com").with_age(200);
        entity.id = Some(EntityId::new());

        let err = service.update(entity, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e.field == "age"));
    }

    #[tokio::test]
    async fn test_update_propagates_repository_error() {
        let mut mock_repo = MockEntityRepository::new();
        mock_repo
            .expect_save()
            .times(1)
            .returning(|_| Err(RepositoryError::Backend("connection reset".into())));

        let service = EntityService::new(Arc::new(mock_repo));
        let mut entity = Entity::new("johndoe", "john@example.com");
        entity.id = Some(EntityId::new());

        let err = service.update(entity, None).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Repository(RepositoryError::Backend("connection reset".into()))
        );
    }

    #[tokio::test]
    async fn test_delete_forwards_to_repository() {
        let id = EntityId::new();
        let mut mock_repo = MockEntityRepository::new();
        mock_repo
            .expect_delete()
            .withf(move |candidate: &EntityId| *candidate == id)
            .times(1)
            .returning(|_| Ok(()));

        let service = EntityService::new(Arc::new(mock_repo));
        assert!(service.delete(id, None).await.is_ok());
    }

    #[test]
    fn test_default_timeout_is_thirty_seconds() {
        let service = EntityService::new(Arc::new(MockEntityRepository::new()));
        assert_eq!(service.config().default_timeout, Duration::from_secs(30));
    }
}
