//! SurrealDB-backed entity repository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pool_core::{
    Address, Entity, EntityId, EntityRepository, EntityStatus, RepositoryError, RepositoryResult,
};
use serde::{Deserialize, Serialize};

use crate::{Database, DbError, get_db};

const TABLE: &str = "entity";

/// Repository persisting entities in the `entity` table.
#[derive(Clone)]
pub struct SurrealEntityRepository {
    db: Database,
}

/// Internal record type for SurrealDB reads. The record id carries the identity.
#[derive(Debug, Deserialize)]
struct EntityRecord {
    name: String,
    contact: String,
    first_name: Option<String>,
    last_name: Option<String>,
    age: Option<i32>,
    status: EntityStatus,
    address: Option<Address>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    metadata: BTreeMap<String, serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EntityRecord {
    fn into_entity(self, id: EntityId) -> Entity {
        Entity {
            id: Some(id),
            name: self.name,
            contact: self.contact,
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            status: self.status,
            address: self.address,
            tags: self.tags,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Struct for writing entities - omits the identity, which lives in the record id.
#[derive(Debug, Clone, Serialize)]
struct EntityContent {
    name: String,
    contact: String,
    first_name: Option<String>,
    last_name: Option<String>,
    age: Option<i32>,
    status: EntityStatus,
    address: Option<Address>,
    tags: Vec<String>,
    metadata: BTreeMap<String, serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Entity> for EntityContent {
    fn from(entity: &Entity) -> Self {
        Self {
            name: entity.name.clone(),
            contact: entity.contact.clone(),
            first_name: entity.first_name.clone(),
            last_name: entity.last_name.clone(),
            age: entity.age,
            status: entity.status,
            address: entity.address.clone(),
            tags: entity.tags.clone(),
            metadata: entity.metadata.clone(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl SurrealEntityRepository {
    /// Create a repository over an open connection.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a repository over the global connection.
    pub fn from_global() -> Result<Self, DbError> {
        Ok(Self::new(get_db()?.clone()))
    }

    /// Insert a new entity under a freshly assigned identity.
    pub async fn create(&self, entity: &Entity) -> Result<Entity, DbError> {
        let id = EntityId::new();

        let record: Option<EntityRecord> = self
            .db
            .create((TABLE, id.to_string()))
            .content(EntityContent::from(entity))
            .await?;

        record
            .map(|r| r.into_entity(id))
            .ok_or_else(|| DbError::Query("Failed to create entity".into()))
    }

    /// Write an entity under its existing identity.
    pub async fn upsert(&self, id: EntityId, entity: &Entity) -> Result<Entity, DbError> {
        let record: Option<EntityRecord> = self
            .db
            .upsert((TABLE, id.to_string()))
            .content(EntityContent::from(entity))
            .await?;

        record
            .map(|r| r.into_entity(id))
            .ok_or_else(|| DbError::Query(format!("Failed to write entity: {}", id)))
    }

    /// Get an entity by ID.
    pub async fn get(&self, id: EntityId) -> Result<Option<Entity>, DbError> {
        let record: Option<EntityRecord> = self.db.select((TABLE, id.to_string())).await?;

        Ok(record.map(|r| r.into_entity(id)))
    }

    /// Delete an entity, returning the removed record if it existed.
    pub async fn remove(&self, id: EntityId) -> Result<Option<Entity>, DbError> {
        let record: Option<EntityRecord> = self.db.delete((TABLE, id.to_string())).await?;

        Ok(record.map(|r| r.into_entity(id)))
    }

    /// Count stored entities.
    pub async fn count(&self) -> Result<u64, DbError> {
        #[derive(Deserialize)]
        struct Count {
            count: i64,
        }

        let mut result = self
            .db
            .query("SELECT count() AS count FROM entity GROUP ALL")
            .await?;

        let counts: Vec<Count> = result.take(0)?;

        Ok(counts.first().map_or(0, |c| c.count as u64))
    }
}

impl From<DbError> for RepositoryError {
    fn from(error: DbError) -> Self {
        RepositoryError::Backend(error.to_string())
    }
}

#[async_trait]
impl EntityRepository for SurrealEntityRepository {
    async fn save(&self, entity: Entity) -> RepositoryResult<Entity> {
        let saved = match entity.id {
            Some(id) => self.upsert(id, &entity).await?,
            None => self.create(&entity).await?,
        };
        tracing::debug!(entity_id = ?saved.id, "Saved entity");
        Ok(saved)
    }

    async fn find_by_id(&self, id: EntityId) -> RepositoryResult<Entity> {
        self.get(id)
            .await?
            .ok_or_else(|| RepositoryError::entity_not_found(id))
    }

    async fn delete(&self, id: EntityId) -> RepositoryResult<()> {
        match self.remove(id).await? {
            Some(_) => {
                tracing::debug!(entity_id = %id, "Deleted entity");
                Ok(())
            }
            None => Err(RepositoryError::entity_not_found(id)),
        }
    }
}
