//! Storage backends for the entity service.
//!
//! This crate provides database connectivity and repositories
//! implementing `pool_core::EntityRepository`.
//!
//! # Features
//!
//! - `memory` (default): Use in-memory storage for testing
//! - `rocksdb`: Use RocksDB for persistent file-based storage

mod connection;
mod schema;
pub mod repositories;

pub use connection::{Database, DbConfig, DbError, Endpoint, connect, get_db, init_db};
pub use repositories::{InMemoryEntityRepository, SurrealEntityRepository};
pub use schema::init_schema;

/// Initialize the global database with the given configuration.
///
/// This should be called once at application startup.
pub async fn init(config: DbConfig) -> Result<&'static Database, DbError> {
    let db = init_db(config).await?;
    init_schema(db).await?;
    Ok(db)
}
