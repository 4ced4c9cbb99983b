//! Database schema definitions using SurrealQL.

use crate::{Database, DbError};

/// Initialize the database schema.
///
/// This creates all necessary tables and indexes.
pub async fn init_schema(db: &Database) -> Result<(), DbError> {
    tracing::info!("Initializing database schema...");

    db.query(ENTITY_SCHEMA).await?.check()?;

    tracing::info!("Database schema initialized");

    Ok(())
}

/// Entity table schema.
///
/// Nested address, tags and metadata are stored as-is, so the table stays
/// schemaless; only the lookup columns get indexes.
const ENTITY_SCHEMA: &str = r#"
-- Entity table for validated domain records
DEFINE TABLE IF NOT EXISTS entity SCHEMALESS;

-- Indexes for efficient lookups
DEFINE INDEX IF NOT EXISTS entity_name ON entity FIELDS name;
DEFINE INDEX IF NOT EXISTS entity_contact ON entity FIELDS contact;
DEFINE INDEX IF NOT EXISTS entity_status ON entity FIELDS status;
"#;
