use db::{Database, DbConfig, DbError, SurrealEntityRepository};

/// Open an isolated in-memory database with the schema applied.
pub async fn setup_db() -> Result<Database, DbError> {
    let db_conn = db::connect(&DbConfig::memory()).await?;
    db::init_schema(&db_conn).await?;
    Ok(db_conn)
}

pub async fn setup_repository() -> Result<SurrealEntityRepository, DbError> {
    Ok(SurrealEntityRepository::new(setup_db().await?))
}
