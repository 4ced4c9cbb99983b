//! SurrealDB connections: standalone handles and the process-wide instance.

use std::fmt;
#[cfg(feature = "rocksdb")]
use std::path::PathBuf;
use std::sync::LazyLock;

use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use thiserror::Error;
use tokio::sync::OnceCell;

static DB: LazyLock<OnceCell<Database>> = LazyLock::new(OnceCell::new);

/// Handle to a SurrealDB database over any engine.
pub type Database = Surreal<Any>;

/// Storage engine backing a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Process-local, lost on exit.
    Memory,
    /// RocksDB store on disk.
    #[cfg(feature = "rocksdb")]
    RocksDb(PathBuf),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Memory => write!(f, "mem://"),
            #[cfg(feature = "rocksdb")]
            Endpoint::RocksDb(path) => write!(f, "rocksdb://{}", path.display()),
        }
    }
}

/// Where and under which namespace entities are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub endpoint: Endpoint,
    pub namespace: String,
    pub database: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::Memory,
            namespace: "workbench".to_string(),
            database: "entities".to_string(),
        }
    }
}

impl DbConfig {
    pub fn memory() -> Self {
        Self::default()
    }

    #[cfg(feature = "rocksdb")]
    pub fn rocksdb(path: impl Into<PathBuf>) -> Self {
        Self {
            endpoint: Endpoint::RocksDb(path.into()),
            ..Self::default()
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }
}

/// Storage-layer errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database not initialized - call init_db first")]
    NotInitialized,
    #[error("Connection error: {0}")]
    Connection(#[from] surrealdb::Error),
    #[error("Query error: {0}")]
    Query(String),
}

/// Open a connection of its own, independent of the global instance.
pub async fn connect(config: &DbConfig) -> Result<Database, DbError> {
    let endpoint = config.endpoint.to_string();
    tracing::info!(endpoint = %endpoint, "Connecting to database");

    let db = surrealdb::engine::any::connect(endpoint).await?;
    db.use_ns(&config.namespace)
        .use_db(&config.database)
        .await?;

    tracing::debug!(
        namespace = %config.namespace,
        database = %config.database,
        "Database selected"
    );
    Ok(db)
}

/// Connect the global instance. Later calls return the existing handle.
pub async fn init_db(config: DbConfig) -> Result<&'static Database, DbError> {
    DB.get_or_try_init(|| async { connect(&config).await }).await
}

/// The global instance set up by [`init_db`].
pub fn get_db() -> Result<&'static Database, DbError> {
    DB.get().ok_or(DbError::NotInitialized)
}
