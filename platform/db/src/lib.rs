//! Employee document store.
//!
//! The gateway only ever talks to [`EmployeeStore`]; the concrete backend is
//! either [`SeaOrmStore`] (Postgres or SQLite through sea-orm) or
//! [`MemoryStore`] for development and tests.

mod memory;
mod orm;

use async_trait::async_trait;
use products_hr::Fields;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use memory::MemoryStore;
pub use sea_orm::DbErr;
pub use orm::SeaOrmStore;

/// Shared connection pool alias.
pub type DbPool = DatabaseConnection;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing (set {0})")]
    MissingUrl(String),
    #[error("failed to connect to database: {0}")]
    Connect(#[from] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

/// Environment-driven connection settings.
#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_url_key")]
    env_key: String,
    #[serde(default)]
    max_connections: Option<u32>,
}

fn default_url_key() -> String {
    "DATABASE_URL".to_string()
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self::new(default_url_key())
    }
}

impl DatabaseSettings {
    pub fn new(env_key: impl Into<String>) -> Self {
        Self {
            env_key: env_key.into(),
            max_connections: None,
        }
    }

    /// Settings reading `DATABASE_URL` and the optional
    /// `DATABASE_MAX_CONNECTIONS`.
    pub fn from_env() -> Self {
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|raw| raw.parse().ok());
        Self {
            max_connections,
            ..Self::default()
        }
    }

    pub fn database_url(&self) -> DbResult<String> {
        std::env::var(&self.env_key).map_err(|_| DbError::MissingUrl(self.env_key.clone()))
    }
}

pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    let url = settings.database_url()?;
    let mut options = ConnectOptions::new(url);
    options.sqlx_logging(false);
    if let Some(max) = settings.max_connections {
        options.max_connections(max);
    }
    Ok(Database::connect(options).await?)
}

/// One listed document: the identifier plus its stored fields, serialized
/// flat as `{id, ...fields}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: String,
    #[serde(flatten)]
    pub fields: Fields,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("employee {0} not found")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("document {id} is not a JSON object")]
    Corrupt { id: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The four verbs the gateway needs from persistence.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Insert a new document and return its freshly assigned identifier.
    async fn create(&self, fields: Fields) -> StoreResult<String>;

    /// Every document in store-native order.
    async fn list(&self) -> StoreResult<Vec<EmployeeRecord>>;

    /// Remove a document, failing with [`StoreError::NotFound`] when absent.
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Merge `patch` into an existing document. Missing documents fail with
    /// [`StoreError::NotFound`]; nothing is upserted.
    async fn update(&self, id: &str, patch: Fields) -> StoreResult<()>;

    /// Whether the backend is reachable.
    async fn ping(&self) -> bool {
        true
    }
}

pub(crate) fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
