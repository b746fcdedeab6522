// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// A unified StorageBackend that can work with either MongoDB (production)
// or in-memory (dev mode) storage.

use std::sync::Arc;

use crate::error::Result;
use crate::memory::InMemoryDatabase;
use crate::models::{CreateTask, CreateUser, TaskRecord, UserRecord};
use crate::repositories::Database;

/// Storage backend that can be either MongoDB or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// MongoDB database (production)
    Mongo(Database),
    /// In-memory database (dev mode)
    InMemory(Arc<InMemoryDatabase>),
}

impl StorageBackend {
    /// Create a MongoDB storage backend from a connection string
    pub async fn mongo(url: &str, db_name: &str) -> Result<Self> {
        let db = Database::from_url(url, db_name).await?;
        Ok(Self::Mongo(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryDatabase::new()))
    }

    /// Check if this is dev mode (in-memory)
    pub fn is_dev_mode(&self) -> bool {
        matches!(self, Self::InMemory(_))
    }

    /// Check store reachability. Always succeeds for the in-memory backend.
    pub async fn ping(&self) -> Result<()> {
        match self {
            Self::Mongo(db) => db.ping().await,
            Self::InMemory(_) => Ok(()),
        }
    }

    pub async fn create_task(&self, input: CreateTask) -> Result<TaskRecord> {
        match self {
            Self::Mongo(db) => db.create_task(input).await,
            Self::InMemory(db) => db.create_task(input).await,
        }
    }

    pub async fn list_tasks(&self) -> Result<Vec<TaskRecord>> {
        match self {
            Self::Mongo(db) => db.list_tasks().await,
            Self::InMemory(db) => db.list_tasks().await,
        }
    }

    pub async fn create_user(&self, input: CreateUser) -> Result<UserRecord> {
        match self {
            Self::Mongo(db) => db.create_user(input).await,
            Self::InMemory(db) => db.create_user(input).await,
        }
    }

    pub async fn list_users(&self) -> Result<Vec<UserRecord>> {
        match self {
            Self::Mongo(db) => db.list_users().await,
            Self::InMemory(db) => db.list_users().await,
        }
    }
}
