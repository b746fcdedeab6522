// In-memory storage implementation for dev mode
// Decision: Use parking_lot for thread-safe access
//
// Provides a MongoDB-compatible API backed by in-memory HashMaps, allowing
// the services to run without a document store for development and tests.
// Writes can be made to fail on demand so callers can exercise their
// storage-failure paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use bson::oid::ObjectId;
use chrono::Utc;
use parking_lot::RwLock;

use crate::error::{Result, StorageError};
use crate::models::{CreateTask, CreateUser, TaskRecord, UserRecord};

/// In-memory database for dev mode.
/// All data is stored in memory and lost on restart.
#[derive(Default)]
pub struct InMemoryDatabase {
    tasks: RwLock<HashMap<ObjectId, TaskRecord>>,
    users: RwLock<HashMap<ObjectId, UserRecord>>,
    fail_writes: AtomicBool,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail with `StorageError::WriteRejected`
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteRejected(
                "in-memory store is set to reject writes".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn create_task(&self, input: CreateTask) -> Result<TaskRecord> {
        self.check_writable()?;
        let record = TaskRecord {
            id: ObjectId::new(),
            title: input.title,
            description: input.description,
            user_id: input.user_id,
            created_at: Utc::now(),
        };
        self.tasks.write().insert(record.id, record.clone());
        Ok(record)
    }

    pub async fn list_tasks(&self) -> Result<Vec<TaskRecord>> {
        Ok(self.tasks.read().values().cloned().collect())
    }

    pub async fn create_user(&self, input: CreateUser) -> Result<UserRecord> {
        self.check_writable()?;
        let record = UserRecord {
            id: ObjectId::new(),
            name: input.name,
            email: input.email,
        };
        self.users.write().insert(record.id, record.clone());
        Ok(record)
    }

    pub async fn list_users(&self) -> Result<Vec<UserRecord>> {
        Ok(self.users.read().values().cloned().collect())
    }
}
