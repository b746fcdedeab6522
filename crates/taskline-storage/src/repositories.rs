// MongoDB repository layer
//
// Records get their ids assigned at insert time (driver-generated ObjectIds),
// matching the document-store contract: the caller supplies fields only.

use bson::{doc, oid::ObjectId};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{Client, Collection};

use crate::error::Result;
use crate::models::{CreateTask, CreateUser, TaskRecord, UserRecord};

/// Handle to one service's database within the document store.
///
/// The underlying client connects lazily; construction does not verify the
/// store is reachable. Use [`Database::ping`] at startup to log reachability
/// without making it fatal.
#[derive(Clone)]
pub struct Database {
    db: mongodb::Database,
}

impl Database {
    /// Create a database handle from a connection string and database name
    pub async fn from_url(url: &str, db_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(url).await?;
        tracing::debug!(database = db_name, "MongoDB client created (connects lazily)");
        Ok(Self {
            db: client.database(db_name),
        })
    }

    /// Round-trip to the store to check reachability
    pub async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    fn tasks(&self) -> Collection<TaskRecord> {
        self.db.collection("tasks")
    }

    fn users(&self) -> Collection<UserRecord> {
        self.db.collection("users")
    }

    pub async fn create_task(&self, input: CreateTask) -> Result<TaskRecord> {
        let record = TaskRecord {
            id: ObjectId::new(),
            title: input.title,
            description: input.description,
            user_id: input.user_id,
            created_at: Utc::now(),
        };
        self.tasks().insert_one(&record).await?;
        Ok(record)
    }

    /// List all tasks. Order is unspecified.
    pub async fn list_tasks(&self) -> Result<Vec<TaskRecord>> {
        let cursor = self.tasks().find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn create_user(&self, input: CreateUser) -> Result<UserRecord> {
        let record = UserRecord {
            id: ObjectId::new(),
            name: input.name,
            email: input.email,
        };
        self.users().insert_one(&record).await?;
        Ok(record)
    }

    /// List all users. Order is unspecified.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>> {
        let cursor = self.users().find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }
}
