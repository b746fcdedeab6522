// MongoDB storage layer
//
// This crate is the record store adapter for both services: document-backed
// creation and read-all for tasks and users. The `StorageBackend` enum
// dispatches between the MongoDB implementation (production) and an
// in-memory implementation (dev mode).

pub mod backend;
pub mod error;
pub mod memory;
pub mod models;
pub mod repositories;

pub use backend::StorageBackend;
pub use error::{Result, StorageError};
pub use memory::InMemoryDatabase;
pub use models::{CreateTask, CreateUser, TaskRecord, UserRecord};
pub use repositories::Database;
