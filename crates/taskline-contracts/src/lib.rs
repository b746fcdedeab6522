// Taskline shared contracts
//
// Decision: This crate is the source of truth for the wire-level data shapes
// Decision: Minimal dependencies - only serde and chrono
// Decision: No runtime logic - only type definitions and serialization
//
// Field names follow the historical wire contract (camelCase), which external
// consumers of both the HTTP API and the task_created queue already depend on.

pub mod events;
pub mod task;
pub mod user;

pub use events::TaskCreatedEvent;
pub use task::{CreateTaskRequest, Task};
pub use user::{CreateUserRequest, User};
