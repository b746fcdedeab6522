// Taskline HTTP surface
//
// Two independent record services share this crate: the task service
// (tasks + task_created events) and the user service (users only). Each
// has its own binary under src/bin/; the route modules here are what the
// binaries mount.

pub mod config;
pub mod error;
pub mod tasks;
pub mod users;

pub use error::ApiError;
