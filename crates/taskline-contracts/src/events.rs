// Queue event payloads

use serde::{Deserialize, Serialize};

/// Event published to the `task_created` queue after a task is persisted.
///
/// Fire-and-forget: at most one publish attempt per creation, no redelivery.
/// Consumers must tolerate tasks that exist in the store with no matching
/// event (the broker may have been unavailable at creation time).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreatedEvent {
    pub task_id: String,
    pub user_id: String,
    pub title: String,
}
