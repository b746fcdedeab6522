// Task DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored task as returned by the task service.
///
/// `id` is the store-generated document id rendered as a hex string.
/// `user_id` is an opaque reference; it is not validated against the user
/// service (the two services share no data-layer relationship).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Request to create a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_serializes_with_camel_case_keys() {
        let task = Task {
            id: "65f0a1b2c3d4e5f6a7b8c9d0".to_string(),
            title: "write spec".to_string(),
            description: String::new(),
            user_id: "u1".to_string(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["userId"], "u1");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("user_id").is_none());
    }

    #[test]
    fn create_request_parses_wire_body() {
        let req: CreateTaskRequest = serde_json::from_str(
            r#"{"title":"write spec","description":"","userId":"u1"}"#,
        )
        .unwrap();
        assert_eq!(req.title, "write spec");
        assert_eq!(req.user_id, "u1");
    }
}
