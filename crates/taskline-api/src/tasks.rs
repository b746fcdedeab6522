// Task HTTP routes
//
// Creation order is fixed: persist first, then look at the broker. A task
// that lands while the broker is down is kept (no rollback) and the client
// is told the event was not emitted via 503.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use taskline_broker::ConnectionManager;
use taskline_contracts::{CreateTaskRequest, Task, TaskCreatedEvent};
use taskline_storage::{CreateTask, StorageBackend};

use crate::error::ApiError;

/// App state for task routes
#[derive(Clone)]
pub struct AppState {
    pub store: StorageBackend,
    pub broker: Arc<ConnectionManager>,
}

/// Create task routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/tasks", post(create_task).get(list_tasks))
        .with_state(state)
}

/// POST /tasks - persist a task, then publish a task_created event
async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let record = state
        .store
        .create_task(CreateTask {
            title: req.title,
            description: req.description,
            user_id: req.user_id,
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to save task");
            ApiError::Internal
        })?;

    if !state.broker.is_ready() {
        tracing::warn!(task_id = %record.id, "Broker not ready, task saved but no event emitted");
        return Err(ApiError::BrokerNotReady);
    }

    let event = TaskCreatedEvent {
        task_id: record.id.to_hex(),
        user_id: record.user_id.clone(),
        title: record.title.clone(),
    };
    match serde_json::to_vec(&event) {
        Ok(payload) => {
            // Publish failure after the channel is up does not fail the
            // request: the task exists, the event is lost (at-most-once).
            if let Err(e) = state.broker.publish(&payload).await {
                tracing::error!(task_id = %record.id, error = %e, "Failed to publish task_created event");
            } else {
                tracing::debug!(task_id = %record.id, queue = state.broker.queue(), "Published task_created event");
            }
        }
        Err(e) => {
            tracing::error!(task_id = %record.id, error = %e, "Failed to serialize task_created event");
        }
    }

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// GET /tasks - list all tasks, order unspecified
async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let records = state.store.list_tasks().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list tasks");
        ApiError::Internal
    })?;

    Ok(Json(records.into_iter().map(Task::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use chrono::{DateTime, Utc};
    use http_body_util::BodyExt;
    use std::sync::Mutex;
    use std::time::Duration;
    use taskline_broker::{BrokerChannel, BrokerError, BrokerTransport, ConnectRetryPolicy};
    use taskline_storage::InMemoryDatabase;
    use tower::ServiceExt;

    type Published = Arc<Mutex<Vec<(String, Vec<u8>)>>>;

    struct CapturingChannel {
        published: Published,
    }

    #[async_trait]
    impl BrokerChannel for CapturingChannel {
        async fn publish(&self, queue: &str, payload: &[u8]) -> Result<(), BrokerError> {
            self.published
                .lock()
                .unwrap()
                .push((queue.to_string(), payload.to_vec()));
            Ok(())
        }
    }

    struct CapturingTransport {
        published: Published,
    }

    #[async_trait]
    impl BrokerTransport for CapturingTransport {
        async fn connect(&self) -> Result<Box<dyn BrokerChannel>, BrokerError> {
            Ok(Box::new(CapturingChannel {
                published: Arc::clone(&self.published),
            }))
        }
    }

    /// Manager that has completed its connect loop against a capturing fake
    async fn ready_broker() -> (Arc<ConnectionManager>, Published) {
        let published: Published = Arc::new(Mutex::new(Vec::new()));
        let manager = Arc::new(ConnectionManager::new(
            Arc::new(CapturingTransport {
                published: Arc::clone(&published),
            }),
            "task_created",
            ConnectRetryPolicy::new(1, Duration::from_millis(1)),
            Duration::from_millis(50),
        ));
        manager.run_connect_loop().await;
        assert!(manager.is_ready());
        (manager, published)
    }

    /// Manager whose connect loop never ran (broker still down)
    fn idle_broker() -> Arc<ConnectionManager> {
        let published: Published = Arc::new(Mutex::new(Vec::new()));
        Arc::new(ConnectionManager::new(
            Arc::new(CapturingTransport { published }),
            "task_created",
            ConnectRetryPolicy::new(1, Duration::from_millis(1)),
            Duration::from_millis(50),
        ))
    }

    fn post_task(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/tasks")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn create_returns_201_and_publishes_event() {
        let (broker, published) = ready_broker().await;
        let state = AppState {
            store: StorageBackend::in_memory(),
            broker,
        };
        let app = routes(state);

        let started = Utc::now();
        let response = app
            .oneshot(post_task(
                r#"{"title":"write spec","description":"","userId":"u1"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let task: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(task["title"], "write spec");
        assert_eq!(task["userId"], "u1");
        assert!(!task["id"].as_str().unwrap().is_empty());

        let created_at: DateTime<Utc> = task["createdAt"]
            .as_str()
            .unwrap()
            .parse()
            .expect("createdAt is a timestamp");
        assert!((created_at - started).num_seconds().abs() < 1);

        let published = published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "task_created");
        let event: serde_json::Value = serde_json::from_slice(&published[0].1).unwrap();
        assert_eq!(event["taskId"], task["id"]);
        assert_eq!(event["userId"], "u1");
        assert_eq!(event["title"], "write spec");
    }

    #[tokio::test]
    async fn create_without_broker_returns_503_but_persists() {
        let state = AppState {
            store: StorageBackend::in_memory(),
            broker: idle_broker(),
        };
        let app = routes(state.clone());

        let response = app
            .oneshot(post_task(
                r#"{"title":"write spec","description":"","userId":"u1"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(error["error"], "RabbitMQ Connection not made.");

        // The record is already persisted; that inconsistency is accepted
        let tasks = state.store.list_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "write spec");
    }

    #[tokio::test]
    async fn create_with_failing_store_returns_500_and_no_event() {
        let db = Arc::new(InMemoryDatabase::new());
        db.set_fail_writes(true);
        let (broker, published) = ready_broker().await;
        let state = AppState {
            store: StorageBackend::InMemory(db),
            broker,
        };
        let app = routes(state.clone());

        let response = app
            .oneshot(post_task(
                r#"{"title":"write spec","description":"","userId":"u1"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(error["error"], "Internal Server Error");

        // Persist-first ordering: nothing stored, nothing published
        assert!(state.store.list_tasks().await.unwrap().is_empty());
        assert!(published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_returns_each_created_task() {
        let (broker, _published) = ready_broker().await;
        let state = AppState {
            store: StorageBackend::in_memory(),
            broker,
        };
        let app = routes(state);

        let mut ids = Vec::new();
        for i in 0..3 {
            let response = app
                .clone()
                .oneshot(post_task(&format!(
                    r#"{{"title":"task {i}","description":"","userId":"u1"}}"#
                )))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
            let body = response.into_body().collect().await.unwrap().to_bytes();
            let task: serde_json::Value = serde_json::from_slice(&body).unwrap();
            ids.push(task["id"].as_str().unwrap().to_string());
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/tasks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let tasks: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(tasks.len(), 3);
        for id in ids {
            assert!(tasks.iter().any(|t| t["id"] == id.as_str()));
        }
    }
}
