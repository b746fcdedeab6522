// User HTTP routes
//
// Structurally the same create/list pair as tasks, minus the broker: user
// creation emits no event. The plain-text health route at `/` also lives
// here (user service only).

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use taskline_contracts::{CreateUserRequest, User};
use taskline_storage::{CreateUser, StorageBackend};

use crate::error::ApiError;

/// App state for user routes
#[derive(Clone)]
pub struct AppState {
    pub store: StorageBackend,
}

/// Create user routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route("/", get(health))
        .with_state(state)
}

/// GET / - health check
async fn health() -> &'static str {
    "Hello World"
}

/// POST /users - create a new user
async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let record = state
        .store
        .create_user(CreateUser {
            name: req.name,
            email: req.email,
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to save user");
            ApiError::Internal
        })?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// GET /users - list all users, order unspecified
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let records = state.store.list_users().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list users");
        ApiError::Internal
    })?;

    Ok(Json(records.into_iter().map(User::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use taskline_storage::InMemoryDatabase;
    use tower::ServiceExt;

    fn app() -> Router {
        routes(AppState {
            store: StorageBackend::in_memory(),
        })
    }

    #[tokio::test]
    async fn health_returns_hello_world() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Hello World");
    }

    #[tokio::test]
    async fn create_and_list_users() {
        let app = app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"name":"Ada","email":"ada@example.com"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let user: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(user["name"], "Ada");
        assert_eq!(user["email"], "ada@example.com");
        assert!(!user["id"].as_str().unwrap().is_empty());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let users: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["id"], user["id"]);
    }

    #[tokio::test]
    async fn create_with_failing_store_returns_500() {
        let db = Arc::new(InMemoryDatabase::new());
        db.set_fail_writes(true);
        let app = routes(AppState {
            store: StorageBackend::InMemory(db),
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"name":"Ada","email":"ada@example.com"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(error["error"], "Internal Server Error");
    }
}
