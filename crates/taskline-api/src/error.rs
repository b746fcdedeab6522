// HTTP error mapping
//
// The error bodies are part of the historical wire contract and are kept
// verbatim, including the trailing period on the broker message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Terminal request errors with fixed response bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    /// Persistence failed; no record was created
    Internal,
    /// Broker connection not made; the task WAS persisted but no event
    /// was emitted (accepted inconsistency, no rollback)
    BrokerNotReady,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            ApiError::BrokerNotReady => (
                StatusCode::SERVICE_UNAVAILABLE,
                "RabbitMQ Connection not made.",
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
