//! Application error type mapping to HTTP status codes.
//!
//! Error bodies are `{"detail": "...", "code": "..."}`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use twin_core::chat::service::ChatError;
use twin_types::error::SessionIdError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Request failed validation before any I/O.
    Validation(String),
    /// Body was not a valid JSON request.
    InvalidBody(JsonRejection),
    /// Storage or completion failure while serving the request.
    Chat(ChatError),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<SessionIdError> for AppError {
    fn from(e: SessionIdError) -> Self {
        AppError::Validation(format!("Invalid session_id: {e}"))
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::InvalidBody(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match &self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::InvalidBody(rejection) => {
                (rejection.status(), "INVALID_BODY", rejection.body_text())
            }
            AppError::Chat(ChatError::Store(e)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }
            AppError::Chat(ChatError::Llm(e)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR", e.to_string())
            }
        };

        if status.is_server_error() {
            error!(code, %detail, "Request failed");
        }

        (status, Json(json!({ "detail": detail, "code": code }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use twin_types::error::StoreError;
    use twin_types::llm::LlmError;

    use super::*;

    #[test]
    fn test_validation_is_bad_request() {
        let resp = AppError::from(SessionIdError::Empty).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_chat_failures_are_server_errors() {
        let store = AppError::from(ChatError::Store(StoreError::Backend("timeout".into())));
        assert_eq!(store.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let llm = AppError::from(ChatError::Llm(LlmError::Provider {
            message: "Rate limit reached".into(),
        }));
        assert_eq!(llm.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
