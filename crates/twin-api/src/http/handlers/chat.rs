//! Chat handler.
//!
//! Endpoint:
//! - POST /chat  - Send one message, get the twin's reply

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use twin_types::session::SessionId;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Absent or null starts a new session.
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
}

/// POST /chat - Run one conversation turn.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = body?;

    let session_id = request
        .session_id
        .as_deref()
        .map(str::parse::<SessionId>)
        .transpose()?;

    let reply = state
        .chat_service
        .chat(request.message, session_id)
        .await?;

    Ok(Json(ChatResponse {
        response: reply.response,
        session_id: reply.session_id.to_string(),
    }))
}
