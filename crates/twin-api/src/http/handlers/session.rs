//! Session listing handler.
//!
//! Endpoint:
//! - GET /sessions  - Every stored session with its last message and turn count

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use twin_types::session::SessionSummary;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionSummary>,
}

/// GET /sessions - List stored sessions.
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<SessionsResponse>, AppError> {
    let sessions = state.chat_service.list_sessions().await?;
    Ok(Json(SessionsResponse { sessions }))
}
