//! Service metadata handlers.
//!
//! Endpoints:
//! - GET /        - Service banner
//! - GET /health  - Liveness and active storage backend

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use twin_types::config::StorageBackend;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub memory_enabled: bool,
    pub storage: StorageBackend,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub use_s3: bool,
    pub storage: StorageBackend,
    pub version: &'static str,
}

/// GET / - Service banner.
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "AI Digital Twin API with Memory",
        memory_enabled: true,
        storage: state.chat_service.backend(),
    })
}

/// GET /health - Liveness check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let storage = state.chat_service.backend();
    Json(HealthResponse {
        status: "healthy",
        use_s3: storage == StorageBackend::S3,
        storage,
        version: env!("CARGO_PKG_VERSION"),
    })
}
