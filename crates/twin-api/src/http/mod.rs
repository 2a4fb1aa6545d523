//! HTTP API layer for Twin.
//!
//! Axum router serving `/`, `/health`, `/chat` and `/sessions` with CORS
//! and request tracing.

pub mod error;
pub mod handlers;
pub mod router;
