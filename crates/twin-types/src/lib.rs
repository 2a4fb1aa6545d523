//! Shared domain types for Twin.
//!
//! This crate contains the core domain types used across the Twin backend:
//! conversation turns, session identifiers and summaries, LLM request and
//! response shapes, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod session;
pub mod turn;
