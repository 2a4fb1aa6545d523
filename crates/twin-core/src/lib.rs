//! Business logic and storage/provider trait definitions for Twin.
//!
//! This crate defines the "ports" (the `HistoryStore` and `LlmProvider`
//! traits) that the infrastructure layer implements, plus the chat
//! orchestration and persona assembly built on top of them. It depends only
//! on `twin-types` -- never on `twin-infra` or any I/O crate.

pub mod chat;
pub mod history;
pub mod llm;
pub mod persona;
