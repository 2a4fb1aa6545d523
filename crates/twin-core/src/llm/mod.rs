//! LLM provider abstractions for Twin.
//!
//! - `LlmProvider`: RPITIT trait for concrete completion API clients
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch

pub mod box_provider;
pub mod provider;
