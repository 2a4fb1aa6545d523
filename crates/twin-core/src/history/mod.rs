//! Conversation history storage abstractions for Twin.
//!
//! Defines the `HistoryStore` trait, its object-safe wrapper, the shared
//! JSON codec every backend uses and the session listing built on them.
//! Implementations live in twin-infra.

pub mod box_store;
pub mod codec;
pub mod store;
pub mod summary;
