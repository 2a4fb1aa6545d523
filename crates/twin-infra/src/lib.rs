//! Infrastructure layer for Twin.
//!
//! Contains implementations of the traits defined in `twin-core`: the
//! local-file and object-storage history stores, the OpenAI-compatible
//! completion provider, persona artifact loading, and configuration loading.

pub mod config;
pub mod history;
pub mod llm;
pub mod persona;
