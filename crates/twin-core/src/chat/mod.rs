//! Chat orchestration for Twin.
//!
//! `ChatService` runs one request end to end: load history, prepend the
//! persona, call the completion API, append the new turn pair and persist.

pub mod service;
