//! HTTP request handlers organized by resource.

pub mod chat;
pub mod meta;
pub mod session;
