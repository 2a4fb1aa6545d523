//! JSON encoding of conversation records.
//!
//! The record format is shared by every backend: a pretty-printed JSON array
//! (two-space indent, non-ASCII left unescaped) of `{role, content[, timestamp]}`.

use twin_types::error::StoreError;
use twin_types::session::SessionId;
use twin_types::turn::Turn;

/// File name / object key suffix for conversation records.
pub const RECORD_EXTENSION: &str = "json";

/// Serialize turns to the on-disk record format.
pub fn encode_turns(turns: &[Turn]) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec_pretty(turns).map_err(|e| StoreError::Encode(e.to_string()))
}

/// Parse a record back into turns.
pub fn decode_turns(session_id: &SessionId, bytes: &[u8]) -> Result<Vec<Turn>, StoreError> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Decode {
        session_id: session_id.to_string(),
        message: e.to_string(),
    })
}

/// Record name for a session: `{session_id}.json`.
pub fn record_name(session_id: &SessionId) -> String {
    format!("{session_id}.{RECORD_EXTENSION}")
}

/// Recover the session id from a record name, if it is one.
///
/// Temporary files and foreign names yield `None`.
pub fn session_id_from_record_name(name: &str) -> Option<SessionId> {
    let stem = name.strip_suffix(RECORD_EXTENSION)?.strip_suffix('.')?;
    stem.parse().ok()
}
