//! Session listing derived from stored conversations.

use tracing::warn;

use twin_types::error::StoreError;
use twin_types::session::SessionSummary;

use super::store::HistoryStore;

/// Summarize every persisted session, sorted by id.
///
/// Records that fail to load or decode are skipped and logged; only a
/// failure to enumerate the store fails the listing.
pub async fn summarize_sessions<S: HistoryStore>(
    store: &S,
) -> Result<Vec<SessionSummary>, StoreError> {
    let ids = store.list_sessions().await?;
    let mut summaries = Vec::with_capacity(ids.len());

    for session_id in ids {
        match store.load(&session_id).await {
            Ok(turns) => summaries.push(SessionSummary {
                last_message: turns.last().map(|t| t.content.clone()),
                message_count: turns.len(),
                session_id,
            }),
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Skipping unreadable session");
            }
        }
    }

    summaries.sort_by(|a, b| a.session_id.cmp(&b.session_id));
    Ok(summaries)
}
