use crate::model::SessionEntry;
use ::anyhow::Result;

/// Per-session answer history. Owned by the caller and injected into the
/// vote recorder, so recording a vote keeps no process-global state.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Appends `entry` and returns the session's history including it.
    async fn append(
        &self,
        session_id: &str,
        entry: SessionEntry,
    ) -> Result<Vec<SessionEntry>>;
}
