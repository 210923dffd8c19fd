use crate::model::SessionEntry;
use crate::session::providers::interface;

pub struct NoopProvider;

impl NoopProvider {
    pub fn new() -> Self {
        NoopProvider
    }
}

impl Default for NoopProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl interface::SessionStore for NoopProvider {
    async fn append(
        &self,
        _session_id: &str,
        entry: SessionEntry,
    ) -> Result<Vec<SessionEntry>, anyhow::Error> {
        Ok(vec![entry])
    }
}
