use ::std::num::NonZeroUsize;
use ::std::time::{Duration, Instant};

use crate::model::SessionEntry;
use crate::session::providers::interface;

struct Session {
    touched: Instant,
    entries: Vec<SessionEntry>,
}

/// Keeps at most `capacity` sessions, evicting the least recently used.
/// A session idle for longer than `ttl` is treated as empty.
pub struct MemoryProvider {
    sessions: ::tokio::sync::Mutex<::lru::LruCache<String, Session>>,
    ttl: Duration,
}

impl MemoryProvider {
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        MemoryProvider {
            sessions: ::tokio::sync::Mutex::new(::lru::LruCache::new(capacity)),
            ttl,
        }
    }

    fn live_entries(
        sessions: &mut ::lru::LruCache<String, Session>,
        session_id: &str,
        ttl: Duration,
        now: Instant,
    ) -> Vec<SessionEntry> {
        let expired = match sessions.peek(session_id) {
            Some(session) => now.duration_since(session.touched) > ttl,
            None => return vec![],
        };

        if expired {
            sessions.pop(session_id);
            return vec![];
        }

        sessions
            .get(session_id)
            .map(|session| session.entries.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl interface::SessionStore for MemoryProvider {
    async fn append(
        &self,
        session_id: &str,
        entry: SessionEntry,
    ) -> Result<Vec<SessionEntry>, anyhow::Error> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;

        let mut entries =
            Self::live_entries(&mut sessions, session_id, self.ttl, now);
        entries.push(entry);

        sessions.put(
            session_id.to_string(),
            Session {
                touched: now,
                entries: entries.clone(),
            },
        );

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;

    fn entry(question_id: &str, option_code: &str) -> SessionEntry {
        SessionEntry {
            question_id: question_id.to_string(),
            option_code: option_code.to_string(),
        }
    }

    fn capacity(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[tokio::test]
    async fn test_append_returns_full_history() {
        let store =
            MemoryProvider::new(capacity(8), Duration::from_secs(3600));

        assert_eq!(
            store.append("s1", entry("Q1", "A")).await.unwrap(),
            vec![entry("Q1", "A")]
        );
        assert_eq!(
            store.append("s1", entry("Q2", "X")).await.unwrap(),
            vec![entry("Q1", "A"), entry("Q2", "X")]
        );
        assert_eq!(
            store.append("s2", entry("Q1", "B")).await.unwrap(),
            vec![entry("Q1", "B")]
        );
    }

    #[tokio::test]
    async fn test_least_recently_used_session_is_evicted() {
        let store =
            MemoryProvider::new(capacity(2), Duration::from_secs(3600));

        store.append("s1", entry("Q1", "A")).await.unwrap();
        store.append("s2", entry("Q1", "B")).await.unwrap();
        store.append("s1", entry("Q2", "X")).await.unwrap();
        store.append("s3", entry("Q1", "A")).await.unwrap();

        // s2 was the least recently used when s3 arrived.
        assert_eq!(store.append("s1", entry("Q3", "A")).await.unwrap().len(), 3);
        assert_eq!(
            store.append("s2", entry("Q2", "Y")).await.unwrap(),
            vec![entry("Q2", "Y")]
        );
    }

    #[tokio::test]
    async fn test_idle_session_expires() {
        let store = MemoryProvider::new(capacity(8), Duration::from_millis(20));

        store.append("s1", entry("Q1", "A")).await.unwrap();
        ::tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(
            store.append("s1", entry("Q2", "B")).await.unwrap(),
            vec![entry("Q2", "B")]
        );
    }

    #[tokio::test]
    async fn test_noop_keeps_no_history() {
        let store = crate::session::providers::noop::NoopProvider::new();

        assert_eq!(
            store.append("s1", entry("Q1", "A")).await.unwrap(),
            vec![entry("Q1", "A")]
        );
        assert_eq!(
            store.append("s1", entry("Q2", "X")).await.unwrap(),
            vec![entry("Q2", "X")]
        );
    }
}
