//! Session storage capability and its in-memory implementation

use crate::conversation::session::SessionRecord;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Keyed storage for session records.
///
/// The engine serializes access per session id, so implementations only
/// need to be safe for concurrent access to *different* keys.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns `None` for unknown or expired sessions
    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>>;

    async fn put(&self, record: SessionRecord) -> Result<()>;

    /// Deleting an unknown session is not an error
    async fn delete(&self, session_id: &str) -> Result<()>;

    /// Drop every session idle for longer than the store's TTL, returning how many went
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize>;

    async fn len(&self) -> Result<usize>;
}

/// Process-local store with an optional idle TTL
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
    idle_ttl: Option<Duration>,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl InMemorySessionStore {
    pub fn new(idle_ttl: Option<Duration>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    pub fn with_ttl_minutes(minutes: Option<u64>) -> Self {
        let max_minutes = (i64::MAX / 60_000) as u64;
        let ttl = minutes.map(|m| Duration::minutes(m.min(max_minutes) as i64));
        Self::new(ttl)
    }

    fn is_expired(&self, record: &SessionRecord, now: DateTime<Utc>) -> bool {
        match self.idle_ttl {
            Some(ttl) => now - record.last_active > ttl,
            None => false,
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(session_id) {
                None => return Ok(None),
                Some(record) if !self.is_expired(record, now) => return Ok(Some(record.clone())),
                Some(_) => {}
            }
        }

        let mut sessions = self.sessions.write().await;
        if sessions
            .get(session_id)
            .map_or(false, |record| self.is_expired(record, now))
        {
            sessions.remove(session_id);
            debug!("Session {} expired on read", session_id);
            return Ok(None);
        }
        Ok(sessions.get(session_id).cloned())
    }

    async fn put(&self, record: SessionRecord) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(record.id.clone(), record);
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        if self.idle_ttl.is_none() {
            return Ok(0);
        }

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, record| !self.is_expired(record, now));
        let purged = before - sessions.len();

        if purged > 0 {
            info!("Evicted {} idle sessions", purged);
        }
        Ok(purged)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.sessions.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = InMemorySessionStore::default();
        assert!(store.get("abc").await.unwrap().is_none());

        store.put(SessionRecord::new("abc", Utc::now())).await.unwrap();
        let record = store.get("abc").await.unwrap().unwrap();
        assert_eq!(record.id, "abc");
        assert_eq!(store.len().await.unwrap(), 1);

        store.delete("abc").await.unwrap();
        store.delete("abc").await.unwrap();
        assert!(store.get("abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let store = InMemorySessionStore::with_ttl_minutes(Some(5));
        let now = Utc::now();

        store.put(SessionRecord::new("stale", now - Duration::minutes(10))).await.unwrap();
        store.put(SessionRecord::new("fresh", now)).await.unwrap();

        assert!(store.get("stale").await.unwrap().is_none());
        assert!(store.get("fresh").await.unwrap().is_some());
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = InMemorySessionStore::with_ttl_minutes(Some(5));
        let now = Utc::now();

        for i in 0..3 {
            store
                .put(SessionRecord::new(format!("old-{}", i), now - Duration::minutes(30)))
                .await
                .unwrap();
        }
        store.put(SessionRecord::new("new", now)).await.unwrap();

        assert_eq!(store.purge_expired(now).await.unwrap(), 3);
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_no_ttl_keeps_everything() {
        let store = InMemorySessionStore::with_ttl_minutes(None);
        let old = Utc::now() - Duration::days(30);
        store.put(SessionRecord::new("old", old)).await.unwrap();

        assert_eq!(store.purge_expired(Utc::now()).await.unwrap(), 0);
        assert!(store.get("old").await.unwrap().is_some());
    }
}
