//! Session storage.
//!
//! A session maps an opaque random id (carried in a cookie) to a username.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

use crate::observability::metrics;

/// A logged-in session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub username: String,
    pub expires_at: Instant,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Capability interface for session persistence.
pub trait SessionStore: Send + Sync {
    /// Open a new session for `username`.
    fn create(&self, username: &str) -> Session;

    /// Look up a live session. Expired sessions are dropped and not returned.
    fn get(&self, id: &Uuid) -> Option<Session>;

    /// End a session, returning it if it existed.
    fn remove(&self, id: &Uuid) -> Option<Session>;

    /// Drop every expired session. Returns how many were removed.
    fn purge_expired(&self) -> usize;

    /// Number of stored sessions (live or not yet purged).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local session store with a fixed time-to-live.
pub struct InMemorySessionStore {
    sessions: DashMap<Uuid, Session>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, username: &str) -> Session {
        let session = Session {
            id: Uuid::new_v4(),
            username: username.to_string(),
            expires_at: Instant::now() + self.ttl,
        };
        self.sessions.insert(session.id, session.clone());
        metrics::record_sessions(self.sessions.len());
        tracing::debug!(username = %username, "Session opened");
        session
    }

    fn get(&self, id: &Uuid) -> Option<Session> {
        let session = self.sessions.get(id)?.value().clone();
        if session.is_expired() {
            self.sessions.remove(id);
            metrics::record_sessions(self.sessions.len());
            return None;
        }
        Some(session)
    }

    fn remove(&self, id: &Uuid) -> Option<Session> {
        let removed = self.sessions.remove(id).map(|(_, s)| s);
        metrics::record_sessions(self.sessions.len());
        removed
    }

    fn purge_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| !s.is_expired());
        let removed = before.saturating_sub(self.sessions.len());
        metrics::record_sessions(self.sessions.len());
        removed
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}
