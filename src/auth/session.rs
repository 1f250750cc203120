//! Registry of live sessions.
//!
//! A token is only honoured while its session is in the registry, which is
//! what makes logout work for otherwise self-contained tokens.

use std::time::Duration;

use dashmap::DashMap;
use time::OffsetDateTime;

use crate::model::Id;
use crate::util::id::new_session_id;

/// Longest session lifetime accepted; longer requests are clamped.
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Id,
    pub expires_at: OffsetDateTime,
}

#[derive(Debug)]
pub struct SessionManager {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

/// A freshly opened session.
#[derive(Debug, Clone)]
pub struct Opened {
    pub sid: String,
    pub issued_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self { sessions: DashMap::new(), ttl: ttl.min(MAX_TTL) }
    }

    pub fn open(&self, user_id: Id, now: OffsetDateTime) -> Opened {
        let sid = new_session_id();
        let expires_at = now + self.ttl;
        self.sessions.insert(sid.clone(), Session { user_id, expires_at });
        Opened { sid, issued_at: now, expires_at }
    }

    /// The user behind a live session.
    pub fn lookup(&self, sid: &str, now: OffsetDateTime) -> Option<Id> {
        self.sessions
            .get(sid)
            .filter(|s| s.expires_at > now)
            .map(|s| s.user_id)
    }

    pub fn revoke(&self, sid: &str) -> bool {
        self.sessions.remove(sid).is_some()
    }

    /// Drop every session belonging to `user_id`, e.g. on ban.
    pub fn revoke_user(&self, user_id: Id) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.user_id != user_id);
        before.saturating_sub(self.sessions.len())
    }

    pub fn prune_expired(&self, now: OffsetDateTime) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.expires_at > now);
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
