//! Server-side session store.
//!
//! Sessions are keyed by the SHA-256 of the opaque cookie token, so the
//! raw token only ever exists in the client's cookie jar.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use shared::crypto::{generate_session_token, is_session_token, sha256_hex};
use tokio::sync::RwLock;

/// A live login session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// In-memory map from token hash to session.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: chrono::Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(365)),
        }
    }

    /// Session lifetime in whole seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Opens a session for `user_id` and returns the raw token.
    pub async fn create(&self, user_id: i32) -> String {
        let token = generate_session_token();
        let now = Utc::now();
        let session = Session {
            user_id,
            created_at: now,
            expires_at: now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        self.sessions.write().await.insert(sha256_hex(&token), session);
        token
    }

    /// Returns the live session for `token`, if any.
    pub async fn resolve(&self, token: &str) -> Option<Session> {
        if !is_session_token(token) {
            return None;
        }

        let sessions = self.sessions.read().await;
        sessions
            .get(&sha256_hex(token))
            .filter(|session| !session.is_expired(Utc::now()))
            .cloned()
    }

    /// Revokes the session for `token`. Returns whether one existed.
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions
            .write()
            .await
            .remove(&sha256_hex(token))
            .is_some()
    }

    /// Removes expired sessions and returns how many were dropped.
    pub async fn prune_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        before - sessions.len()
    }

    /// Number of stored sessions, including expired ones not yet pruned.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_resolve() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create(7).await;

        let session = store.resolve(&token).await.unwrap();
        assert_eq!(session.user_id, 7);
        assert!(session.expires_at > session.created_at);
        assert_eq!(store.ttl_secs(), 60);
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let store = SessionStore::new(Duration::from_secs(60));
        let a = store.create(1).await;
        let b = store.create(1).await;
        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_tokens() {
        let store = SessionStore::new(Duration::from_secs(60));
        store.create(1).await;

        assert!(store.resolve("chs_AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA").await.is_none());
        assert!(store.resolve("not-a-token").await.is_none());
        assert!(store.resolve("").await.is_none());
    }

    #[tokio::test]
    async fn test_revoke() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create(1).await;

        assert!(store.revoke(&token).await);
        assert!(store.resolve(&token).await.is_none());
        assert!(!store.revoke(&token).await);
    }

    #[tokio::test]
    async fn test_expired_session_is_unauthenticated() {
        let store = SessionStore::new(Duration::ZERO);
        let token = store.create(1).await;
        assert!(store.resolve(&token).await.is_none());
    }

    #[tokio::test]
    async fn test_prune_expired() {
        let expired = SessionStore::new(Duration::ZERO);
        expired.create(1).await;
        expired.create(2).await;
        assert_eq!(expired.prune_expired().await, 2);
        assert!(expired.is_empty().await);

        let live = SessionStore::new(Duration::from_secs(60));
        live.create(1).await;
        assert_eq!(live.prune_expired().await, 0);
        assert_eq!(live.len().await, 1);
    }
}
