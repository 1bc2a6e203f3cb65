//! The session store abstraction.

use chrono::{DateTime, Utc};
use lectern_core::{AccessResult, Identity, Token, UserId};

/// One live session: a token bound to the identity it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    token: Token,
    identity: Identity,
    issued_at: DateTime<Utc>,
}

impl SessionEntry {
    /// Bind `token` to `identity`, stamped with the current time.
    #[must_use]
    pub fn new(token: Token, identity: Identity) -> Self {
        Self {
            token,
            identity,
            issued_at: Utc::now(),
        }
    }

    /// The session token.
    #[must_use]
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// The identity the token resolves to.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// When the session was issued.
    #[must_use]
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

/// A process-wide, concurrency-safe mapping from token to identity.
///
/// All mutation is atomic per token. Callers never coordinate locking
/// themselves, and operations on unrelated tokens do not serialize behind a
/// single lock.
pub trait SessionStore: Send + Sync {
    /// Bind a fresh, unpredictable token to `identity` and return it.
    ///
    /// Never reuses the value of a live token.
    ///
    /// # Errors
    ///
    /// Returns [`lectern_core::AccessError::StoreClosed`] after
    /// [`SessionStore::shutdown`], or
    /// [`lectern_core::AccessError::TokenSpaceExhausted`] if every draw
    /// collided with a live token.
    fn issue(&self, identity: Identity) -> AccessResult<Token>;

    /// Remove the session for `token`.
    ///
    /// Revoking an unknown token is a no-op. Returns whether a session was
    /// removed.
    fn revoke(&self, token: &Token) -> bool;

    /// Look up the identity bound to `token`.
    ///
    /// # Errors
    ///
    /// Returns [`lectern_core::AccessError::UnknownToken`] if no session
    /// exists for `token`.
    fn resolve(&self, token: &Token) -> AccessResult<Identity>;

    /// Whether a session exists for `token`.
    fn exists(&self, token: &Token) -> bool;

    /// Revoke every session belonging to `user`. Returns how many were removed.
    fn revoke_user(&self, user: &UserId) -> usize;

    /// All live sessions belonging to `user`, ordered by token.
    fn sessions_for(&self, user: &UserId) -> Vec<SessionEntry>;

    /// Number of live sessions.
    fn len(&self) -> usize;

    /// Whether there are no live sessions.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every session and stop issuing new ones.
    ///
    /// Returns how many sessions were dropped.
    fn shutdown(&self) -> usize;

    /// Whether the store still issues tokens.
    fn is_open(&self) -> bool;
}
