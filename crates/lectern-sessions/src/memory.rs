//! In-memory session store.
//!
//! Sessions are held in a sharded [`DashMap`]: each token hashes to one
//! shard, and every operation on that token runs under the shard's lock.
//! A `resolve` racing a `revoke` therefore sees either the whole entry or
//! nothing, while tokens in other shards proceed in parallel.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use lectern_core::{AccessError, AccessResult, Identity, Token, UserId};
use tracing::{debug, info, warn};

use crate::source::{MintedTokens, TokenSource};
use crate::store::{SessionEntry, SessionStore};

/// Default number of draws `issue` makes before giving up on collisions.
pub const DEFAULT_MAX_ISSUE_ATTEMPTS: u32 = 8;

/// Concurrent in-memory session store.
pub struct InMemorySessionStore {
    sessions: DashMap<Token, SessionEntry>,
    source: Arc<dyn TokenSource>,
    max_issue_attempts: u32,
    open: AtomicBool,
}

impl InMemorySessionStore {
    /// Create an empty store that mints tokens under a fresh process-local key.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(Arc::new(MintedTokens::generate()))
    }

    /// Create an empty store drawing tokens from `source`.
    #[must_use]
    pub fn with_source(source: Arc<dyn TokenSource>) -> Self {
        Self {
            sessions: DashMap::new(),
            source,
            max_issue_attempts: DEFAULT_MAX_ISSUE_ATTEMPTS,
            open: AtomicBool::new(true),
        }
    }

    /// Set how many draws `issue` makes before failing. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_issue_attempts(mut self, attempts: u32) -> Self {
        self.max_issue_attempts = attempts.max(1);
        self
    }

    /// Wrap in an `Arc` for sharing across request handlers.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InMemorySessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemorySessionStore")
            .field("sessions", &self.sessions.len())
            .field("max_issue_attempts", &self.max_issue_attempts)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

impl SessionStore for InMemorySessionStore {
    fn issue(&self, identity: Identity) -> AccessResult<Token> {
        if !self.is_open() {
            return Err(AccessError::StoreClosed);
        }

        for _ in 0..self.max_issue_attempts {
            let candidate = self.source.draw()?;
            match self.sessions.entry(candidate) {
                Entry::Occupied(live) => {
                    warn!(
                        token = %live.key().redacted(),
                        "drawn token collides with a live session, drawing again"
                    );
                },
                Entry::Vacant(slot) => {
                    let token = slot.key().clone();
                    let user = identity.user_id().clone();
                    let role = identity.role();
                    slot.insert(SessionEntry::new(token.clone(), identity));

                    // A shutdown that ran between the open check and the
                    // insert must not leave this session behind.
                    if !self.is_open() {
                        self.sessions.remove(&token);
                        return Err(AccessError::StoreClosed);
                    }
                    debug!(%user, %role, token = %token.redacted(), "session issued");
                    return Ok(token);
                },
            }
        }

        warn!(
            attempts = self.max_issue_attempts,
            "every drawn token collided with a live session"
        );
        Err(AccessError::TokenSpaceExhausted {
            attempts: self.max_issue_attempts,
        })
    }

    fn revoke(&self, token: &Token) -> bool {
        match self.sessions.remove(token) {
            Some((_, entry)) => {
                debug!(
                    user = %entry.identity().user_id(),
                    token = %token.redacted(),
                    "session revoked"
                );
                true
            },
            None => false,
        }
    }

    fn resolve(&self, token: &Token) -> AccessResult<Identity> {
        self.sessions
            .get(token)
            .map(|entry| entry.identity().clone())
            .ok_or(AccessError::UnknownToken)
    }

    fn exists(&self, token: &Token) -> bool {
        self.sessions.contains_key(token)
    }

    fn revoke_user(&self, user: &UserId) -> usize {
        let mut removed: usize = 0;
        self.sessions.retain(|_, entry| {
            let keep = entry.identity().user_id() != user;
            if !keep {
                removed = removed.saturating_add(1);
            }
            keep
        });
        debug!(%user, removed, "revoked all sessions for user");
        removed
    }

    fn sessions_for(&self, user: &UserId) -> Vec<SessionEntry> {
        let mut entries: Vec<SessionEntry> = self
            .sessions
            .iter()
            .filter(|entry| entry.identity().user_id() == user)
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by(|a, b| a.token().cmp(b.token()));
        entries
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }

    fn shutdown(&self) -> usize {
        self.open.store(false, Ordering::SeqCst);
        let mut dropped: usize = 0;
        self.sessions.retain(|_, _| {
            dropped = dropped.saturating_add(1);
            false
        });
        info!(dropped, "session store shut down");
        dropped
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::Role;
    use std::collections::{HashSet, VecDeque};
    use std::sync::{Mutex, OnceLock, Weak};

    /// Hands out a fixed script of token values, repeating the last one.
    struct Script(Mutex<VecDeque<&'static str>>);

    impl Script {
        fn new(values: &[&'static str]) -> Arc<Self> {
            Arc::new(Self(Mutex::new(values.iter().copied().collect())))
        }
    }

    impl TokenSource for Script {
        fn draw(&self) -> AccessResult<Token> {
            let mut queue = self.0.lock().unwrap();
            let value = if queue.len() > 1 {
                queue.pop_front().unwrap()
            } else {
                *queue.front().unwrap()
            };
            Token::new(value)
        }
    }

    /// Shuts the store down from inside `draw`, after `issue` has passed
    /// its open check but before the drawn token is inserted.
    struct ShutdownOnDraw(OnceLock<Weak<InMemorySessionStore>>);

    impl TokenSource for ShutdownOnDraw {
        fn draw(&self) -> AccessResult<Token> {
            if let Some(store) = self.0.get().and_then(Weak::upgrade) {
                store.shutdown();
            }
            Token::new("late-token")
        }
    }

    fn teacher() -> Identity {
        Identity::new("t1", Role::Teacher)
    }

    fn student() -> Identity {
        Identity::new("s1", Role::Student)
    }

    #[test]
    fn test_issue_then_resolve() {
        let store = InMemorySessionStore::new();
        let token = store.issue(teacher()).unwrap();
        assert_eq!(store.resolve(&token).unwrap(), teacher());
        assert!(store.exists(&token));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_revoke_then_resolve_fails() {
        let store = InMemorySessionStore::new();
        let token = store.issue(student()).unwrap();
        assert!(store.revoke(&token));
        assert_eq!(store.resolve(&token), Err(AccessError::UnknownToken));
        assert!(!store.exists(&token));
    }

    #[test]
    fn test_revoke_unknown_is_noop() {
        let store = InMemorySessionStore::new();
        let kept = store.issue(student()).unwrap();
        assert!(!store.revoke(&Token::new("never-issued").unwrap()));
        assert!(store.exists(&kept));
    }

    #[test]
    fn test_resolve_unknown_token() {
        let store = InMemorySessionStore::new();
        assert_eq!(
            store.resolve(&Token::new("nope").unwrap()),
            Err(AccessError::UnknownToken)
        );
    }

    #[test]
    fn test_issued_tokens_are_unique() {
        let store = InMemorySessionStore::new();
        let tokens: HashSet<Token> = (0..10_000)
            .map(|i| store.issue(Identity::new(format!("s{i}"), Role::Student)).unwrap())
            .collect();
        assert_eq!(tokens.len(), 10_000);
        assert_eq!(store.len(), 10_000);
    }

    #[test]
    fn test_collision_draws_again() {
        let store = InMemorySessionStore::with_source(Script::new(&["A", "A", "B"]));
        let first = store.issue(teacher()).unwrap();
        let second = store.issue(student()).unwrap();
        assert_eq!(first.value(), "A");
        assert_eq!(second.value(), "B");
        assert_eq!(store.resolve(&first).unwrap(), teacher());
        assert_eq!(store.resolve(&second).unwrap(), student());
    }

    #[test]
    fn test_exhaustion_never_clobbers_live_session() {
        let store = InMemorySessionStore::with_source(Script::new(&["A"])).with_max_issue_attempts(3);
        let first = store.issue(teacher()).unwrap();
        assert_eq!(
            store.issue(student()),
            Err(AccessError::TokenSpaceExhausted { attempts: 3 })
        );
        assert_eq!(store.resolve(&first).unwrap(), teacher());
    }

    #[test]
    fn test_shutdown_clears_and_closes() {
        let store = InMemorySessionStore::new();
        let token = store.issue(teacher()).unwrap();
        store.issue(student()).unwrap();

        assert_eq!(store.shutdown(), 2);
        assert!(!store.is_open());
        assert!(store.is_empty());
        assert_eq!(store.resolve(&token), Err(AccessError::UnknownToken));
        assert_eq!(store.issue(teacher()), Err(AccessError::StoreClosed));
    }

    #[test]
    fn test_shutdown_during_issue_leaves_no_session() {
        let source = Arc::new(ShutdownOnDraw(OnceLock::new()));
        let store = Arc::new(InMemorySessionStore::with_source(source.clone()));
        source.0.set(Arc::downgrade(&store)).unwrap();

        assert_eq!(store.issue(teacher()), Err(AccessError::StoreClosed));
        assert!(!store.is_open());
        assert!(store.is_empty());
        assert!(!store.exists(&Token::new("late-token").unwrap()));
    }

    #[test]
    fn test_revoke_user_signs_out_everywhere() {
        let store = InMemorySessionStore::new();
        let a = store.issue(student()).unwrap();
        let b = store.issue(student()).unwrap();
        let other = store.issue(teacher()).unwrap();

        assert_eq!(store.revoke_user(&UserId::from("s1")), 2);
        assert!(!store.exists(&a));
        assert!(!store.exists(&b));
        assert!(store.exists(&other));
    }

    #[test]
    fn test_sessions_for_is_sorted() {
        let store = InMemorySessionStore::with_source(Script::new(&["c", "a", "b", "z"]));
        store.issue(student()).unwrap();
        store.issue(student()).unwrap();
        store.issue(student()).unwrap();
        store.issue(teacher()).unwrap();

        let entries = store.sessions_for(&UserId::from("s1"));
        let tokens: Vec<&str> = entries.iter().map(|e| e.token().value()).collect();
        assert_eq!(tokens, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_concurrent_issue_and_resolve() {
        let store = Arc::new(InMemorySessionStore::new());
        std::thread::scope(|scope| {
            for worker in 0..8 {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    for i in 0..250 {
                        let identity = Identity::new(format!("s{worker}-{i}"), Role::Student);
                        let token = store.issue(identity.clone()).unwrap();
                        assert_eq!(store.resolve(&token).unwrap(), identity);
                    }
                });
            }
        });
        assert_eq!(store.len(), 2_000);
    }

    #[test]
    fn test_resolve_racing_revoke_sees_all_or_nothing() {
        let store = Arc::new(InMemorySessionStore::new());
        let tokens: Vec<Token> = (0..500).map(|_| store.issue(teacher()).unwrap()).collect();

        std::thread::scope(|scope| {
            let revoker = Arc::clone(&store);
            let to_revoke = tokens.clone();
            scope.spawn(move || {
                for token in &to_revoke {
                    revoker.revoke(token);
                }
            });
            let reader = Arc::clone(&store);
            scope.spawn(move || {
                for token in &tokens {
                    match reader.resolve(token) {
                        Ok(identity) => assert_eq!(identity, teacher()),
                        Err(err) => assert_eq!(err, AccessError::UnknownToken),
                    }
                }
            });
        });
        assert!(store.is_empty());
    }
}
