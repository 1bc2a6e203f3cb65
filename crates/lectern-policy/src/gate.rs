//! The host-facing entry point.

use std::fmt;
use std::sync::Arc;

use lectern_core::{
    AccessResult, DEFAULT_SESSION_COOKIE, Identity, RawCredential, Token, UserId,
};
use lectern_sessions::SessionStore;
use tracing::info;

use crate::engine::PolicyEngine;
use crate::guard::OperationArgs;
use crate::table::{PolicyTable, PolicyTableResult};

/// Session store, policy engine and policy table wired together.
///
/// A host builds one `Gate` at startup, shares it across request handlers,
/// and calls [`Gate::authorize`] before every protected operation.
#[derive(Clone)]
pub struct Gate {
    store: Arc<dyn SessionStore>,
    engine: PolicyEngine,
    table: Arc<PolicyTable>,
    cookie_name: String,
}

impl Gate {
    /// Wire `store` and `table` together.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, table: PolicyTable) -> Self {
        Self {
            engine: PolicyEngine::new(Arc::clone(&store)),
            store,
            table: Arc::new(table),
            cookie_name: DEFAULT_SESSION_COOKIE.to_owned(),
        }
    }

    /// Read session tokens from the cookie called `name`.
    #[must_use]
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Start a session for an identity the host has already authenticated.
    ///
    /// # Errors
    ///
    /// Fails if the store is shut down or cannot find a free token.
    pub fn sign_in(&self, identity: Identity) -> AccessResult<Token> {
        self.store.issue(identity)
    }

    /// End the session for `token`. Returns whether one existed.
    pub fn sign_out(&self, token: &Token) -> bool {
        self.store.revoke(token)
    }

    /// End every session `user` holds. Returns how many were ended.
    pub fn sign_out_everywhere(&self, user: &UserId) -> usize {
        self.store.revoke_user(user)
    }

    /// Drop all sessions and refuse further sign-ins.
    pub fn shutdown(&self) -> usize {
        let dropped = self.store.shutdown();
        info!(dropped, operations = self.table.len(), "gate shut down");
        dropped
    }

    /// Build a credential from the raw `Authorization` and `Cookie` header values.
    ///
    /// The bearer header wins when it carries anything; otherwise the session
    /// cookie is looked up by name in the cookie header.
    #[must_use]
    pub fn credential_from(
        &self,
        authorization: Option<&str>,
        cookie_header: Option<&str>,
    ) -> RawCredential {
        let cookie = cookie_header.and_then(|header| self.cookie_value(header));
        RawCredential::from_sources(authorization, cookie)
    }

    /// Find this gate's session cookie in a `Cookie` header value.
    #[must_use]
    pub fn cookie_value<'a>(&self, cookie_header: &'a str) -> Option<&'a str> {
        cookie_header.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name.trim() == self.cookie_name).then_some(value.trim())
        })
    }

    /// Check the caller of `operation`.
    ///
    /// # Errors
    ///
    /// Unregistered operations and every deny path surface as a
    /// [`PolicyTableError`](crate::PolicyTableError).
    pub fn authorize(
        &self,
        operation: &str,
        credential: &RawCredential,
        args: &OperationArgs,
    ) -> PolicyTableResult<Identity> {
        self.table.authorize(&self.engine, operation, credential, args)
    }

    /// The policy engine.
    #[must_use]
    pub fn engine(&self) -> &PolicyEngine {
        &self.engine
    }

    /// The session store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// The policy table.
    #[must_use]
    pub fn table(&self) -> &PolicyTable {
        &self.table
    }

    /// The session cookie name.
    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("sessions", &self.store.len())
            .field("operations", &self.table.len())
            .field("cookie_name", &self.cookie_name)
            .finish_non_exhaustive()
    }
}
