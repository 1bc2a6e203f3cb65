//! The policy engine.

use std::fmt;
use std::sync::Arc;

use lectern_core::{AccessError, AccessResult, Identity, RawCredential, ResourceRef, Token};
use lectern_sessions::SessionStore;

use crate::shape::PolicyShape;

/// Resolves tokens and evaluates policy shapes.
///
/// Stateless apart from read access to the session store: no caching and no
/// decision logging. Cheap to clone.
#[derive(Clone)]
pub struct PolicyEngine {
    store: Arc<dyn SessionStore>,
}

impl PolicyEngine {
    /// Create an engine reading from `store`.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// The session store this engine reads from.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Resolve `token` and evaluate `shape` against the resulting identity.
    ///
    /// Returns the identity on success so the protected operation can use it.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Unauthenticated`] if the token does not resolve
    /// (no shape is evaluated in that case), or [`AccessError::Forbidden`] if
    /// the shape refuses the identity.
    pub fn authorize(
        &self,
        token: &Token,
        shape: PolicyShape,
        resource: Option<&ResourceRef>,
    ) -> AccessResult<Identity> {
        let identity = self
            .store
            .resolve(token)
            .map_err(|_| AccessError::Unauthenticated)?;
        shape.evaluate(&identity, resource)?;
        Ok(identity)
    }

    /// Extract a token from `credential`, then [`authorize`](Self::authorize) it.
    ///
    /// # Errors
    ///
    /// Extraction failures surface as [`AccessError::MissingCredential`] or
    /// [`AccessError::MalformedCredential`]; otherwise as for `authorize`.
    pub fn authorize_credential(
        &self,
        credential: &RawCredential,
        shape: PolicyShape,
        resource: Option<&ResourceRef>,
    ) -> AccessResult<Identity> {
        let token = credential.extract()?;
        self.authorize(&token, shape, resource)
    }

    /// Like [`authorize_credential`](Self::authorize_credential), but returns a [`Verdict`].
    #[must_use]
    pub fn verdict(
        &self,
        credential: &RawCredential,
        shape: PolicyShape,
        resource: Option<&ResourceRef>,
    ) -> Verdict {
        self.authorize_credential(credential, shape, resource).into()
    }
}

impl fmt::Debug for PolicyEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyEngine")
            .field("sessions", &self.store.len())
            .finish()
    }
}

/// The outcome of an access check, as handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The operation may proceed on behalf of this identity.
    Allow(Identity),
    /// The operation must not run.
    Deny(AccessError),
}

impl Verdict {
    /// Whether the operation may proceed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }

    /// Convert back into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the deny error for [`Verdict::Deny`].
    pub fn into_result(self) -> AccessResult<Identity> {
        match self {
            Self::Allow(identity) => Ok(identity),
            Self::Deny(err) => Err(err),
        }
    }
}

impl From<AccessResult<Identity>> for Verdict {
    fn from(result: AccessResult<Identity>) -> Self {
        match result {
            Ok(identity) => Self::Allow(identity),
            Err(err) => Self::Deny(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::{DenyReason, Role};
    use lectern_sessions::InMemorySessionStore;

    fn engine() -> PolicyEngine {
        PolicyEngine::new(Arc::new(InMemorySessionStore::new()))
    }

    #[test]
    fn test_unknown_token_is_unauthenticated() {
        let engine = engine();
        let token = Token::new("never-issued").unwrap();
        for shape in PolicyShape::ALL {
            assert_eq!(
                engine.authorize(&token, shape, None),
                Err(AccessError::Unauthenticated)
            );
        }
    }

    #[test]
    fn test_authorize_returns_identity() {
        let engine = engine();
        let teacher = Identity::new("t1", Role::Teacher);
        let token = engine.store().issue(teacher.clone()).unwrap();
        assert_eq!(
            engine.authorize(&token, PolicyShape::TeacherOnly, None),
            Ok(teacher)
        );
    }

    #[test]
    fn test_shape_failure_after_resolution() {
        let engine = engine();
        let token = engine
            .store()
            .issue(Identity::new("s1", Role::Student))
            .unwrap();
        assert_eq!(
            engine.authorize(&token, PolicyShape::TeacherOnly, None),
            Err(AccessError::Forbidden(DenyReason::NotATeacher))
        );
    }

    #[test]
    fn test_extraction_errors_pass_through() {
        let engine = engine();
        assert_eq!(
            engine.authorize_credential(&RawCredential::missing(), PolicyShape::Authenticated, None),
            Err(AccessError::MissingCredential)
        );
        assert_eq!(
            engine.authorize_credential(
                &RawCredential::header("Bear"),
                PolicyShape::Authenticated,
                None
            ),
            Err(AccessError::MalformedCredential)
        );
    }

    #[test]
    fn test_cookie_credential() {
        let engine = engine();
        let token = engine
            .store()
            .issue(Identity::new("s1", Role::Student))
            .unwrap();
        let verdict = engine.verdict(
            &RawCredential::cookie(token.value()),
            PolicyShape::StudentSelf,
            Some(&ResourceRef::from("s1")),
        );
        assert!(verdict.is_allowed());
    }

    #[test]
    fn test_verdict_round_trips_result() {
        let result: AccessResult<Identity> = Err(AccessError::Unauthenticated);
        let deny = Verdict::from(result);
        assert!(!deny.is_allowed());
        assert_eq!(deny.into_result(), Err(AccessError::Unauthenticated));
    }
}
