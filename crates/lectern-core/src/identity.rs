//! Identities resolved from session tokens.
//!
//! The host's identity provider decides who a user is and which role they
//! hold; this module only carries that answer around. An [`Identity`] always
//! has at least one role: the "neither teacher nor student" state is not
//! representable, so it is rejected when an identity is built from the
//! legacy pair of flags.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AccessError, AccessResult};

/// Opaque user identifier, as assigned by the backing application.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap an application user identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A caller-supplied identifier naming the record an operation acts on
/// (a student id, a teacher id, ...). Compared to user ids by string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceRef(String);

impl ResourceRef {
    /// Wrap a resource identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this reference names the given user.
    #[must_use]
    pub fn refers_to(&self, user: &UserId) -> bool {
        self.0 == user.0
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ResourceRef {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The role(s) an identity holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A teacher only.
    Teacher,
    /// A student only.
    Student,
    /// Both a teacher and a student (e.g. a teaching assistant).
    Both,
}

impl Role {
    /// Build a role from the pair of legacy flags.
    ///
    /// Returns `None` when neither flag is set.
    #[must_use]
    pub const fn from_flags(is_teacher: bool, is_student: bool) -> Option<Self> {
        match (is_teacher, is_student) {
            (true, true) => Some(Self::Both),
            (true, false) => Some(Self::Teacher),
            (false, true) => Some(Self::Student),
            (false, false) => None,
        }
    }

    /// Whether this role includes teaching.
    #[must_use]
    pub const fn is_teacher(self) -> bool {
        matches!(self, Self::Teacher | Self::Both)
    }

    /// Whether this role includes studying.
    #[must_use]
    pub const fn is_student(self) -> bool {
        matches!(self, Self::Student | Self::Both)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Teacher => write!(f, "teacher"),
            Self::Student => write!(f, "student"),
            Self::Both => write!(f, "teacher+student"),
        }
    }
}

/// The wire shape of an identity: a user id plus the two role flags.
///
/// This is what hosts exchange; converting it into an [`Identity`] is where
/// an identity with no role is refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityFlags {
    /// Application user identifier.
    pub user_id: UserId,
    /// Whether the user is a teacher.
    #[serde(default)]
    pub is_teacher: bool,
    /// Whether the user is a student.
    #[serde(default)]
    pub is_student: bool,
}

/// An authenticated user: who they are and what role they hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IdentityFlags", into = "IdentityFlags")]
pub struct Identity {
    user_id: UserId,
    role: Role,
}

impl Identity {
    /// Create an identity with a known role.
    #[must_use]
    pub fn new(user_id: impl Into<UserId>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// Create an identity from the legacy pair of role flags.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::IllegitimateUser`] if neither flag is set.
    pub fn from_flags(
        user_id: impl Into<UserId>,
        is_teacher: bool,
        is_student: bool,
    ) -> AccessResult<Self> {
        let role = Role::from_flags(is_teacher, is_student).ok_or(AccessError::IllegitimateUser)?;
        Ok(Self::new(user_id, role))
    }

    /// The user's identifier.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The user's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the user holds the teacher role.
    #[must_use]
    pub fn is_teacher(&self) -> bool {
        self.role.is_teacher()
    }

    /// Whether the user holds the student role.
    #[must_use]
    pub fn is_student(&self) -> bool {
        self.role.is_student()
    }

    /// Whether `resource` names this user.
    #[must_use]
    pub fn owns(&self, resource: &ResourceRef) -> bool {
        resource.refers_to(&self.user_id)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.user_id, self.role)
    }
}

impl TryFrom<IdentityFlags> for Identity {
    type Error = AccessError;

    fn try_from(flags: IdentityFlags) -> AccessResult<Self> {
        Self::from_flags(flags.user_id, flags.is_teacher, flags.is_student)
    }
}

impl From<Identity> for IdentityFlags {
    fn from(identity: Identity) -> Self {
        Self {
            is_teacher: identity.is_teacher(),
            is_student: identity.is_student(),
            user_id: identity.user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_flags() {
        assert_eq!(Role::from_flags(true, false), Some(Role::Teacher));
        assert_eq!(Role::from_flags(false, true), Some(Role::Student));
        assert_eq!(Role::from_flags(true, true), Some(Role::Both));
        assert_eq!(Role::from_flags(false, false), None);
    }

    #[test]
    fn test_both_role_has_both_capabilities() {
        let ta = Identity::new("ta1", Role::Both);
        assert!(ta.is_teacher());
        assert!(ta.is_student());
    }

    #[test]
    fn test_identity_without_role_is_illegitimate() {
        assert_eq!(
            Identity::from_flags("u1", false, false),
            Err(AccessError::IllegitimateUser)
        );
    }

    #[test]
    fn test_ownership_is_string_equality() {
        let student = Identity::new("s1", Role::Student);
        assert!(student.owns(&ResourceRef::from("s1")));
        assert!(!student.owns(&ResourceRef::from("s2")));
        assert!(!student.owns(&ResourceRef::from("S1")));
    }

    #[test]
    fn test_serde_uses_flags() {
        let teacher = Identity::new("t1", Role::Teacher);
        let json = serde_json::to_value(&teacher).unwrap();
        assert_eq!(json["user_id"], "t1");
        assert_eq!(json["is_teacher"], true);
        assert_eq!(json["is_student"], false);

        let back: Identity = serde_json::from_value(json).unwrap();
        assert_eq!(back, teacher);
    }

    #[test]
    fn test_deserializing_roleless_identity_fails() {
        let json = r#"{"user_id":"ghost","is_teacher":false,"is_student":false}"#;
        assert!(serde_json::from_str::<Identity>(json).is_err());

        let json = r#"{"user_id":"ghost"}"#;
        assert!(serde_json::from_str::<Identity>(json).is_err());
    }
}
