//! Test fixtures for common types.

use lectern_core::{Identity, RawCredential, Role, Token};

/// Teacher `t1`.
#[must_use]
pub fn teacher() -> Identity {
    Identity::new("t1", Role::Teacher)
}

/// Student `s1`.
#[must_use]
pub fn student() -> Identity {
    Identity::new("s1", Role::Student)
}

/// Student with a specific id.
#[must_use]
pub fn student_named(id: &str) -> Identity {
    Identity::new(id, Role::Student)
}

/// A user who both teaches and studies.
#[must_use]
pub fn teaching_assistant() -> Identity {
    Identity::new("ta1", Role::Both)
}

/// An `Authorization: Bearer <token>` credential.
#[must_use]
pub fn bearer(token: &Token) -> RawCredential {
    RawCredential::header(format!("Bearer {token}"))
}

/// A session-cookie credential.
#[must_use]
pub fn cookie(token: &Token) -> RawCredential {
    RawCredential::cookie(token.value())
}
