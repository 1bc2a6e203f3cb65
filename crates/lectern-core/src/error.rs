//! Access-control error types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an authenticated identity was refused by a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The identity carries neither the teacher nor the student role.
    NeitherTeacherNorStudent,
    /// The operation is reserved to students.
    NotAStudent,
    /// A student tried to act on somebody else's record.
    NotOwnRecord,
    /// The operation is reserved to teachers.
    NotATeacher,
}

impl DenyReason {
    /// The human-readable reason, as rendered to the host.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NeitherTeacherNorStudent => "neither teacher nor student",
            Self::NotAStudent => "not a student",
            Self::NotOwnRecord => "not own record",
            Self::NotATeacher => "not a teacher",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every way an access check can fail.
///
/// Extraction failures (`MissingCredential`, `MalformedCredential`) never
/// reach the policy engine. Evaluation failures carry enough detail for the
/// host to render an accurate response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No credential was presented.
    #[error("missing credential")]
    MissingCredential,

    /// A credential was presented but does not follow the `Bearer <token>` grammar.
    #[error("malformed credential")]
    MalformedCredential,

    /// A token was built from an empty string.
    #[error("invalid token: token value must not be empty")]
    InvalidToken,

    /// The token is not bound to any live session.
    #[error("unknown token")]
    UnknownToken,

    /// The identity carries no role at all.
    #[error("illegitimate user: identity has neither teacher nor student role")]
    IllegitimateUser,

    /// The token did not resolve to a legitimate identity.
    #[error("unauthenticated")]
    Unauthenticated,

    /// The identity is authenticated but not allowed to perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(DenyReason),

    /// The session store has been shut down and no longer issues tokens.
    #[error("session store is closed")]
    StoreClosed,

    /// Every freshly drawn token collided with a live one.
    #[error("could not draw an unused token after {attempts} attempts")]
    TokenSpaceExhausted {
        /// How many draws were attempted.
        attempts: u32,
    },
}

impl AccessError {
    /// A stable, machine-readable code for this error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::MalformedCredential => "malformed_credential",
            Self::InvalidToken => "invalid_token",
            Self::UnknownToken => "unknown_token",
            Self::IllegitimateUser => "illegitimate_user",
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::StoreClosed => "store_closed",
            Self::TokenSpaceExhausted { .. } => "token_space_exhausted",
        }
    }

    /// Whether the caller should be asked to (re-)authenticate.
    ///
    /// `Forbidden` is not an authentication failure: the caller is known,
    /// just not allowed. Store lifecycle errors are host-side failures.
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential
                | Self::MalformedCredential
                | Self::InvalidToken
                | Self::UnknownToken
                | Self::IllegitimateUser
                | Self::Unauthenticated
        )
    }

    /// The deny reason, if this is a `Forbidden` error.
    #[must_use]
    pub const fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Self::Forbidden(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// Result type for access-control operations.
pub type AccessResult<T> = Result<T, AccessError>;
