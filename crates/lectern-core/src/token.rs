//! Session tokens - the opaque bearer credential.
//!
//! A token is a lookup key and nothing more: the access-control code never
//! inspects its contents. Equality and ordering delegate to the string value.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AccessError, AccessResult};

/// Number of leading characters kept by [`Token::redacted`].
const REDACTED_PREFIX_CHARS: usize = 6;

/// An opaque, non-empty session token.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Token(String);

impl Token {
    /// Create a token from its string form.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::InvalidToken`] if `value` is empty.
    pub fn new(value: impl Into<String>) -> AccessResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(AccessError::InvalidToken);
        }
        Ok(Self(value))
    }

    /// The canonical string form.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    /// Alias for [`Token::value`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A log-safe rendering: the first few characters followed by an ellipsis.
    #[must_use]
    pub fn redacted(&self) -> String {
        match self.0.char_indices().nth(REDACTED_PREFIX_CHARS) {
            Some((cut, _)) => format!("{}…", &self.0[..cut]),
            None => "…".to_owned(),
        }
    }

    /// Consume the token and return the owned string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({})", self.redacted())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Token {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Token {
    type Error = AccessError;

    fn try_from(value: String) -> AccessResult<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Token {
    type Error = AccessError;

    fn try_from(value: &str) -> AccessResult<Self> {
        Self::new(value)
    }
}

impl FromStr for Token {
    type Err = AccessError;

    fn from_str(s: &str) -> AccessResult<Self> {
        Self::new(s)
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}
