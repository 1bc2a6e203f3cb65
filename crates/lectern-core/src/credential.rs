//! Credential extraction from inbound requests.
//!
//! The host reads one raw string out of the request, either the
//! `Authorization` header or the session cookie, and hands it here. Nothing
//! else about the request is parsed.
//!
//! # Grammar
//!
//! - Header: case-insensitive `bearer`, then one or more spaces or tabs, then
//!   the token text.
//! - Cookie: the raw value is the token text, verbatim.
//!
//! Absent, empty or whitespace-only input is [`AccessError::MissingCredential`];
//! anything else that does not fit the grammar is
//! [`AccessError::MalformedCredential`].

use serde::{Deserialize, Serialize};

use crate::error::{AccessError, AccessResult};
use crate::token::Token;

/// Name of the request header carrying bearer credentials.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Default name of the cookie carrying the session token.
pub const DEFAULT_SESSION_COOKIE: &str = "lectern_session";

/// The authentication scheme expected in the header form.
const BEARER_SCHEME: &str = "bearer";

fn is_separator(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn non_blank(raw: Option<&str>) -> AccessResult<&str> {
    match raw {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AccessError::MissingCredential),
    }
}

/// Extract a token from an `Authorization` header value.
///
/// # Errors
///
/// Returns [`AccessError::MissingCredential`] if `raw` is absent or blank and
/// [`AccessError::MalformedCredential`] if it does not read
/// `Bearer <token>`.
pub fn extract_bearer(raw: Option<&str>) -> AccessResult<Token> {
    let raw = non_blank(raw)?;

    // `split_at_checked` refuses both short input and a cut inside a
    // multi-byte character.
    let Some((scheme, rest)) = raw.split_at_checked(BEARER_SCHEME.len()) else {
        return Err(AccessError::MalformedCredential);
    };
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(AccessError::MalformedCredential);
    }

    let text = rest.trim_start_matches(is_separator);
    if text.len() == rest.len() || text.is_empty() {
        return Err(AccessError::MalformedCredential);
    }

    Token::new(text)
}

/// Extract a token from a session cookie value.
///
/// # Errors
///
/// Returns [`AccessError::MissingCredential`] if `raw` is absent or blank.
pub fn extract_cookie(raw: Option<&str>) -> AccessResult<Token> {
    let raw = non_blank(raw)?;
    Token::new(raw)
}

/// Where a raw credential was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    /// The `Authorization` request header.
    Header,
    /// The session cookie.
    Cookie,
}

/// A raw credential string together with the place it came from.
#[derive(Clone, PartialEq, Eq)]
pub struct RawCredential {
    source: CredentialSource,
    value: Option<String>,
}

impl RawCredential {
    /// A credential read from the `Authorization` header.
    #[must_use]
    pub fn header(value: impl Into<String>) -> Self {
        Self {
            source: CredentialSource::Header,
            value: Some(value.into()),
        }
    }

    /// A credential read from the session cookie.
    #[must_use]
    pub fn cookie(value: impl Into<String>) -> Self {
        Self {
            source: CredentialSource::Cookie,
            value: Some(value.into()),
        }
    }

    /// A request that carried no credential at all.
    #[must_use]
    pub fn missing() -> Self {
        Self {
            source: CredentialSource::Header,
            value: None,
        }
    }

    /// Pick a credential from what the request carried.
    ///
    /// A non-blank header wins; otherwise the cookie is used if present.
    #[must_use]
    pub fn from_sources(header: Option<&str>, cookie: Option<&str>) -> Self {
        match (header, cookie) {
            (Some(h), _) if !h.trim().is_empty() => Self::header(h),
            (_, Some(c)) => Self::cookie(c),
            (Some(h), None) => Self::header(h),
            (None, None) => Self::missing(),
        }
    }

    /// Where the credential came from.
    #[must_use]
    pub fn source(&self) -> CredentialSource {
        self.source
    }

    /// Parse the token out of the raw value according to its source.
    ///
    /// # Errors
    ///
    /// See [`extract_bearer`] and [`extract_cookie`].
    pub fn extract(&self) -> AccessResult<Token> {
        match self.source {
            CredentialSource::Header => extract_bearer(self.value.as_deref()),
            CredentialSource::Cookie => extract_cookie(self.value.as_deref()),
        }
    }
}

impl std::fmt::Debug for RawCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawCredential")
            .field("source", &self.source)
            .field("present", &self.value.is_some())
            .finish()
    }
}
