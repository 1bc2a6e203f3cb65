//! Lectern Core - Types shared by every part of the access-control subsystem.
//!
//! This crate provides:
//! - [`Token`], the opaque bearer credential that names a session
//! - [`Identity`] and [`Role`], the user a token resolves to
//! - Credential extraction from `Authorization` headers and session cookies
//! - The [`AccessError`] taxonomy every deny path reports through
//!
//! # Example
//!
//! ```
//! use lectern_core::{Identity, RawCredential, Role};
//!
//! let teacher = Identity::new("t1", Role::Teacher);
//! assert!(teacher.is_teacher());
//!
//! let token = RawCredential::header("Bearer abc123").extract().unwrap();
//! assert_eq!(token.value(), "abc123");
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod credential;
pub mod prelude;

mod error;
mod identity;
mod token;

pub use credential::{
    AUTHORIZATION_HEADER, CredentialSource, DEFAULT_SESSION_COOKIE, RawCredential,
    extract_bearer, extract_cookie,
};
pub use error::{AccessError, AccessResult, DenyReason};
pub use identity::{Identity, IdentityFlags, ResourceRef, Role, UserId};
pub use token::Token;
