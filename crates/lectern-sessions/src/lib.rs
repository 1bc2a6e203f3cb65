//! Lectern Sessions - The token to identity mapping behind every access check.
//!
//! This crate provides:
//! - The [`SessionStore`] abstraction the policy engine reads from
//! - [`InMemorySessionStore`], a sharded concurrent implementation
//! - The [`TokenSource`] seam the store draws fresh tokens from, with
//!   [`MintedTokens`] as the production source
//!
//! Sessions live only as long as the store: nothing is written to disk, and
//! a restart (or [`SessionStore::shutdown`]) signs every user out.
//!
//! # Example
//!
//! ```
//! use lectern_core::{Identity, Role};
//! use lectern_sessions::{InMemorySessionStore, SessionStore};
//!
//! let store = InMemorySessionStore::new();
//! let token = store.issue(Identity::new("t1", Role::Teacher)).unwrap();
//!
//! assert_eq!(store.resolve(&token).unwrap().user_id().as_str(), "t1");
//!
//! store.revoke(&token);
//! assert!(!store.exists(&token));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod memory;
mod source;
mod store;

pub use memory::{DEFAULT_MAX_ISSUE_ATTEMPTS, InMemorySessionStore};
pub use source::{MintedTokens, TokenSource};
pub use store::{SessionEntry, SessionStore};
