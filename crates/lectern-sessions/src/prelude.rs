//! Prelude module - commonly used types for convenient import.
//!
//! Use `use lectern_sessions::prelude::*;` to import all essential types.

// Store abstraction and implementation
pub use crate::{InMemorySessionStore, SessionEntry, SessionStore};

// Token sources
pub use crate::{MintedTokens, TokenSource};
