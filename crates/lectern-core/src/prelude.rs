//! Prelude module - commonly used types for convenient import.
//!
//! Use `use lectern_core::prelude::*;` to import all essential types.

// Errors
pub use crate::{AccessError, AccessResult, DenyReason};

// Credentials
pub use crate::{CredentialSource, RawCredential, Token};

// Identities
pub use crate::{Identity, ResourceRef, Role, UserId};
