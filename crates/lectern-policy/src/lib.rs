//! Lectern Policy - Access decisions for protected operations.
//!
//! This crate provides:
//! - The five [`PolicyShape`]s a protected operation can be tagged with
//! - [`PolicyEngine`], which resolves a token and evaluates one shape
//! - [`Guarded`], a decorator that runs an operation only if its policy allows
//! - [`PolicyTable`], a registry of operation name to [`PolicyBinding`]
//! - [`Gate`], the single entry point a host wires into its request path
//!
//! # Decision Flow
//!
//! 1. **Extract** the token from the raw header or cookie value
//!    - If missing or malformed -> DENY (`MissingCredential` / `MalformedCredential`)
//! 2. **Resolve** the token through the session store
//!    - If unknown -> DENY (`Unauthenticated`)
//! 3. **Evaluate** the operation's policy shape against the identity and the
//!    resource reference named by the binding
//!    - If refused -> DENY (`Forbidden(reason)`)
//! 4. Otherwise -> ALLOW, and the operation runs with the resolved identity
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use lectern_core::{Identity, RawCredential, Role};
//! use lectern_policy::{OperationArgs, PolicyBinding, PolicyShape, PolicyTable, Gate};
//! use lectern_sessions::InMemorySessionStore;
//!
//! let table = PolicyTable::new()
//!     .with("create_course", PolicyBinding::new(PolicyShape::TeacherOnly))
//!     .unwrap();
//! let gate = Gate::new(Arc::new(InMemorySessionStore::new()), table);
//!
//! let token = gate.sign_in(Identity::new("t1", Role::Teacher)).unwrap();
//! let credential = RawCredential::header(format!("Bearer {token}"));
//!
//! let identity = gate
//!     .authorize("create_course", &credential, &OperationArgs::new())
//!     .unwrap();
//! assert_eq!(identity.user_id().as_str(), "t1");
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

#[cfg(feature = "config")]
mod bridge;
mod engine;
mod gate;
mod guard;
mod shape;
mod table;

pub use engine::{PolicyEngine, Verdict};
pub use gate::Gate;
pub use guard::{Guarded, OperationArgs, PolicyBinding};
pub use shape::{PolicyShape, UnknownShape};
pub use table::{PolicyTable, PolicyTableError, PolicyTableResult};
