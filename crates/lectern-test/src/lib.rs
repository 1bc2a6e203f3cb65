//! Lectern Test - Shared test utilities.
//!
//! This crate provides fixtures, a scripted token source and a pre-wired
//! gate harness for use as a dev-dependency.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! lectern-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! use lectern_test::{ScriptedTokenSource, TestGate, bearer, teacher};
//!
//! #[test]
//! fn test_sign_in() {
//!     let harness = TestGate::with_script(["T1"]);
//!     let token = harness.sign_in(teacher()).unwrap();
//!     assert_eq!(token.value(), "T1");
//!     let credential = bearer(&token);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
