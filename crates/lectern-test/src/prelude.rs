//! Prelude module - commonly used test helpers.
//!
//! Use `use lectern_test::prelude::*;` in test modules.

pub use crate::fixtures::{bearer, cookie, student, teacher, teaching_assistant};
pub use crate::harness::{TestGate, init_test_tracing};
pub use crate::mocks::ScriptedTokenSource;
