//! Prelude module - commonly used types for convenient import.
//!
//! Use `use lectern_policy::prelude::*;` to import all essential types.

// Shapes and decisions
pub use crate::{PolicyEngine, PolicyShape, Verdict};

// Composition
pub use crate::{Gate, Guarded, OperationArgs, PolicyBinding, PolicyTable};

// Errors
pub use crate::{PolicyTableError, PolicyTableResult};
