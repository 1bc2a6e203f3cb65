//! Configuration types.
//!
//! Self-contained: nothing here depends on another lectern crate. Policy
//! shapes are carried as plain strings and checked by name during
//! validation; the policy crate converts them at its own boundary. Every
//! struct implements [`Default`], so a bare `[section]` header in TOML
//! yields a working configuration.

use serde::{Deserialize, Serialize};

/// Policy shape names accepted in `[[operations]]` entries.
pub const KNOWN_SHAPES: [&str; 5] = [
    "authenticated",
    "teacher_or_student",
    "student_self",
    "teacher_only",
    "teacher_on_resource",
];

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Session store and credential settings.
    pub sessions: SessionsSection,
    /// Log level, format, and per-crate directives.
    pub logging: LoggingSection,
    /// Protected operations and the policy each runs under.
    pub operations: Vec<OperationPolicyConfig>,
}

// ---------------------------------------------------------------------------
// SessionsSection
// ---------------------------------------------------------------------------

/// Session store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsSection {
    /// Name of the cookie carrying the session token.
    pub cookie_name: String,
    /// How many token draws `issue` makes before reporting exhaustion.
    pub max_issue_attempts: u32,
}

impl Default for SessionsSection {
    fn default() -> Self {
        Self {
            cookie_name: "lectern_session".to_owned(),
            max_issue_attempts: 8,
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"` or `"json"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["lectern_sessions=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// OperationPolicyConfig
// ---------------------------------------------------------------------------

/// One `[[operations]]` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationPolicyConfig {
    /// Operation name, as the host passes it to the gate.
    pub name: String,
    /// Policy shape name (see [`KNOWN_SHAPES`]).
    pub shape: String,
    /// Caller argument holding the resource reference, if the shape uses one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_arg: Option<String>,
}

impl OperationPolicyConfig {
    /// An entry with no resource argument.
    #[must_use]
    pub fn new(name: impl Into<String>, shape: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape: shape.into(),
            resource_arg: None,
        }
    }

    /// Name the caller argument carrying the resource reference.
    #[must_use]
    pub fn with_resource_arg(mut self, arg: impl Into<String>) -> Self {
        self.resource_arg = Some(arg.into());
        self
    }
}
