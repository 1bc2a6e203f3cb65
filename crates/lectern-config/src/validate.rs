//! Post-load configuration validation.
//!
//! Checks that deserialized [`Config`](crate::Config) values are within
//! acceptable ranges and that the operation table is self-consistent.

use std::collections::HashSet;

use crate::error::{ConfigError, ConfigResult};
use crate::types::{Config, KNOWN_SHAPES};

/// Validate a fully loaded configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_sessions(config)?;
    validate_logging(config)?;
    validate_operations(config)?;
    Ok(())
}

/// Upper bound for `sessions.max_issue_attempts`.
const MAX_ISSUE_ATTEMPTS_UPPER_BOUND: u32 = 64;

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

/// Whether `name` is a cookie-name token: visible ASCII, no separators.
fn is_cookie_token(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic()
                && !matches!(
                    b,
                    b'(' | b')'
                        | b'<'
                        | b'>'
                        | b'@'
                        | b','
                        | b';'
                        | b':'
                        | b'\\'
                        | b'"'
                        | b'/'
                        | b'['
                        | b']'
                        | b'?'
                        | b'='
                        | b'{'
                        | b'}'
                )
        })
}

fn validate_sessions(config: &Config) -> ConfigResult<()> {
    let s = &config.sessions;

    if !is_cookie_token(&s.cookie_name) {
        return Err(invalid(
            "sessions.cookie_name",
            format!(
                "'{}' is not a valid cookie name; use visible ASCII without separators",
                s.cookie_name
            ),
        ));
    }

    if s.max_issue_attempts == 0 || s.max_issue_attempts > MAX_ISSUE_ATTEMPTS_UPPER_BOUND {
        return Err(invalid(
            "sessions.max_issue_attempts",
            format!("max_issue_attempts must be between 1 and {MAX_ISSUE_ATTEMPTS_UPPER_BOUND}"),
        ));
    }

    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        return Err(invalid(
            "logging.level",
            format!(
                "unsupported log level '{}'; expected one of: {}",
                config.logging.level,
                valid_levels.join(", ")
            ),
        ));
    }

    let valid_formats = ["pretty", "compact", "json"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        return Err(invalid(
            "logging.format",
            format!(
                "unsupported log format '{}'; expected one of: {}",
                config.logging.format,
                valid_formats.join(", ")
            ),
        ));
    }

    Ok(())
}

fn validate_operations(config: &Config) -> ConfigResult<()> {
    let mut seen = HashSet::new();

    for (i, op) in config.operations.iter().enumerate() {
        let field = format!("operations[{i}]");

        if op.name.trim().is_empty() {
            return Err(invalid(format!("{field}.name"), "operation name must not be empty"));
        }
        if !seen.insert(op.name.as_str()) {
            return Err(invalid(
                format!("{field}.name"),
                format!("operation '{}' is declared more than once", op.name),
            ));
        }
        if !KNOWN_SHAPES.contains(&op.shape.as_str()) {
            return Err(invalid(
                format!("{field}.shape"),
                format!(
                    "unknown policy shape '{}'; expected one of: {}",
                    op.shape,
                    KNOWN_SHAPES.join(", ")
                ),
            ));
        }
        if op.shape == "student_self" && op.resource_arg.as_deref().is_none_or(str::is_empty) {
            return Err(invalid(
                format!("{field}.resource_arg"),
                format!(
                    "operation '{}' uses student_self and must name a resource_arg",
                    op.name
                ),
            ));
        }
    }

    Ok(())
}
