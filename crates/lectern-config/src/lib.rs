#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Configuration for the Lectern access-control subsystem.
//!
//! This crate provides a single [`Config`] type covering session settings,
//! logging, and the table of protected operations with their policies.
//!
//! # Usage
//!
//! ```rust,no_run
//! use lectern_config::Config;
//!
//! // Defaults, then the file, then LECTERN_* environment overrides.
//! let config = Config::load(Some(std::path::Path::new("lectern.toml"))).unwrap();
//! println!("session cookie: {}", config.sessions.cookie_name);
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Environment variables** (`LECTERN_LOG_LEVEL`, `LECTERN_LOG_FORMAT`,
//!    `LECTERN_SESSION_COOKIE`)
//! 2. **Config file** passed to [`Config::load`]
//! 3. **Embedded defaults** (`defaults.toml` compiled into the binary)
//!
//! # Design
//!
//! This crate has **no dependencies on other internal lectern crates**.
//! Conversion into policy tables and log configuration happens in bridge
//! modules behind the `config` feature of `lectern-policy` and
//! `lectern-telemetry`.

/// Environment variable overrides.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file loading.
pub mod loader;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use types::*;

impl Config {
    /// Load configuration with the full precedence chain.
    ///
    /// See [`loader::load`] for the algorithm.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is malformed or the final
    /// configuration fails validation.
    pub fn load(path: Option<&std::path::Path>) -> ConfigResult<Self> {
        loader::load(path)
    }

    /// Load configuration from a single file (no defaults layer, no env).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load_file(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }

    /// Parse and validate configuration held in a string.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the string is malformed or invalid.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        loader::load_str(content)
    }

    /// Check this configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self) -> ConfigResult<()> {
        validate::validate(self)
    }
}
