//! Telemetry error types.

use thiserror::Error;

/// Errors raised while installing the log subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A level, format or directive could not be understood.
    #[error("invalid log configuration: {0}")]
    ConfigError(String),

    /// A global subscriber is already installed.
    #[error("logging already initialized: {0}")]
    InitError(String),

    /// The log file or its directory could not be opened.
    #[error("log output unavailable: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
