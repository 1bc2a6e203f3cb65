//! Lectern Telemetry - Logging and request correlation.
//!
//! This crate provides:
//! - Log subscriber setup with pretty, compact and JSON formats
//! - Output to stdout, stderr or a log file
//! - [`RequestContext`] for correlating the events of one protected call
//!
//! # Example
//!
//! ```rust,no_run
//! use lectern_telemetry::{LogConfig, LogFormat, RequestContext, setup_logging};
//!
//! # fn main() -> Result<(), lectern_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("lectern_sessions=debug");
//! setup_logging(&config)?;
//!
//! let ctx = RequestContext::new("gate").with_operation("view_grades");
//! let _guard = ctx.enter();
//! tracing::info!("checking access");
//! # Ok(())
//! # }
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
mod context;
mod error;
mod logging;

pub use context::{RequestContext, RequestGuard};
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};
