//! Conversion from `lectern-config` logging settings.

use lectern_config::LoggingSection;

use crate::error::TelemetryResult;
use crate::logging::{LogConfig, LogFormat};

impl LogConfig {
    /// Build a log configuration from the `[logging]` section.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::ConfigError`](crate::TelemetryError::ConfigError)
    /// for an unknown format name.
    pub fn from_config(section: &LoggingSection) -> TelemetryResult<Self> {
        let format: LogFormat = section.format.parse()?;
        let config = section
            .directives
            .iter()
            .fold(Self::new(section.level.clone()).with_format(format), |config, d| {
                config.with_directive(d.clone())
            });
        Ok(config)
    }
}
