//! Environment variable overrides.
//!
//! Applied after the file layer, so an operator can change the log level or
//! cookie name of a deployed binary without editing its config file. Empty
//! values are ignored.

use tracing::debug;

use crate::types::Config;

/// Overrides `logging.level`.
pub const ENV_LOG_LEVEL: &str = "LECTERN_LOG_LEVEL";
/// Overrides `logging.format`.
pub const ENV_LOG_FORMAT: &str = "LECTERN_LOG_FORMAT";
/// Overrides `sessions.cookie_name`.
pub const ENV_SESSION_COOKIE: &str = "LECTERN_SESSION_COOKIE";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

/// Apply overrides read through `lookup`.
pub fn apply_overrides_from<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(level) = read(ENV_LOG_LEVEL) {
        debug!(var = ENV_LOG_LEVEL, %level, "env override");
        config.logging.level = level;
    }
    if let Some(format) = read(ENV_LOG_FORMAT) {
        debug!(var = ENV_LOG_FORMAT, %format, "env override");
        config.logging.format = format;
    }
    if let Some(cookie) = read(ENV_SESSION_COOKIE) {
        debug!(var = ENV_SESSION_COOKIE, %cookie, "env override");
        config.sessions.cookie_name = cookie;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = Config::default();
        apply_overrides_from(
            &mut config,
            lookup(&[
                (ENV_LOG_LEVEL, "debug"),
                (ENV_LOG_FORMAT, "json"),
                (ENV_SESSION_COOKIE, "sid"),
            ]),
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.sessions.cookie_name, "sid");
    }

    #[test]
    fn test_empty_values_ignored() {
        let mut config = Config::default();
        apply_overrides_from(&mut config, lookup(&[(ENV_LOG_LEVEL, "  ")]));
        assert_eq!(config.logging.level, "info");
    }
}
