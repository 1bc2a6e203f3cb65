//! Config file loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Parse `defaults.toml` → base
//! 2. Merge the optional config file over it
//! 3. Deserialize the merged tree → `Config`
//! 4. Apply `LECTERN_*` environment overrides
//! 5. Validate

use std::path::Path;

use tracing::{debug, info};

use crate::env::{apply_env_overrides, apply_overrides_from};
use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Load configuration: defaults, then `path` if given, then the process environment.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file is unreadable, oversized or
/// malformed, or if the final configuration fails validation.
pub fn load(path: Option<&Path>) -> ConfigResult<Config> {
    let mut config = merge_layers(path)?;
    apply_env_overrides(&mut config);
    finish(config)
}

/// Like [`load`], reading environment overrides through `lookup`.
///
/// # Errors
///
/// As for [`load`].
pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> ConfigResult<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = merge_layers(path)?;
    apply_overrides_from(&mut config, lookup);
    finish(config)
}

/// Steps 1-3: defaults, then the file, deserialized.
fn merge_layers(path: Option<&Path>) -> ConfigResult<Config> {
    let mut merged = parse_toml(DEFAULTS_TOML, "<embedded defaults>")?;

    if let Some(path) = path {
        let layer = read_file(path)?;
        deep_merge(&mut merged, layer);
        info!(path = %path.display(), "loaded config file");
    }

    let origin = path.map_or_else(
        || "<embedded defaults>".to_owned(),
        |p| p.display().to_string(),
    );
    merged
        .try_into()
        .map_err(|source| ConfigError::ParseError { path: origin, source })
}

fn finish(config: Config) -> ConfigResult<Config> {
    validate::validate(&config)?;
    debug!(operations = config.operations.len(), "configuration resolved");
    Ok(config)
}

/// Load configuration from a single file, with no defaults layer and no
/// environment overrides. Missing sections take their `Default` values.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
/// validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let value = read_file(path)?;
    let config: Config = value.try_into().map_err(|source| ConfigError::ParseError {
        path: path.display().to_string(),
        source,
    })?;
    validate::validate(&config)?;
    Ok(config)
}

/// Parse configuration from a TOML string and validate it.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the string is malformed or invalid.
pub fn load_str(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content).map_err(|source| ConfigError::ParseError {
        path: "<string>".to_owned(),
        source,
    })?;
    validate::validate(&config)?;
    Ok(config)
}

fn read_file(path: &Path) -> ConfigResult<toml::Value> {
    // Check file size before reading to prevent OOM.
    let metadata = std::fs::metadata(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {} byte limit",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            ),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_toml(&content, &path.display().to_string())
}

fn parse_toml(content: &str, origin: &str) -> ConfigResult<toml::Value> {
    toml::from_str(content).map_err(|source| ConfigError::ParseError {
        path: origin.to_owned(),
        source,
    })
}

/// Merge `overlay` into `base`. Tables merge key by key; anything else
/// (including arrays such as `operations`) replaces the base value.
fn deep_merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key, value);
                    },
                }
            }
        },
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_embedded_defaults_are_valid() {
        let config = load_with_env(None, no_env).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_file_overrides_defaults_per_key() {
        let file = write_config(
            r#"
            [sessions]
            cookie_name = "sid"

            [[operations]]
            name = "create_course"
            shape = "teacher_only"
            "#,
        );
        let config = load_with_env(Some(file.path()), no_env).unwrap();
        assert_eq!(config.sessions.cookie_name, "sid");
        assert_eq!(config.sessions.max_issue_attempts, 8);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.operations.len(), 1);
    }

    #[test]
    fn test_env_beats_file() {
        let file = write_config("[logging]\nlevel = \"warn\"\n");
        let config = load_with_env(Some(file.path()), |key| {
            (key == crate::env::ENV_LOG_LEVEL).then(|| "debug".to_owned())
        })
        .unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_reads_process_environment() {
        let file = write_config(
            r#"
            [sessions]
            cookie_name = "sid"
            "#,
        );
        let from_process = load(Some(file.path())).ok();
        let injected = load_with_env(Some(file.path()), |key| std::env::var(key).ok()).ok();
        assert_eq!(from_process, injected);
    }

    #[test]
    fn test_env_values_are_validated() {
        let err = load_with_env(None, |key| {
            (key == crate::env::ENV_LOG_FORMAT).then(|| "xml".to_owned())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = load_with_env(Some(Path::new("/nonexistent/lectern.toml")), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let file = write_config("[sessions\ncookie_name = ");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_oversized_file_rejected() {
        let big = format!("# {}\n", "x".repeat(1_100_000));
        let file = write_config(&big);
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn test_load_str_validates() {
        let err = load_str("[[operations]]\nname = \"view_grades\"\nshape = \"student_self\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }
}
