//! Auth configuration loader
//!
//! Resolves an [`AuthConfig`] from four layers. For each field the first
//! layer that provides a value wins:
//! 1. Explicit overrides (CLI flags)
//! 2. Environment variables
//! 3. The first config file found among the candidates
//! 4. Built-in defaults
//!
//! ## Environment Variables
//! - `CRONLYTIC_API_KEY`: API key (required)
//! - `CRONLYTIC_USER_ID`: User ID (required)
//! - `CRONLYTIC_BASE_URL`: API base URL
//! - `CRONLYTIC_TIMEOUT`: Per-attempt timeout in seconds
//! - `CRONLYTIC_MAX_RETRIES`: Retries after the first attempt
//! - `CRONLYTIC_RETRY_DELAY`: Base retry delay in seconds
//! - `CRONLYTIC_CONFIG_FILE`: Pin a specific config file
//!
//! ## File Locations
//! Searched in order when no file is pinned:
//! 1. `./cronlytic_config.json`
//! 2. `~/.cronlytic/config.json`
//! 3. `/etc/cronlytic/config.json`

use std::fmt;
use std::path::{Path, PathBuf};

use cronlytic_domain::constants::{LOCAL_CONFIG_FILE, SYSTEM_CONFIG_FILE, USER_CONFIG_DIR};
use cronlytic_domain::{AuthConfig, CronlyticError, FieldErrors, Result};
use serde::Deserialize;

pub const ENV_API_KEY: &str = "CRONLYTIC_API_KEY";
pub const ENV_USER_ID: &str = "CRONLYTIC_USER_ID";
pub const ENV_BASE_URL: &str = "CRONLYTIC_BASE_URL";
pub const ENV_TIMEOUT: &str = "CRONLYTIC_TIMEOUT";
pub const ENV_MAX_RETRIES: &str = "CRONLYTIC_MAX_RETRIES";
pub const ENV_RETRY_DELAY: &str = "CRONLYTIC_RETRY_DELAY";
pub const ENV_CONFIG_FILE: &str = "CRONLYTIC_CONFIG_FILE";

/// Values supplied directly by the caller; they take precedence over
/// every other source.
#[derive(Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub user_id: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<f64>,
    pub max_retries: Option<u32>,
    pub retry_delay_seconds: Option<f64>,
    pub config_file: Option<PathBuf>,
}

impl fmt::Debug for ConfigOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigOverrides")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("user_id", &self.user_id)
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_seconds", &self.retry_delay_seconds)
            .field("config_file", &self.config_file)
            .finish()
    }
}

/// On-disk config file shape.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_key: Option<String>,
    user_id: Option<String>,
    base_url: Option<String>,
    timeout: Option<f64>,
    max_retries: Option<u32>,
    retry_delay: Option<f64>,
}

/// Load configuration from the process environment and standard file
/// locations.
///
/// # Errors
/// Returns `CronlyticError::Config` listing every missing or invalid field,
/// or naming the pinned config file that could not be read.
pub fn load(overrides: &ConfigOverrides) -> Result<AuthConfig> {
    resolve(overrides, |key| std::env::var(key).ok(), &candidate_paths())
}

/// Resolve configuration from explicit sources.
///
/// `env` looks up one variable; `candidates` are searched in order when no
/// file is pinned by `overrides.config_file` or `CRONLYTIC_CONFIG_FILE`.
pub fn resolve<F>(overrides: &ConfigOverrides, env: F, candidates: &[PathBuf]) -> Result<AuthConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let env_text = |key: &str| env(key).filter(|value| !value.trim().is_empty());
    let mut errors = FieldErrors::new();

    let pinned = overrides.config_file.clone().or_else(|| env_text(ENV_CONFIG_FILE).map(PathBuf::from));
    let file = match pinned {
        Some(path) => read_pinned(&path)?,
        None => first_readable(candidates),
    };

    let api_key = overrides.api_key.clone().or_else(|| env_text(ENV_API_KEY)).or(file.api_key);
    let user_id = overrides.user_id.clone().or_else(|| env_text(ENV_USER_ID)).or(file.user_id);
    let base_url = overrides.base_url.clone().or_else(|| env_text(ENV_BASE_URL)).or(file.base_url);

    let timeout = overrides
        .timeout_seconds
        .or_else(|| parse_env(env_text(ENV_TIMEOUT), "timeout", "a number of seconds", &mut errors))
        .or(file.timeout);
    let max_retries = overrides
        .max_retries
        .or_else(|| {
            parse_env(env_text(ENV_MAX_RETRIES), "max_retries", "a non-negative integer", &mut errors)
        })
        .or(file.max_retries);
    let retry_delay = overrides
        .retry_delay_seconds
        .or_else(|| {
            parse_env(env_text(ENV_RETRY_DELAY), "retry_delay", "a number of seconds", &mut errors)
        })
        .or(file.retry_delay);

    let mut builder = AuthConfig::builder();
    if let Some(api_key) = api_key {
        builder = builder.api_key(api_key);
    }
    if let Some(user_id) = user_id {
        builder = builder.user_id(user_id);
    }
    if let Some(base_url) = base_url {
        builder = builder.base_url(base_url);
    }
    if let Some(seconds) = timeout {
        builder = builder.timeout_seconds(seconds);
    }
    if let Some(retries) = max_retries {
        builder = builder.max_retries(retries);
    }
    if let Some(seconds) = retry_delay {
        builder = builder.retry_delay_seconds(seconds);
    }

    match builder.build() {
        Ok(config) if errors.is_empty() => {
            tracing::info!(
                base_url = %config.base_url(),
                timeout_seconds = config.timeout_seconds(),
                max_retries = config.max_retries(),
                "Configuration resolved"
            );
            Ok(config)
        }
        Ok(_) => Err(CronlyticError::config(errors)),
        Err(err) => {
            for (field, messages) in err.field_errors().cloned().unwrap_or_default() {
                errors.entry(field).or_default().extend(messages);
            }
            Err(CronlyticError::config(errors))
        }
    }
}

/// Standard config file locations, in search order.
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(USER_CONFIG_DIR).join("config.json"));
    }
    candidates.push(PathBuf::from(SYSTEM_CONFIG_FILE));
    candidates
}

fn parse_env<T: std::str::FromStr>(
    raw: Option<String>,
    field: &str,
    expected: &str,
    errors: &mut FieldErrors,
) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors
                .entry(field.to_string())
                .or_default()
                .push(format!("Environment value '{}' is not {expected}", raw.trim()));
            None
        }
    }
}

fn read_pinned(path: &Path) -> Result<FileConfig> {
    let file_error = |message: String| {
        let mut fields = FieldErrors::new();
        fields.insert("config_file".to_string(), vec![message]);
        CronlyticError::config(fields)
    };

    let contents = std::fs::read_to_string(path).map_err(|err| {
        file_error(format!("Cannot read config file {}: {err}", path.display()))
    })?;
    let file = serde_json::from_str(&contents).map_err(|err| {
        file_error(format!("Invalid JSON in config file {}: {err}", path.display()))
    })?;
    tracing::info!(path = %path.display(), "Loaded configuration file");
    Ok(file)
}

fn first_readable(candidates: &[PathBuf]) -> FileConfig {
    for path in candidates.iter().filter(|path| path.is_file()) {
        let parsed = std::fs::read_to_string(path)
            .map_err(|err| err.to_string())
            .and_then(|contents| {
                serde_json::from_str::<FileConfig>(&contents).map_err(|err| err.to_string())
            });
        match parsed {
            Ok(file) => {
                tracing::info!(path = %path.display(), "Loaded configuration file");
                return file;
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "Skipping unreadable config file");
            }
        }
    }
    tracing::debug!("No configuration file found");
    FileConfig::default()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use cronlytic_domain::ErrorKind;
    use tempfile::NamedTempFile;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    fn json_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn env_only_uses_defaults_for_the_rest() {
        let config = resolve(
            &ConfigOverrides::default(),
            env_of(&[(ENV_API_KEY, "env-key"), (ENV_USER_ID, "env-user")]),
            &[],
        )
        .unwrap();
        assert_eq!(config.api_key(), "env-key");
        assert_eq!(config.base_url(), "https://api.cronlytic.com/prog");
        assert_eq!(config.max_retries(), 3);
    }

    #[test]
    fn precedence_is_per_field() {
        let file = json_file(
            r#"{"api_key": "file-key", "user_id": "file-user", "base_url": "http://file.local", "max_retries": 7}"#,
        );
        let overrides = ConfigOverrides { api_key: Some("flag-key".into()), ..Default::default() };
        let config = resolve(
            &overrides,
            env_of(&[(ENV_API_KEY, "env-key"), (ENV_USER_ID, "env-user")]),
            &[file.path().to_path_buf()],
        )
        .unwrap();

        assert_eq!(config.api_key(), "flag-key");
        assert_eq!(config.user_id(), "env-user");
        assert_eq!(config.base_url(), "http://file.local");
        assert_eq!(config.max_retries(), 7);
    }

    #[test]
    fn missing_credentials_are_reported_together() {
        let err = resolve(&ConfigOverrides::default(), env_of(&[]), &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        let fields = err.field_errors().unwrap();
        assert!(fields.contains_key("api_key"));
        assert!(fields.contains_key("user_id"));
    }

    #[test]
    fn unparseable_env_numbers_are_field_errors() {
        let err = resolve(
            &ConfigOverrides::default(),
            env_of(&[
                (ENV_API_KEY, "k"),
                (ENV_USER_ID, "u"),
                (ENV_TIMEOUT, "soon"),
                (ENV_MAX_RETRIES, "-1"),
            ]),
            &[],
        )
        .unwrap_err();
        let fields = err.field_errors().unwrap();
        assert_eq!(fields["timeout"], vec!["Environment value 'soon' is not a number of seconds"]);
        assert!(fields.contains_key("max_retries"));
    }

    #[test]
    fn huge_env_timeout_is_a_config_error() {
        let err = resolve(
            &ConfigOverrides::default(),
            env_of(&[(ENV_API_KEY, "k"), (ENV_USER_ID, "u"), (ENV_TIMEOUT, "1e20")]),
            &[],
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(err.field_errors().unwrap()["timeout"], vec!["Timeout is too large"]);
    }

    #[test]
    fn pinned_file_must_exist() {
        let overrides = ConfigOverrides {
            config_file: Some(PathBuf::from("/nonexistent/cronlytic.json")),
            ..Default::default()
        };
        let err = resolve(&overrides, env_of(&[(ENV_API_KEY, "k"), (ENV_USER_ID, "u")]), &[])
            .unwrap_err();
        assert!(err.field_errors().unwrap().contains_key("config_file"));
    }

    #[test]
    fn pinned_file_via_env_must_parse() {
        let file = json_file("{not json");
        let path = file.path().to_string_lossy().into_owned();
        let err = resolve(&ConfigOverrides::default(), env_of(&[(ENV_CONFIG_FILE, path.as_str())]), &[])
            .unwrap_err();
        assert!(err.message().contains("Invalid JSON"));
    }

    #[test]
    fn malformed_candidate_file_is_skipped() {
        let broken = json_file("{not json");
        let good = json_file(r#"{"api_key": "file-key", "user_id": "file-user"}"#);
        let config = resolve(
            &ConfigOverrides::default(),
            env_of(&[]),
            &[broken.path().to_path_buf(), good.path().to_path_buf()],
        )
        .unwrap();
        assert_eq!(config.api_key(), "file-key");
    }

    #[test]
    fn debug_redacts_api_key() {
        let overrides = ConfigOverrides { api_key: Some("super-secret".into()), ..Default::default() };
        assert!(!format!("{overrides:?}").contains("super-secret"));
    }
}
