//! Integration tests for configuration loader
//!
//! Exercises `config::load` against the real process environment, so every
//! test holds `ENV_LOCK` while it mutates variables.

use std::io::Write;
use std::sync::Mutex;

use cronlytic_domain::ErrorKind;
use cronlytic_infra::config::{self, loader, ConfigOverrides};
use once_cell::sync::Lazy;
use tempfile::NamedTempFile;

static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

const ALL_VARS: [&str; 7] = [
    loader::ENV_API_KEY,
    loader::ENV_USER_ID,
    loader::ENV_BASE_URL,
    loader::ENV_TIMEOUT,
    loader::ENV_MAX_RETRIES,
    loader::ENV_RETRY_DELAY,
    loader::ENV_CONFIG_FILE,
];

/// Clears the Cronlytic variables on creation and again on drop.
struct CleanEnv;

impl CleanEnv {
    fn new() -> Self {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
        Self
    }
}

impl Drop for CleanEnv {
    fn drop(&mut self) {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
    }
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).expect("Failed to write to temp file");
    file
}

#[test]
fn test_load_from_environment() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
    let _env = CleanEnv::new();

    std::env::set_var(loader::ENV_API_KEY, "env-key");
    std::env::set_var(loader::ENV_USER_ID, "env-user");
    std::env::set_var(loader::ENV_TIMEOUT, "12.5");
    std::env::set_var(loader::ENV_MAX_RETRIES, "5");
    std::env::set_var(loader::ENV_RETRY_DELAY, "0.25");

    let config = config::load(&ConfigOverrides::default()).expect("config from env");
    assert_eq!(config.api_key(), "env-key");
    assert_eq!(config.user_id(), "env-user");
    assert!((config.timeout_seconds() - 12.5).abs() < f64::EPSILON);
    assert_eq!(config.max_retries(), 5);
    assert!((config.retry_delay_seconds() - 0.25).abs() < f64::EPSILON);
}

#[test]
fn test_flags_override_pinned_file() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
    let _env = CleanEnv::new();

    let file = config_file(
        r#"{
            "api_key": "file-key",
            "user_id": "file-user",
            "base_url": "http://localhost:8080/prog/",
            "timeout": 5,
            "retry_delay": 2
        }"#,
    );
    std::env::set_var(loader::ENV_CONFIG_FILE, file.path());

    let overrides = ConfigOverrides { user_id: Some("flag-user".into()), ..Default::default() };
    let config = config::load(&overrides).expect("config from file");

    assert_eq!(config.api_key(), "file-key");
    assert_eq!(config.user_id(), "flag-user");
    assert_eq!(config.base_url(), "http://localhost:8080/prog");
    assert_eq!(config.endpoint("/jobs"), "http://localhost:8080/prog/jobs");
    assert!((config.retry_delay_seconds() - 2.0).abs() < f64::EPSILON);
}

#[test]
fn test_invalid_values_are_all_reported() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
    let _env = CleanEnv::new();

    let file = config_file(r#"{"api_key": "k", "user_id": "u"}"#);
    let overrides = ConfigOverrides {
        base_url: Some("ftp://cronlytic".into()),
        timeout_seconds: Some(0.0),
        retry_delay_seconds: Some(-1.0),
        config_file: Some(file.path().to_path_buf()),
        ..Default::default()
    };

    let err = config::load(&overrides).expect_err("invalid config");
    assert_eq!(err.kind(), ErrorKind::Config);
    let fields = err.field_errors().expect("field errors");
    assert!(fields.contains_key("base_url"));
    assert!(fields.contains_key("timeout"));
    assert!(fields.contains_key("retry_delay"));
}

#[test]
fn test_missing_pinned_file_is_fatal() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
    let _env = CleanEnv::new();

    std::env::set_var(loader::ENV_API_KEY, "k");
    std::env::set_var(loader::ENV_USER_ID, "u");
    std::env::set_var(loader::ENV_CONFIG_FILE, "/definitely/missing/cronlytic.json");

    let err = config::load(&ConfigOverrides::default()).expect_err("missing file");
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.message().contains("Cannot read config file"));
}
