//! Authentication and connection settings for the remote service.
//!
//! [`AuthConfig`] is built once at startup through [`AuthConfigBuilder`] and
//! then shared read-only. It exposes no setters; a changed credential means a
//! new value.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::constants::{
    CONTENT_TYPE_JSON, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_SECS,
    DEFAULT_TIMEOUT_SECS, HEADER_API_KEY, HEADER_USER_ID, USER_AGENT,
};
use crate::errors::{CronlyticError, FieldErrors, Result};

/// Validated credentials and transport settings.
#[derive(Clone, PartialEq, Serialize)]
pub struct AuthConfig {
    #[serde(skip_serializing)]
    api_key: String,
    user_id: String,
    base_url: String,
    #[serde(rename = "timeout_seconds", serialize_with = "as_seconds")]
    timeout: Duration,
    max_retries: u32,
    #[serde(rename = "retry_delay_seconds", serialize_with = "as_seconds")]
    retry_delay: Duration,
}

fn as_seconds<S: Serializer>(value: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}

impl AuthConfig {
    pub fn builder() -> AuthConfigBuilder {
        AuthConfigBuilder::default()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout_seconds(&self) -> f64 {
        self.timeout.as_secs_f64()
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn retry_delay_seconds(&self) -> f64 {
        self.retry_delay.as_secs_f64()
    }

    pub const fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Headers attached to every request.
    pub fn headers(&self) -> [(&'static str, &str); 4] {
        [
            (HEADER_API_KEY, self.api_key.as_str()),
            (HEADER_USER_ID, self.user_id.as_str()),
            ("Content-Type", CONTENT_TYPE_JSON),
            ("User-Agent", USER_AGENT),
        ]
    }

    /// Build `{base_url}{path}`; `path` must start with `/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

/// Builder for [`AuthConfig`].
///
/// Unset optional fields fall back to the service defaults. `build` checks
/// every field and reports all problems in one `ConfigError`.
#[derive(Default, Clone)]
pub struct AuthConfigBuilder {
    api_key: Option<String>,
    user_id: Option<String>,
    base_url: Option<String>,
    timeout_seconds: Option<f64>,
    max_retries: Option<u32>,
    retry_delay_seconds: Option<f64>,
}

impl AuthConfigBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub const fn timeout_seconds(mut self, seconds: f64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    pub const fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub const fn retry_delay_seconds(mut self, seconds: f64) -> Self {
        self.retry_delay_seconds = Some(seconds);
        self
    }

    pub fn build(self) -> Result<AuthConfig> {
        let mut errors = FieldErrors::new();
        let mut reject = |field: &str, message: &str| {
            errors.entry(field.to_string()).or_default().push(message.to_string());
        };

        let api_key = self.api_key.as_deref().map(str::trim).unwrap_or_default().to_string();
        if api_key.is_empty() {
            reject("api_key", "API key is required");
        }

        let user_id = self.user_id.as_deref().map(str::trim).unwrap_or_default().to_string();
        if user_id.is_empty() {
            reject("user_id", "User ID is required");
        }

        let base_url = self
            .base_url
            .as_deref()
            .map_or(DEFAULT_BASE_URL, str::trim)
            .trim_end_matches('/')
            .to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            reject("base_url", "Base URL must start with http:// or https://");
        }

        let timeout_seconds = self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let timeout = match Duration::try_from_secs_f64(timeout_seconds) {
            Ok(timeout) if !timeout.is_zero() => timeout,
            Ok(_) => {
                reject("timeout", "Timeout must be a positive number of seconds");
                Duration::ZERO
            }
            Err(_) if timeout_seconds.is_finite() && timeout_seconds > 0.0 => {
                reject("timeout", "Timeout is too large");
                Duration::ZERO
            }
            Err(_) => {
                reject("timeout", "Timeout must be a positive number of seconds");
                Duration::ZERO
            }
        };

        let retry_delay_seconds = self.retry_delay_seconds.unwrap_or(DEFAULT_RETRY_DELAY_SECS);
        let retry_delay = match Duration::try_from_secs_f64(retry_delay_seconds) {
            Ok(delay) => delay,
            Err(_) if retry_delay_seconds.is_finite() && retry_delay_seconds > 0.0 => {
                reject("retry_delay", "Retry delay is too large");
                Duration::ZERO
            }
            Err(_) => {
                reject("retry_delay", "Retry delay must be zero or a positive number of seconds");
                Duration::ZERO
            }
        };

        if !errors.is_empty() {
            return Err(CronlyticError::config(errors));
        }

        Ok(AuthConfig {
            api_key,
            user_id,
            base_url,
            timeout,
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            retry_delay,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn minimal() -> AuthConfigBuilder {
        AuthConfig::builder().api_key("key-123").user_id("user-1")
    }

    #[test]
    fn defaults_apply_when_only_credentials_given() {
        let config = minimal().build().unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.max_retries(), 3);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.retry_delay(), Duration::from_secs(1));
    }

    #[test]
    fn credentials_are_trimmed_and_trailing_slash_stripped() {
        let config =
            AuthConfig::builder().api_key("  key  ").user_id(" u ").base_url("http://x/api//");
        let config = config.build().unwrap();
        assert_eq!(config.api_key(), "key");
        assert_eq!(config.user_id(), "u");
        assert_eq!(config.base_url(), "http://x/api");
        assert_eq!(config.endpoint("/jobs"), "http://x/api/jobs");
    }

    #[test]
    fn every_invalid_field_is_reported() {
        let err = AuthConfig::builder()
            .api_key("   ")
            .base_url("ftp://nope")
            .timeout_seconds(0.0)
            .retry_delay_seconds(-1.0)
            .build()
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Config);
        let fields = err.field_errors().unwrap();
        for field in ["api_key", "user_id", "base_url", "timeout", "retry_delay"] {
            assert!(fields.contains_key(field), "missing {field}");
        }
    }

    #[test]
    fn durations_beyond_range_are_config_errors() {
        let err = minimal().timeout_seconds(1e20).retry_delay_seconds(f64::MAX).build().unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Config);
        let fields = err.field_errors().unwrap();
        assert_eq!(fields["timeout"], vec!["Timeout is too large".to_string()]);
        assert_eq!(fields["retry_delay"], vec!["Retry delay is too large".to_string()]);
    }

    #[test]
    fn fractional_durations_are_kept() {
        let config = minimal().timeout_seconds(2.5).retry_delay_seconds(0.0).build().unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(2500));
        assert!(config.retry_delay().is_zero());
        assert!((config.timeout_seconds() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn debug_and_serialize_never_expose_api_key() {
        let config = minimal().api_key("super-secret").build().unwrap();
        assert!(!format!("{config:?}").contains("super-secret"));

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret"));
        assert!(json.contains("user-1"));
        assert!(json.contains(r#""timeout_seconds":30.0"#));
    }

    #[test]
    fn headers_carry_credentials_and_json_content_type() {
        let config = minimal().build().unwrap();
        let headers = config.headers();
        assert!(headers.contains(&("X-API-Key", "key-123")));
        assert!(headers.contains(&("X-User-ID", "user-1")));
        assert!(headers.contains(&("Content-Type", "application/json")));
    }
}
