//! Error types used throughout the client
//!
//! Every failure surfaced to a caller is one of a closed set of kinds. The
//! [`CronlyticError`] enum carries the structured payload for each kind and
//! [`ErrorRecord`] is its serializable projection handed to presenters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field name mapped to every message raised against it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Subscription usage reported alongside an authorization failure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanUsage {
    pub plan: Option<String>,
    pub current_count: Option<u64>,
    pub max_allowed: Option<u64>,
}

/// Main error type for the Cronlytic client
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum CronlyticError {
    #[error("Configuration error: {message}")]
    Config { message: String, field_errors: FieldErrors },

    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Access denied: {message}")]
    Authorization { message: String, usage: Option<PlanUsage> },

    #[error("Validation failed: {message}")]
    Validation { message: String, field_errors: FieldErrors },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Rate limit exceeded: {message}")]
    RateLimit { message: String, retry_after_seconds: Option<u64> },

    #[error("Network error: {message}")]
    Network { message: String, retriable: bool },

    #[error("Upstream error (HTTP {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Unexpected API response: {message}")]
    UnexpectedApi { status: Option<u16>, message: String },

    #[error("Confirmation required: {message}")]
    ConfirmationRequired { message: String, job_id: String },
}

/// Closed set of error kinds exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "ConfigError")]
    Config,
    #[serde(rename = "AuthenticationError")]
    Authentication,
    #[serde(rename = "AuthorizationError")]
    Authorization,
    #[serde(rename = "ValidationError")]
    Validation,
    #[serde(rename = "NotFoundError")]
    NotFound,
    #[serde(rename = "RateLimitError")]
    RateLimit,
    #[serde(rename = "NetworkError")]
    Network,
    #[serde(rename = "UpstreamError")]
    Upstream,
    #[serde(rename = "UnexpectedAPIError")]
    UnexpectedApi,
    #[serde(rename = "ConfirmationRequiredError")]
    ConfirmationRequired,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "ConfigError",
            Self::Authentication => "AuthenticationError",
            Self::Authorization => "AuthorizationError",
            Self::Validation => "ValidationError",
            Self::NotFound => "NotFoundError",
            Self::RateLimit => "RateLimitError",
            Self::Network => "NetworkError",
            Self::Upstream => "UpstreamError",
            Self::UnexpectedApi => "UnexpectedAPIError",
            Self::ConfirmationRequired => "ConfirmationRequiredError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CronlyticError {
    /// Build a validation error from collected field messages.
    pub fn validation(field_errors: FieldErrors) -> Self {
        let message = summarize_fields(&field_errors);
        Self::Validation { message, field_errors }
    }

    /// Validation error raised against a single field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut field_errors = FieldErrors::new();
        field_errors.insert(field.into(), vec![message.into()]);
        Self::validation(field_errors)
    }

    /// Build a configuration error from collected field messages.
    pub fn config(field_errors: FieldErrors) -> Self {
        let message = summarize_fields(&field_errors);
        Self::Config { message, field_errors }
    }

    /// Transient transport failure (connection refused, timeout).
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into(), retriable: true }
    }

    /// The caller cancelled the operation. Never retried.
    pub fn cancelled() -> Self {
        Self::Network { message: "Request cancelled".to_string(), retriable: false }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } => ErrorKind::Config,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Authorization { .. } => ErrorKind::Authorization,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RateLimit { .. } => ErrorKind::RateLimit,
            Self::Network { .. } => ErrorKind::Network,
            Self::Upstream { .. } => ErrorKind::Upstream,
            Self::UnexpectedApi { .. } => ErrorKind::UnexpectedApi,
            Self::ConfirmationRequired { .. } => ErrorKind::ConfirmationRequired,
        }
    }

    /// Whether repeating the same request could succeed.
    pub const fn is_retriable(&self) -> bool {
        match self {
            Self::RateLimit { .. } | Self::Upstream { .. } => true,
            Self::Network { retriable, .. } => *retriable,
            Self::Config { .. }
            | Self::Authentication { .. }
            | Self::Authorization { .. }
            | Self::Validation { .. }
            | Self::NotFound { .. }
            | Self::UnexpectedApi { .. }
            | Self::ConfirmationRequired { .. } => false,
        }
    }

    /// Human-readable message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Config { message, .. }
            | Self::Authentication { message }
            | Self::Authorization { message, .. }
            | Self::Validation { message, .. }
            | Self::NotFound { message }
            | Self::RateLimit { message, .. }
            | Self::Network { message, .. }
            | Self::Upstream { message, .. }
            | Self::UnexpectedApi { message, .. }
            | Self::ConfirmationRequired { message, .. } => message,
        }
    }

    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Config { field_errors, .. } | Self::Validation { field_errors, .. } => {
                Some(field_errors)
            }
            _ => None,
        }
    }
}

fn summarize_fields(field_errors: &FieldErrors) -> String {
    if field_errors.is_empty() {
        return "invalid input".to_string();
    }
    field_errors
        .iter()
        .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{field}: {m}")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Serializable view of a failed operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldErrors>,
    pub retriable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_usage: Option<PlanUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
}

impl From<&CronlyticError> for ErrorRecord {
    fn from(err: &CronlyticError) -> Self {
        let plan_usage = match err {
            CronlyticError::Authorization { usage, .. } => usage.clone(),
            _ => None,
        };
        let retry_after_seconds = match err {
            CronlyticError::RateLimit { retry_after_seconds, .. } => *retry_after_seconds,
            _ => None,
        };
        Self {
            kind: err.kind(),
            message: err.message().to_string(),
            field_errors: err.field_errors().cloned(),
            retriable: err.is_retriable(),
            plan_usage,
            retry_after_seconds,
        }
    }
}

impl From<CronlyticError> for ErrorRecord {
    fn from(err: CronlyticError) -> Self {
        Self::from(&err)
    }
}

/// Result type alias for Cronlytic operations
pub type Result<T> = std::result::Result<T, CronlyticError>;
