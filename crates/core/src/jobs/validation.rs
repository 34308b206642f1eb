//! Pre-flight validation for job input.
//!
//! Turns loosely typed caller input into a [`JobDefinition`] or a
//! `ValidationError` listing every violated rule. Nothing here performs I/O,
//! so a rejected request never reaches the network.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use cronlytic_common::validation::{StringValidator, UrlValidator, Validator};
use cronlytic_domain::constants::{MAX_JOB_NAME_LENGTH, MIN_JOB_ID_LENGTH};
use cronlytic_domain::{CronlyticError, HttpMethod, JobDefinition, Result};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::cron::validate_cron_expression;

pub const NAME_EMPTY: &str = "Job name cannot be empty";
pub const NAME_TOO_LONG: &str = "Job name cannot exceed 50 characters";
pub const NAME_CHARSET: &str =
    "Job name can only contain letters, numbers, hyphens (-), and underscores (_)";
pub const URL_EMPTY: &str = "URL cannot be empty";
pub const URL_SCHEME: &str = "URL must include a scheme (http:// or https://)";
pub const URL_HOST: &str = "URL must include a domain name";

/// Unvalidated job fields as supplied by a caller.
///
/// `headers` and `body` stay as raw JSON so that wrong shapes become field
/// errors instead of deserialization failures.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub headers: Option<Value>,
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub cron_expression: Option<String>,
}

fn name_pattern() -> &'static Regex {
    static NAME: OnceLock<Regex> = OnceLock::new();
    NAME.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static job name pattern"))
}

fn name_validator() -> StringValidator {
    StringValidator::new()
        .not_empty(NAME_EMPTY)
        .max_length(MAX_JOB_NAME_LENGTH, NAME_TOO_LONG)
        .compiled_pattern(name_pattern().clone(), NAME_CHARSET)
}

/// Validate a draft and build the job definition it describes.
///
/// All fields are checked even after the first failure.
pub fn validate_job_draft(draft: &JobDraft) -> Result<JobDefinition> {
    let mut validator = Validator::new();

    let name = draft.name.clone().unwrap_or_default();
    validator.validate_field("name", name.as_str(), &name_validator());

    let url = draft.url.as_deref().map(str::trim).unwrap_or_default().to_string();
    check_url(&mut validator, &url);

    let method = match draft.method.as_deref().map(str::trim) {
        None | Some("") => HttpMethod::default(),
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            validator.add_error("method", method_message());
            HttpMethod::default()
        }),
    };

    let headers = check_headers(&mut validator, draft.headers.as_ref());
    let body = check_body(&mut validator, draft.body.as_ref());

    let cron_expression = draft.cron_expression.as_deref().unwrap_or_default();
    for problem in validate_cron_expression(cron_expression) {
        validator.add_error("cron_expression", problem);
    }

    validator
        .finalize()
        .map_err(|errors| CronlyticError::validation(errors.into_field_map()))?;

    Ok(JobDefinition {
        name,
        url,
        method,
        headers,
        body,
        cron_expression: cron_expression.split_whitespace().collect::<Vec<_>>().join(" "),
    })
}

fn check_url(validator: &mut Validator, url: &str) {
    if url.is_empty() {
        validator.add_error("url", URL_EMPTY);
        return;
    }

    let lowered = url.to_ascii_lowercase();
    let Some(rest) = ["http://", "https://"]
        .iter()
        .find_map(|scheme| lowered.strip_prefix(scheme))
    else {
        validator.add_error("url", URL_SCHEME);
        return;
    };

    if rest.is_empty() || rest.starts_with(['/', '?', '#']) {
        validator.add_error("url", URL_HOST);
        return;
    }

    validator.validate_field("url", url, &UrlValidator::new().require_host());
}

fn method_message() -> String {
    let allowed: Vec<&str> = HttpMethod::ALL.iter().map(HttpMethod::as_str).collect();
    format!("HTTP method must be one of: {}", allowed.join(", "))
}

fn check_headers(validator: &mut Validator, raw: Option<&Value>) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    let map = match raw {
        None | Some(Value::Null) => return headers,
        Some(Value::Object(map)) => map,
        Some(_) => {
            validator.add_error("headers", "Headers must be an object of name/value strings");
            return headers;
        }
    };

    for (key, value) in map {
        if key.trim().is_empty() {
            validator.add_error("headers", "Header names cannot be empty");
            continue;
        }
        match value {
            Value::String(text) => {
                headers.insert(key.clone(), text.clone());
            }
            _ => validator.add_error("headers", format!("Header '{key}' must have a string value")),
        }
    }
    headers
}

fn check_body(validator: &mut Validator, raw: Option<&Value>) -> String {
    match raw {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(value @ (Value::Object(_) | Value::Array(_))) => value.to_string(),
        Some(_) => {
            validator.add_error("body", "Body must be a string");
            String::new()
        }
    }
}

/// Validate a job identifier used in a request path.
///
/// Returns the trimmed identifier.
pub fn validate_job_id(raw: &str) -> Result<String> {
    let job_id = raw.trim();
    if job_id.is_empty() {
        return Err(CronlyticError::invalid_field("job_id", "Job ID cannot be empty"));
    }
    if job_id.chars().count() < MIN_JOB_ID_LENGTH {
        return Err(CronlyticError::invalid_field("job_id", "Job ID appears to be too short"));
    }
    if job_id.chars().any(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace()) {
        return Err(CronlyticError::invalid_field("job_id", "Job ID contains invalid characters"));
    }
    Ok(job_id.to_string())
}
