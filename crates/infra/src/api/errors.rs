//! Mapping of HTTP outcomes onto the client error taxonomy.
//!
//! | Status             | Kind                 |
//! |--------------------|----------------------|
//! | 401                | AuthenticationError  |
//! | 403                | AuthorizationError   |
//! | 404                | NotFoundError        |
//! | 422                | ValidationError      |
//! | 429                | RateLimitError       |
//! | 5xx                | UpstreamError        |
//! | transport failure  | NetworkError         |
//! | anything else      | UnexpectedAPIError   |
//!
//! Caller-facing messages are fixed per kind. The service's `detail` text is
//! only surfaced for authorization failures (plan and limit information) and
//! as per-field messages on 422; everything else is logged at `debug` and
//! dropped. Raw bodies are never copied into errors.

use cronlytic_domain::{CronlyticError, FieldErrors, PlanUsage};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde_json::error::Category;
use serde_json::Value;
use tracing::debug;

use crate::http::TransportError;

const MAX_DETAIL_CHARS: usize = 300;

/// Build the error for a non-success response.
///
/// `resource` names what the request addressed (for example `Job 'abc'`) and
/// is only used in not-found messages.
pub fn error_from_status(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    resource: &str,
) -> CronlyticError {
    let payload: Option<Value> = serde_json::from_slice(body).ok();
    let detail = payload.as_ref().and_then(|value| value.get("detail"));
    let detail_text = detail.and_then(Value::as_str).map(truncate);

    match status {
        StatusCode::FORBIDDEN => return authorization_error(detail, detail_text),
        StatusCode::UNPROCESSABLE_ENTITY => {
            return CronlyticError::validation(field_errors_from(detail))
        }
        _ => {}
    }

    if let Some(text) = &detail_text {
        debug!(status = status.as_u16(), detail = %text, "upstream detail withheld");
    }

    match status {
        StatusCode::UNAUTHORIZED => CronlyticError::Authentication {
            message: "Authentication failed. Check your API key and user ID.".to_string(),
        },
        StatusCode::NOT_FOUND => CronlyticError::NotFound { message: format!("{resource} not found") },
        StatusCode::TOO_MANY_REQUESTS => CronlyticError::RateLimit {
            message: "Rate limit exceeded".to_string(),
            retry_after_seconds: retry_after(headers),
        },
        status if status.is_server_error() => CronlyticError::Upstream {
            status: status.as_u16(),
            message: format!("Cronlytic service error (HTTP {})", status.as_u16()),
        },
        status => CronlyticError::UnexpectedApi {
            status: Some(status.as_u16()),
            message: format!("Unexpected HTTP {} response", status.as_u16()),
        },
    }
}

/// A 2xx response whose body did not have the expected shape.
pub fn unexpected_body(status: StatusCode, operation: &str, err: &serde_json::Error) -> CronlyticError {
    CronlyticError::UnexpectedApi {
        status: Some(status.as_u16()),
        message: format!("Could not parse {operation} response: {}", category_label(err)),
    }
}

/// Convert a transport failure into a `NetworkError`.
pub fn error_from_transport(err: TransportError) -> CronlyticError {
    match err {
        TransportError::Cancelled => CronlyticError::cancelled(),
        TransportError::Timeout { attempts, .. } => {
            CronlyticError::network(format!("Request timed out after {attempts} attempt(s)"))
        }
        TransportError::Connect { attempts, .. } => CronlyticError::network(format!(
            "Could not connect to the Cronlytic API after {attempts} attempt(s)"
        )),
        TransportError::Request { message, attempts } => {
            debug!(error = %message, attempts, "request failed");
            CronlyticError::network(format!("Request failed after {attempts} attempt(s)"))
        }
        TransportError::Build(message) => {
            debug!(error = %message, "request could not be built");
            CronlyticError::UnexpectedApi {
                status: None,
                message: "Could not build the request".to_string(),
            }
        }
    }
}

fn category_label(err: &serde_json::Error) -> &'static str {
    match err.classify() {
        Category::Io => "I/O error",
        Category::Syntax => "malformed JSON",
        Category::Data => "unexpected structure",
        Category::Eof => "truncated body",
    }
}

fn authorization_error(detail: Option<&Value>, detail_text: Option<String>) -> CronlyticError {
    if let Some(Value::Object(map)) = detail {
        let usage = PlanUsage {
            plan: map.get("plan").and_then(Value::as_str).map(str::to_string),
            current_count: map.get("job_count").and_then(Value::as_u64),
            max_allowed: map.get("max_jobs").and_then(Value::as_u64),
        };
        let message = map
            .get("error")
            .and_then(Value::as_str)
            .map_or_else(|| "Authorization failed".to_string(), truncate);
        let has_usage =
            usage.plan.is_some() || usage.current_count.is_some() || usage.max_allowed.is_some();
        return CronlyticError::Authorization { message, usage: has_usage.then_some(usage) };
    }

    CronlyticError::Authorization {
        message: detail_text.unwrap_or_else(|| "Authorization failed".to_string()),
        usage: None,
    }
}

/// Pull per-field messages out of a 422 `detail`.
///
/// Accepts a list of `{loc, msg}` items, a map of field to message(s), or a
/// plain string.
fn field_errors_from(detail: Option<&Value>) -> FieldErrors {
    let mut fields = FieldErrors::new();
    let mut push = |field: String, message: &str| {
        fields.entry(field).or_default().push(truncate(message));
    };

    match detail {
        Some(Value::Array(items)) => {
            for item in items {
                let field = item
                    .get("loc")
                    .and_then(Value::as_array)
                    .and_then(|loc| loc.last())
                    .map_or_else(|| "request".to_string(), location_name);
                let message = item.get("msg").and_then(Value::as_str).unwrap_or("is invalid");
                push(field, message);
            }
        }
        Some(Value::Object(map)) => {
            for (field, value) in map {
                match value {
                    Value::String(message) => push(field.clone(), message),
                    Value::Array(messages) => {
                        for message in messages.iter().filter_map(Value::as_str) {
                            push(field.clone(), message);
                        }
                    }
                    _ => push(field.clone(), "is invalid"),
                }
            }
        }
        Some(Value::String(message)) => push("request".to_string(), message),
        _ => {}
    }

    if fields.is_empty() {
        fields.insert("request".to_string(), vec!["The service rejected the request".to_string()]);
    }
    fields
}

fn location_name(segment: &Value) -> String {
    match segment {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    }
}

fn retry_after(headers: &HeaderMap) -> Option<u64> {
    headers.get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_DETAIL_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_DETAIL_CHARS).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use cronlytic_domain::ErrorKind;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    use super::*;

    fn map(status: u16, body: &Value) -> CronlyticError {
        error_from_status(
            StatusCode::from_u16(status).unwrap(),
            &HeaderMap::new(),
            body.to_string().as_bytes(),
            "Job 'job-1'",
        )
    }

    #[test]
    fn status_table() {
        let cases = [
            (401, ErrorKind::Authentication, false),
            (403, ErrorKind::Authorization, false),
            (404, ErrorKind::NotFound, false),
            (422, ErrorKind::Validation, false),
            (429, ErrorKind::RateLimit, true),
            (500, ErrorKind::Upstream, true),
            (503, ErrorKind::Upstream, true),
            (400, ErrorKind::UnexpectedApi, false),
            (409, ErrorKind::UnexpectedApi, false),
        ];
        for (status, kind, retriable) in cases {
            let err = map(status, &json!({}));
            assert_eq!(err.kind(), kind, "status {status}");
            assert_eq!(err.is_retriable(), retriable, "status {status}");
        }
    }

    #[test]
    fn forbidden_carries_plan_usage() {
        let err = map(
            403,
            &json!({"detail": {"error": "Job limit reached", "plan": "free", "job_count": 5, "max_jobs": 5}}),
        );
        match err {
            CronlyticError::Authorization { message, usage: Some(usage) } => {
                assert_eq!(message, "Job limit reached");
                assert_eq!(usage.plan.as_deref(), Some("free"));
                assert_eq!(usage.current_count, Some(5));
                assert_eq!(usage.max_allowed, Some(5));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unprocessable_lists_fields() {
        let err = map(
            422,
            &json!({"detail": [
                {"loc": ["body", "cron_expression"], "msg": "invalid cron"},
                {"loc": ["body", "url"], "msg": "bad url"}
            ]}),
        );
        let fields = err.field_errors().unwrap();
        assert_eq!(fields["cron_expression"], vec!["invalid cron"]);
        assert_eq!(fields["url"], vec!["bad url"]);

        let err = map(422, &json!({"detail": "name taken"}));
        assert_eq!(err.field_errors().unwrap()["request"], vec!["name taken"]);
    }

    #[test]
    fn rate_limit_reads_retry_after() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));
        let err = error_from_status(StatusCode::TOO_MANY_REQUESTS, &headers, b"", "x");
        assert_eq!(
            err,
            CronlyticError::RateLimit {
                message: "Rate limit exceeded".into(),
                retry_after_seconds: Some(30)
            }
        );
    }

    #[test]
    fn non_json_server_error_does_not_echo_body() {
        let err = error_from_status(
            StatusCode::BAD_GATEWAY,
            &HeaderMap::new(),
            b"<html>secret upstream page</html>",
            "x",
        );
        assert_eq!(err.message(), "Cronlytic service error (HTTP 502)");
    }

    #[test]
    fn long_authorization_detail_is_truncated() {
        let err = map(403, &json!({"detail": "x".repeat(1000)}));
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert_eq!(err.message().chars().count(), MAX_DETAIL_CHARS + 3);
    }

    #[test]
    fn upstream_detail_is_not_surfaced() {
        let leaky = json!({"detail": "OperationalError: db-internal:5432 refused"});
        for status in [400, 401, 409, 429, 500, 503] {
            let err = map(status, &leaky);
            assert!(!err.message().contains("db-internal"), "status {status}: {}", err.message());
        }
        assert_eq!(map(500, &leaky).message(), "Cronlytic service error (HTTP 500)");
        assert_eq!(
            map(401, &leaky).message(),
            "Authentication failed. Check your API key and user ID."
        );
    }

    #[test]
    fn request_failures_do_not_echo_transport_text() {
        let err = error_from_transport(TransportError::Request {
            message: "error sending request for url (http://10.0.0.7/prog/jobs)".into(),
            attempts: 1,
        });
        assert_eq!(err.message(), "Request failed after 1 attempt(s)");
    }

    #[test]
    fn cancellation_is_not_retriable() {
        let err = error_from_transport(TransportError::Cancelled);
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(!err.is_retriable());

        let err = error_from_transport(TransportError::Connect { message: "refused".into(), attempts: 4 });
        assert!(err.is_retriable());
        assert!(err.message().contains("4 attempt(s)"));
    }
}
