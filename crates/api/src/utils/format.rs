//! Text rendering of operation results and errors.
//!
//! Output is Markdown meant for a calling agent. Every string that came from
//! the service goes through [`sanitize`] first, and header values and request
//! bodies are never echoed since they commonly hold credentials.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use cronlytic_core::jobs::{describe_cron, DeletionReceipt, HealthReport, JobListing};
use cronlytic_domain::{CronlyticError, JobLogs, JobRecord};

use crate::utils::metrics::OperationStats;

const MAX_FIELD_CHARS: usize = 200;

/// Collapse control characters and cap length so upstream text cannot break
/// the layout.
pub fn sanitize(text: &str) -> String {
    let cleaned: String =
        text.chars().map(|c| if c.is_control() { ' ' } else { c }).collect::<String>();
    let cleaned = cleaned.trim();
    if cleaned.chars().count() <= MAX_FIELD_CHARS {
        return cleaned.to_string();
    }
    let mut cut: String = cleaned.chars().take(MAX_FIELD_CHARS).collect();
    cut.push_str("...");
    cut
}

fn timestamp(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Append `text` on a new line.
fn line(out: &mut String, text: impl AsRef<str>) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(text.as_ref());
}

/// Full description of one job.
pub fn format_job(job: &JobRecord) -> String {
    let definition = &job.definition;
    let mut out = format!("**{}** (`{}`)", sanitize(&definition.name), sanitize(&job.job_id));
    line(&mut out, format!("- Status: {}", job.status));
    line(
        &mut out,
        format!(
            "- Schedule: `{}` ({})",
            sanitize(&definition.cron_expression),
            describe_cron(&definition.cron_expression)
        ),
    );
    line(&mut out, format!("- Target: {} {}", definition.method, sanitize(&definition.url)));
    if !definition.headers.is_empty() {
        let names: Vec<String> = definition.headers.keys().map(|name| sanitize(name)).collect();
        line(&mut out, format!("- Headers: {}", names.join(", ")));
    }
    if !definition.body.is_empty() {
        line(&mut out, format!("- Body: {} characters", definition.body.chars().count()));
    }
    match &job.next_run_at {
        Some(next) => line(&mut out, format!("- Next run: {}", timestamp(next))),
        None => line(&mut out, "- Next run: not scheduled"),
    }
    if let Some(created) = &job.created_at {
        line(&mut out, format!("- Created: {}", timestamp(created)));
    }
    out
}

pub fn format_created(job: &JobRecord) -> String {
    format!("Job '{}' created successfully.\n\n{}", sanitize(job.name()), format_job(job))
}

pub fn format_updated(job: &JobRecord) -> String {
    format!("Job '{}' updated successfully.\n\n{}", sanitize(job.name()), format_job(job))
}

pub fn format_paused(job: &JobRecord) -> String {
    format!(
        "Job '{}' paused. It will not run until resumed.\n\n{}",
        sanitize(job.name()),
        format_job(job)
    )
}

pub fn format_resumed(job: &JobRecord) -> String {
    format!(
        "Job '{}' resumed and will run on schedule.\n\n{}",
        sanitize(job.name()),
        format_job(job)
    )
}

pub fn format_listing(listing: &JobListing) -> String {
    let mut out = format!("Found {}", plural(listing.total_matching, "job"));
    if listing.jobs.is_empty() {
        out.push('.');
        return out;
    }

    let summary = &listing.summary;
    out.push_str(&format!(
        " (pending: {}, paused: {}, success: {}, failed: {}",
        summary.pending, summary.paused, summary.success, summary.failed
    ));
    if summary.unknown > 0 {
        out.push_str(&format!(", unknown: {}", summary.unknown));
    }
    out.push_str(")\n");

    for job in &listing.jobs {
        line(
            &mut out,
            format!(
                "- **{}** (`{}`): {}, `{}`",
                sanitize(job.name()),
                sanitize(&job.job_id),
                job.status,
                sanitize(&job.definition.cron_expression)
            ),
        );
    }

    if let Some(limit) = listing.limit_applied {
        out.push_str(&format!(
            "\n\nShowing the first {limit} of {}. Raise `limit` to see more.",
            listing.total_matching
        ));
    }
    out
}

pub fn format_receipt(receipt: &DeletionReceipt) -> String {
    match &receipt.job_name {
        Some(name) => format!(
            "Job '{}' (`{}`) has been permanently deleted.",
            sanitize(name),
            sanitize(&receipt.job_id)
        ),
        None => format!("Job `{}` has been permanently deleted.", sanitize(&receipt.job_id)),
    }
}

pub fn format_logs(logs: &JobLogs) -> String {
    let subject = logs.job.as_ref().map_or_else(
        || format!("`{}`", sanitize(&logs.job_id)),
        |job| format!("'{}' (`{}`)", sanitize(job.name()), sanitize(&logs.job_id)),
    );
    let mut out = format!("Execution logs for {subject}: {}", plural(logs.entries.len(), "entry"));
    if logs.entries.is_empty() {
        out.push_str(". The job has not run yet.");
        return out;
    }

    out.push_str(&format!(
        " ({} succeeded, {} failed)\n",
        logs.success_count(),
        logs.failure_count()
    ));
    for entry in &logs.entries {
        let outcome = if entry.success { "OK" } else { "FAILED" };
        let mut text = format!("- {}: {outcome}", timestamp(&entry.timestamp));
        if let Some(code) = entry.http_status_code {
            text.push_str(&format!(", HTTP {code}"));
        }
        if let Some(ms) = entry.duration_ms {
            text.push_str(&format!(", {ms} ms"));
        }
        line(&mut out, text);
    }
    out
}

pub fn format_health(report: &HealthReport) -> String {
    let mut out = String::new();
    if report.healthy {
        out.push_str("Cronlytic API is healthy.");
        if let (Some(ms), Some(performance)) = (report.response_time_ms, report.performance) {
            line(&mut out, format!("- Response time: {ms} ms ({})", performance.as_str()));
        }
        if let Some(message) = report.service_status.as_ref().and_then(|s| s.message.as_deref()) {
            line(&mut out, format!("- Service: {}", sanitize(message)));
        }
        if let Some(count) = report.job_count {
            line(&mut out, format!("- Jobs: {count}"));
        }
    } else {
        out.push_str("Cronlytic API is unreachable or rejected the credentials.");
        if let Some(error) = &report.error {
            line(&mut out, format!("- {}: {}", error.kind, sanitize(&error.message)));
        }
    }

    if !report.recommendations.is_empty() {
        out.push_str("\n\nRecommendations:");
        for recommendation in &report.recommendations {
            line(&mut out, format!("- {recommendation}"));
        }
    }
    out.push_str(&format!("\n\nChecked at {}", timestamp(&report.checked_at)));
    out
}

fn millis(value: Duration) -> String {
    format!("{:.1} ms", value.as_secs_f64() * 1000.0)
}

/// Per-operation counters, one entry per operation that has been called.
pub fn format_performance(stats: &BTreeMap<String, OperationStats>) -> String {
    if stats.is_empty() {
        return "No operations recorded yet.".to_string();
    }

    let calls: u64 = stats.values().map(|s| s.calls).sum();
    let errors: u64 = stats.values().map(|s| s.errors).sum();
    let mut out = format!(
        "Performance across {}: {calls} calls, {errors} errors\n",
        plural(stats.len(), "operation")
    );
    for (name, s) in stats {
        line(
            &mut out,
            format!(
                "- **{name}**: {} calls, {} errors ({:.1}% success), avg {}, min {}, max {}, last {}",
                s.calls,
                s.errors,
                s.success_rate(),
                millis(s.average()),
                millis(s.min),
                millis(s.max),
                timestamp(&s.last_called)
            ),
        );
    }
    out
}

/// Render an error for the caller. Only the kind's own payload is shown.
pub fn format_error(err: &CronlyticError) -> String {
    let mut out = format!("**{}**: {}", err.kind(), sanitize(err.message()));

    match err {
        CronlyticError::Validation { field_errors, .. } | CronlyticError::Config { field_errors, .. } => {
            for (field, messages) in field_errors {
                for message in messages {
                    line(&mut out, format!("- `{}`: {}", sanitize(field), sanitize(message)));
                }
            }
        }
        CronlyticError::Authorization { usage: Some(usage), .. } => {
            if let (Some(current), Some(max)) = (usage.current_count, usage.max_allowed) {
                line(&mut out, format!("- Usage: {current} of {max} jobs"));
            }
            if let Some(plan) = &usage.plan {
                line(&mut out, format!("- Plan: {}", sanitize(plan)));
            }
        }
        CronlyticError::RateLimit { retry_after_seconds: Some(seconds), .. } => {
            line(&mut out, format!("- Retry after: {seconds} seconds"));
        }
        CronlyticError::ConfirmationRequired { job_id, .. } => {
            line(&mut out, format!("- Job: `{}`", sanitize(job_id)));
        }
        _ => {}
    }

    if err.is_retriable() {
        out.push_str("\n\nThis error is temporary; the request can be retried.");
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use cronlytic_core::jobs::StatusBreakdown;
    use cronlytic_domain::{FieldErrors, HttpMethod, JobDefinition, JobStatus, PlanUsage};

    use super::*;

    fn job() -> JobRecord {
        JobRecord {
            job_id: "job-abc".into(),
            definition: JobDefinition {
                name: "daily-sync".into(),
                url: "https://example.com/sync".into(),
                method: HttpMethod::Post,
                headers: [("Authorization".to_string(), "Bearer s3cret".to_string())].into(),
                body: r#"{"token":"s3cret"}"#.into(),
                cron_expression: "0 9 * * *".into(),
            },
            status: JobStatus::Pending,
            next_run_at: None,
            created_at: Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).single(),
        }
    }

    #[test]
    fn job_output_hides_secrets() {
        let text = format_job(&job());
        assert!(text.contains("`job-abc`"));
        assert!(text.contains("- Status: pending"));
        assert!(text.contains("Authorization"));
        assert!(!text.contains("s3cret"));
        assert!(text.contains("- Next run: not scheduled"));
    }

    #[test]
    fn sanitize_strips_control_characters() {
        assert_eq!(sanitize("line one\nline\ttwo\u{1b}[31m"), "line one line two [31m");
        assert_eq!(sanitize(&"y".repeat(500)).chars().count(), MAX_FIELD_CHARS + 3);
    }

    #[test]
    fn listing_mentions_limit() {
        let listing = JobListing {
            jobs: vec![job()],
            total_matching: 3,
            summary: StatusBreakdown { pending: 3, ..Default::default() },
            limited: true,
            limit_applied: Some(1),
        };
        let text = format_listing(&listing);
        assert!(text.starts_with("Found 3 jobs (pending: 3"));
        assert!(text.contains("Showing the first 1 of 3"));
    }

    #[test]
    fn validation_errors_list_every_field() {
        let mut fields = FieldErrors::new();
        fields.insert("name".into(), vec!["Job name cannot be empty".into()]);
        fields.insert("url".into(), vec!["URL must include a scheme (http:// or https://)".into()]);
        let text = format_error(&CronlyticError::validation(fields));

        assert!(text.starts_with("**ValidationError**"));
        assert!(text.contains("- `name`: Job name cannot be empty"));
        assert!(text.contains("- `url`: URL must include a scheme (http:// or https://)"));
        assert!(!text.contains("temporary"));
    }

    #[test]
    fn authorization_shows_usage() {
        let err = CronlyticError::Authorization {
            message: "Job limit reached".into(),
            usage: Some(PlanUsage {
                plan: Some("free".into()),
                current_count: Some(5),
                max_allowed: Some(5),
            }),
        };
        let text = format_error(&err);
        assert!(text.contains("Usage: 5 of 5 jobs"));
        assert!(text.contains("Plan: free"));
    }

    #[test]
    fn retriable_errors_say_so() {
        let text = format_error(&CronlyticError::network("connection refused"));
        assert!(text.starts_with("**NetworkError**"));
        assert!(text.ends_with("the request can be retried."));
    }

    #[test]
    fn job_without_creation_time_has_no_trailing_line() {
        let mut record = job();
        record.created_at = None;
        record.definition.headers.clear();
        record.definition.body.clear();
        let text = format_job(&record);
        assert!(!text.contains("Created"));
        assert!(text.ends_with("- Next run: not scheduled"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn listing_separates_header_from_entries() {
        let listing = JobListing {
            jobs: vec![job()],
            total_matching: 1,
            summary: StatusBreakdown { pending: 1, ..Default::default() },
            limited: false,
            limit_applied: None,
        };
        let text = format_listing(&listing);
        assert!(text.starts_with("Found 1 job (pending: 1, paused: 0, success: 0, failed: 0)\n\n- **daily-sync**"));
        assert!(text.ends_with("`0 9 * * *`"));
    }
}
