//! Integration tests for `JobService`
//!
//! Drives every operation against the in-memory port and checks which calls
//! reached it.

mod support;

use std::sync::Arc;

use cronlytic_core::jobs::{ListJobsQuery, LogsQuery, PerformanceRating};
use cronlytic_core::{JobDraft, JobService};
use cronlytic_domain::{CronlyticError, ErrorKind, JobStatus};
use serde_json::json;
use support::InMemoryJobsApi;
use tokio_util::sync::CancellationToken;

fn service(api: InMemoryJobsApi) -> (JobService, Arc<InMemoryJobsApi>) {
    let api = Arc::new(api);
    (JobService::new(api.clone()), api)
}

fn draft(value: serde_json::Value) -> JobDraft {
    serde_json::from_value(value).unwrap()
}

fn valid_draft() -> JobDraft {
    draft(json!({
        "name": "nightly-report",
        "url": "https://example.com/report",
        "method": "post",
        "cron_expression": "0 2 * * *"
    }))
}

#[tokio::test]
async fn create_returns_pending_job_with_id() {
    let (service, api) = service(InMemoryJobsApi::new());
    let cancel = CancellationToken::new();

    let record = service.create_job(&valid_draft(), &cancel).await.unwrap();

    assert!(!record.job_id.is_empty());
    assert_eq!(record.status, JobStatus::Pending);
    assert_eq!(api.calls(), vec!["create_job"]);
}

#[tokio::test]
async fn create_then_get_round_trips_definition() {
    let (service, _api) = service(InMemoryJobsApi::new());
    let cancel = CancellationToken::new();

    let created = service.create_job(&valid_draft(), &cancel).await.unwrap();
    let fetched = service.get_job(&created.job_id, &cancel).await.unwrap();

    assert_eq!(fetched.definition, created.definition);
    assert_eq!(fetched.definition.method.as_str(), "POST");
}

#[tokio::test]
async fn invalid_url_never_reaches_port() {
    let (service, api) = service(InMemoryJobsApi::new());

    let err = service
        .create_job(
            &draft(json!({"name": "ok", "url": "ftp://example.com", "cron_expression": "* * * * *"})),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.field_errors().unwrap().contains_key("url"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn delete_without_confirmation_makes_no_call() {
    let (service, api) = service(InMemoryJobsApi::new().with_job("job-1", "a", JobStatus::Pending));

    let err = service.delete_job("job-1", false, &CancellationToken::new()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConfirmationRequired);
    assert_eq!(
        err.message(),
        "Job deletion requires confirmation. Set 'confirm' parameter to true to proceed."
    );
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn confirmed_delete_reports_job_name() {
    let (service, api) =
        service(InMemoryJobsApi::new().with_job("job-1", "cleanup", JobStatus::Paused));

    let receipt = service.delete_job("job-1", true, &CancellationToken::new()).await.unwrap();

    assert_eq!(receipt.job_id, "job-1");
    assert_eq!(receipt.job_name.as_deref(), Some("cleanup"));
    assert_eq!(api.calls(), vec!["get_job", "delete_job"]);
}

#[tokio::test]
async fn failed_name_lookup_does_not_block_delete() {
    let (service, api) = service(
        InMemoryJobsApi::new()
            .with_job("job-1", "cleanup", JobStatus::Pending)
            .fail("get_job", CronlyticError::network("connection reset")),
    );

    let receipt = service.delete_job("job-1", true, &CancellationToken::new()).await.unwrap();

    assert!(receipt.job_name.is_none());
    assert_eq!(api.calls(), vec!["get_job", "delete_job"]);
}

#[tokio::test]
async fn list_filters_paused_and_applies_limit() {
    let api = InMemoryJobsApi::new()
        .with_job("job-a", "a", JobStatus::Pending)
        .with_job("job-b", "b", JobStatus::Paused)
        .with_job("job-c", "c", JobStatus::Failed)
        .with_job("job-d", "d", JobStatus::Success);
    let (service, _api) = service(api);
    let cancel = CancellationToken::new();

    let all = service.list_jobs(ListJobsQuery::default(), &cancel).await.unwrap();
    assert_eq!(all.jobs.len(), 4);
    assert!(!all.limited);
    assert_eq!(all.summary.paused, 1);

    let active = service
        .list_jobs(ListJobsQuery { include_paused: false, limit: 2 }, &cancel)
        .await
        .unwrap();
    assert_eq!(active.total_matching, 3);
    assert_eq!(active.jobs.len(), 2);
    assert!(active.limited);
    assert_eq!(active.limit_applied, Some(2));
    assert_eq!(active.summary.paused, 0);
    assert_eq!(active.summary.total(), 3);
}

#[tokio::test]
async fn list_rejects_out_of_range_limit() {
    let (service, api) = service(InMemoryJobsApi::new());

    for limit in [0, 101] {
        let err = service
            .list_jobs(ListJobsQuery { include_paused: true, limit }, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn update_reports_id_and_body_problems_together() {
    let (service, api) = service(InMemoryJobsApi::new());

    let err = service
        .update_job("x", &draft(json!({"name": "bad name"})), &CancellationToken::new())
        .await
        .unwrap_err();

    let fields = err.field_errors().unwrap();
    for field in ["job_id", "name", "url", "cron_expression"] {
        assert!(fields.contains_key(field), "missing {field}");
    }
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn pause_and_resume_change_status() {
    let (service, _api) = service(InMemoryJobsApi::new().with_job("job-1", "a", JobStatus::Pending));
    let cancel = CancellationToken::new();

    assert_eq!(service.pause_job("job-1", &cancel).await.unwrap().status, JobStatus::Paused);
    assert_eq!(service.resume_job("job-1", &cancel).await.unwrap().status, JobStatus::Pending);
}

#[tokio::test]
async fn logs_are_newest_first_and_limit_falls_back() {
    let offsets: Vec<i64> = (0..30).collect();
    let (service, _api) = service(
        InMemoryJobsApi::new().with_job("job-1", "a", JobStatus::Success).with_logs(&offsets),
    );
    let cancel = CancellationToken::new();

    let logs = service.get_job_logs("job-1", LogsQuery { limit: 5 }, &cancel).await.unwrap();
    assert_eq!(logs.entries.len(), 5);
    assert!(logs.entries.windows(2).all(|pair| pair[0].timestamp >= pair[1].timestamp));
    assert_eq!(logs.entries[0].timestamp, support::fixed_time(29));

    let logs = service.get_job_logs("job-1", LogsQuery { limit: 500 }, &cancel).await.unwrap();
    assert_eq!(logs.entries.len(), 20);
}

#[tokio::test]
async fn health_check_reports_job_count() {
    let (service, api) = service(InMemoryJobsApi::new().with_job("job-1", "a", JobStatus::Pending));

    let report = service.health_check(&CancellationToken::new()).await;

    assert!(report.healthy);
    assert_eq!(report.job_count, Some(1));
    assert_eq!(report.performance, Some(PerformanceRating::Excellent));
    assert!(report.recommendations[0].starts_with("Found 1 job(s)"));
    assert_eq!(api.calls(), vec!["ping", "list_jobs"]);
}

#[tokio::test]
async fn health_check_turns_failures_into_report() {
    let (service, api) = service(InMemoryJobsApi::new().fail(
        "ping",
        CronlyticError::Authentication { message: "Invalid API key".to_string() },
    ));

    let report = service.health_check(&CancellationToken::new()).await;

    assert!(!report.healthy);
    assert_eq!(report.error.as_ref().map(|e| e.kind), Some(ErrorKind::Authentication));
    assert!(report.recommendations.iter().any(|r| r.contains("API key and User ID")));
    assert_eq!(api.calls(), vec!["ping"]);
}
