//! Job operation service - core business logic
//!
//! Each operation validates its input, applies the confirmation gate where
//! one exists, and only then calls the [`JobsApi`] port.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use cronlytic_common::validation::{FieldValidator, RangeValidator};
use cronlytic_domain::constants::{DEFAULT_LOG_LIMIT, MAX_LIST_LIMIT, MAX_LOG_LIMIT};
use cronlytic_domain::{CronlyticError, ErrorKind, ErrorRecord, JobLogs, JobRecord, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::models::{
    DeletionReceipt, HealthReport, JobListing, ListJobsQuery, LogsQuery, PerformanceRating,
    StatusBreakdown,
};
use super::ports::JobsApi;
use super::validation::{validate_job_draft, validate_job_id, JobDraft};

pub const DELETE_CONFIRMATION_MESSAGE: &str =
    "Job deletion requires confirmation. Set 'confirm' parameter to true to proceed.";

/// Job operation service
#[derive(Clone)]
pub struct JobService {
    api: Arc<dyn JobsApi>,
}

impl JobService {
    /// Create a new service over the given API port
    pub fn new(api: Arc<dyn JobsApi>) -> Self {
        Self { api }
    }

    #[instrument(skip_all)]
    pub async fn create_job(&self, draft: &JobDraft, cancel: &CancellationToken) -> Result<JobRecord> {
        let job = validate_job_draft(draft)?;
        let record = self.api.create_job(&job, cancel).await?;
        info!(job_id = %record.job_id, name = %record.name(), "Job created");
        Ok(record)
    }

    /// List jobs, optionally hiding paused ones, truncated to `query.limit`.
    #[instrument(skip(self, cancel))]
    pub async fn list_jobs(
        &self,
        query: ListJobsQuery,
        cancel: &CancellationToken,
    ) -> Result<JobListing> {
        RangeValidator::new(1, MAX_LIST_LIMIT)
            .label("limit")
            .validate(&query.limit)
            .map_err(|message| CronlyticError::invalid_field("limit", message))?;

        let mut jobs = self.api.list_jobs(cancel).await?;
        if !query.include_paused {
            jobs.retain(|job| !job.is_paused());
        }

        let summary = StatusBreakdown::from_jobs(&jobs);
        let total_matching = jobs.len();
        let limited = total_matching > query.limit;
        jobs.truncate(query.limit);

        debug!(total_matching, returned = jobs.len(), "Listed jobs");
        Ok(JobListing {
            jobs,
            total_matching,
            summary,
            limited,
            limit_applied: limited.then_some(query.limit),
        })
    }

    #[instrument(skip(self, cancel))]
    pub async fn get_job(&self, job_id: &str, cancel: &CancellationToken) -> Result<JobRecord> {
        let job_id = validate_job_id(job_id)?;
        self.api.get_job(&job_id, cancel).await
    }

    /// Replace an existing job. Both the id and the full definition are
    /// validated before any request is made.
    #[instrument(skip(self, draft, cancel))]
    pub async fn update_job(
        &self,
        job_id: &str,
        draft: &JobDraft,
        cancel: &CancellationToken,
    ) -> Result<JobRecord> {
        let id_result = validate_job_id(job_id);
        let job_result = validate_job_draft(draft);
        let (job_id, job) = match (id_result, job_result) {
            (Ok(job_id), Ok(job)) => (job_id, job),
            (Err(id_err), Err(job_err)) => return Err(merge_validation(id_err, job_err)),
            (Err(err), Ok(_)) | (Ok(_), Err(err)) => return Err(err),
        };

        let record = self.api.update_job(&job_id, &job, cancel).await?;
        info!(job_id = %record.job_id, "Job updated");
        Ok(record)
    }

    /// Delete a job. Without `confirm` this returns `ConfirmationRequired`
    /// and makes no request at all.
    #[instrument(skip(self, cancel))]
    pub async fn delete_job(
        &self,
        job_id: &str,
        confirm: bool,
        cancel: &CancellationToken,
    ) -> Result<DeletionReceipt> {
        let job_id = validate_job_id(job_id)?;
        if !confirm {
            return Err(CronlyticError::ConfirmationRequired {
                message: DELETE_CONFIRMATION_MESSAGE.to_string(),
                job_id,
            });
        }

        let job_name = match self.api.get_job(&job_id, cancel).await {
            Ok(record) => Some(record.definition.name),
            Err(err) => {
                debug!(error = %err, "Could not look up job name before delete");
                None
            }
        };

        self.api.delete_job(&job_id, cancel).await?;
        info!(job_id = %job_id, "Job deleted");
        Ok(DeletionReceipt { job_id, job_name, deleted_at: Utc::now() })
    }

    #[instrument(skip(self, cancel))]
    pub async fn pause_job(&self, job_id: &str, cancel: &CancellationToken) -> Result<JobRecord> {
        let job_id = validate_job_id(job_id)?;
        let record = self.api.pause_job(&job_id, cancel).await?;
        info!(job_id = %record.job_id, "Job paused");
        Ok(record)
    }

    #[instrument(skip(self, cancel))]
    pub async fn resume_job(&self, job_id: &str, cancel: &CancellationToken) -> Result<JobRecord> {
        let job_id = validate_job_id(job_id)?;
        let record = self.api.resume_job(&job_id, cancel).await?;
        info!(job_id = %record.job_id, "Job resumed");
        Ok(record)
    }

    /// Fetch recent logs. A limit outside 1..=100 falls back to the default.
    #[instrument(skip(self, cancel))]
    pub async fn get_job_logs(
        &self,
        job_id: &str,
        query: LogsQuery,
        cancel: &CancellationToken,
    ) -> Result<JobLogs> {
        let job_id = validate_job_id(job_id)?;
        let limit = if (1..=MAX_LOG_LIMIT).contains(&query.limit) {
            query.limit
        } else {
            debug!(requested = query.limit, "Log limit out of range, using default");
            DEFAULT_LOG_LIMIT
        };

        let mut logs = self.api.get_job_logs(&job_id, limit, cancel).await?;
        logs.entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        logs.entries.truncate(limit);
        Ok(logs)
    }

    /// Check connectivity, credentials, and latency. Never returns an error.
    #[instrument(skip_all)]
    pub async fn health_check(&self, cancel: &CancellationToken) -> HealthReport {
        let started = Instant::now();
        let ping = self.api.ping(cancel).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let service_status = match ping {
            Ok(status) => status,
            Err(err) => {
                warn!(error = %err, kind = %err.kind(), "Health check failed");
                return HealthReport {
                    healthy: false,
                    response_time_ms: None,
                    performance: None,
                    service_status: None,
                    job_count: None,
                    recommendations: failure_recommendations(&err),
                    error: Some(ErrorRecord::from(&err)),
                    checked_at: Utc::now(),
                };
            }
        };

        let mut recommendations = Vec::new();
        let job_count = match self.api.list_jobs(cancel).await {
            Ok(jobs) => {
                if jobs.is_empty() {
                    recommendations.push(
                        "No jobs found. You can create your first job using the create_job operation."
                            .to_string(),
                    );
                } else {
                    recommendations.push(format!(
                        "Found {} job(s). All systems appear to be working correctly.",
                        jobs.len()
                    ));
                }
                Some(jobs.len())
            }
            Err(err) => {
                warn!(error = %err, "Job listing failed during health check");
                recommendations.push(
                    "Authentication succeeded but job listing failed. Check API permissions."
                        .to_string(),
                );
                None
            }
        };

        let performance = PerformanceRating::from_latency_ms(elapsed_ms);
        match performance {
            PerformanceRating::Fair => recommendations
                .push("Response time is a bit slow. Check your network connection.".to_string()),
            PerformanceRating::Poor => recommendations.push(
                "Response time is very slow. Check your network connection and API status."
                    .to_string(),
            ),
            PerformanceRating::Excellent | PerformanceRating::Good => {}
        }

        info!(response_time_ms = elapsed_ms, performance = performance.as_str(), "Health check passed");
        HealthReport {
            healthy: true,
            response_time_ms: Some(elapsed_ms),
            performance: Some(performance),
            service_status: Some(service_status),
            job_count,
            error: None,
            recommendations,
            checked_at: Utc::now(),
        }
    }
}

fn merge_validation(first: CronlyticError, second: CronlyticError) -> CronlyticError {
    let mut fields = first.field_errors().cloned().unwrap_or_default();
    for (field, messages) in second.field_errors().cloned().unwrap_or_default() {
        fields.entry(field).or_default().extend(messages);
    }
    CronlyticError::validation(fields)
}

fn failure_recommendations(err: &CronlyticError) -> Vec<String> {
    let lines: &[&str] = match err.kind() {
        ErrorKind::Authentication | ErrorKind::Authorization => &[
            "Check that your API key and User ID are correct",
            "Verify that your credentials are not expired",
            "Ensure you're using the correct environment variables or config file",
        ],
        ErrorKind::Network => &[
            "Check your internet connection",
            "Verify that the Cronlytic API host is reachable",
            "Check if there are any firewall restrictions",
        ],
        ErrorKind::RateLimit => &["Too many requests. Wait a moment before checking again."],
        ErrorKind::Upstream => &["The Cronlytic service reported a server error. Try again later."],
        ErrorKind::Config
        | ErrorKind::Validation
        | ErrorKind::NotFound
        | ErrorKind::UnexpectedApi
        | ErrorKind::ConfirmationRequired => {
            &["An unexpected error occurred. Please check your configuration and try again."]
        }
    };
    lines.iter().map(|line| (*line).to_string()).collect()
}
