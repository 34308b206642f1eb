//! Port interface for the remote job service
//!
//! One method per remote operation. Implementations own authentication,
//! retries, and status mapping; callers only see `CronlyticError`.

use async_trait::async_trait;
use cronlytic_domain::{JobDefinition, JobLogs, JobRecord, Result, ServiceStatus};
use tokio_util::sync::CancellationToken;

/// Remote job scheduling operations.
///
/// Every call observes `cancel`: once it fires, the in-flight request and any
/// backoff sleep are abandoned and the call returns a non-retriable
/// `NetworkError`.
#[async_trait]
pub trait JobsApi: Send + Sync {
    /// Check connectivity and credentials
    async fn ping(&self, cancel: &CancellationToken) -> Result<ServiceStatus>;

    async fn create_job(&self, job: &JobDefinition, cancel: &CancellationToken)
        -> Result<JobRecord>;

    async fn list_jobs(&self, cancel: &CancellationToken) -> Result<Vec<JobRecord>>;

    async fn get_job(&self, job_id: &str, cancel: &CancellationToken) -> Result<JobRecord>;

    /// Replace every field of an existing job
    async fn update_job(
        &self,
        job_id: &str,
        job: &JobDefinition,
        cancel: &CancellationToken,
    ) -> Result<JobRecord>;

    async fn delete_job(&self, job_id: &str, cancel: &CancellationToken) -> Result<()>;

    async fn pause_job(&self, job_id: &str, cancel: &CancellationToken) -> Result<JobRecord>;

    async fn resume_job(&self, job_id: &str, cancel: &CancellationToken) -> Result<JobRecord>;

    /// Most recent `limit` log entries, newest first
    async fn get_job_logs(
        &self,
        job_id: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<JobLogs>;
}
