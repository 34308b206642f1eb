//! Shared test helpers for `cronlytic-core` integration tests.
//!
//! Provides an in-memory `JobsApi` that records every call so tests can
//! assert which operations reached the port.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use cronlytic_core::JobsApi;
use cronlytic_domain::{
    CronlyticError, JobDefinition, JobLogs, JobRecord, JobStatus, LogEntry, Result, ServiceStatus,
};
use tokio_util::sync::CancellationToken;

/// In-memory mock for `JobsApi`.
///
/// Jobs live in a map keyed by id. Individual operations can be forced to
/// fail with a fixed error.
#[derive(Default)]
pub struct InMemoryJobsApi {
    jobs: Mutex<BTreeMap<String, JobRecord>>,
    logs: Mutex<Vec<LogEntry>>,
    calls: Mutex<Vec<&'static str>>,
    next_id: AtomicUsize,
    failures: Mutex<BTreeMap<&'static str, CronlyticError>>,
}

impl InMemoryJobsApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a job with the given status.
    pub fn with_job(self, job_id: &str, name: &str, status: JobStatus) -> Self {
        let record = JobRecord {
            job_id: job_id.to_string(),
            definition: definition(name),
            status,
            next_run_at: None,
            created_at: Some(fixed_time(0)),
        };
        self.jobs.lock().unwrap().insert(job_id.to_string(), record);
        self
    }

    /// Seed log entries; `offsets` are seconds after a fixed epoch.
    pub fn with_logs(self, offsets: &[i64]) -> Self {
        let entries = offsets
            .iter()
            .map(|offset| LogEntry {
                timestamp: fixed_time(*offset),
                http_status_code: Some(200),
                success: offset % 2 == 0,
                duration_ms: Some(120),
            })
            .collect();
        *self.logs.lock().unwrap() = entries;
        self
    }

    /// Make `operation` fail with `error` from now on.
    pub fn fail(self, operation: &'static str, error: CronlyticError) -> Self {
        self.failures.lock().unwrap().insert(operation, error);
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(operation);
        match self.failures.lock().unwrap().get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn lookup(&self, job_id: &str) -> Result<JobRecord> {
        self.jobs
            .lock()
            .unwrap()
            .get(job_id)
            .cloned()
            .ok_or_else(|| CronlyticError::NotFound { message: format!("Job {job_id} not found") })
    }

    fn set_status(&self, job_id: &str, status: JobStatus) -> Result<JobRecord> {
        let mut jobs = self.jobs.lock().unwrap();
        let record = jobs
            .get_mut(job_id)
            .ok_or_else(|| CronlyticError::NotFound { message: format!("Job {job_id} not found") })?;
        record.status = status;
        Ok(record.clone())
    }
}

pub fn fixed_time(offset_secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_760_000_000 + offset_secs, 0).unwrap()
}

pub fn definition(name: &str) -> JobDefinition {
    JobDefinition {
        name: name.to_string(),
        url: "https://example.com/hook".to_string(),
        method: Default::default(),
        headers: BTreeMap::new(),
        body: String::new(),
        cron_expression: "*/5 * * * *".to_string(),
    }
}

#[async_trait]
impl JobsApi for InMemoryJobsApi {
    async fn ping(&self, _cancel: &CancellationToken) -> Result<ServiceStatus> {
        self.record("ping")?;
        Ok(ServiceStatus { status: Some("ok".to_string()), message: None })
    }

    async fn create_job(
        &self,
        job: &JobDefinition,
        _cancel: &CancellationToken,
    ) -> Result<JobRecord> {
        self.record("create_job")?;
        let job_id = format!("job-{:04}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let record = JobRecord {
            job_id: job_id.clone(),
            definition: job.clone(),
            status: JobStatus::Pending,
            next_run_at: None,
            created_at: Some(Utc::now()),
        };
        self.jobs.lock().unwrap().insert(job_id, record.clone());
        Ok(record)
    }

    async fn list_jobs(&self, _cancel: &CancellationToken) -> Result<Vec<JobRecord>> {
        self.record("list_jobs")?;
        Ok(self.jobs.lock().unwrap().values().cloned().collect())
    }

    async fn get_job(&self, job_id: &str, _cancel: &CancellationToken) -> Result<JobRecord> {
        self.record("get_job")?;
        self.lookup(job_id)
    }

    async fn update_job(
        &self,
        job_id: &str,
        job: &JobDefinition,
        _cancel: &CancellationToken,
    ) -> Result<JobRecord> {
        self.record("update_job")?;
        let mut jobs = self.jobs.lock().unwrap();
        let record = jobs
            .get_mut(job_id)
            .ok_or_else(|| CronlyticError::NotFound { message: format!("Job {job_id} not found") })?;
        record.definition = job.clone();
        Ok(record.clone())
    }

    async fn delete_job(&self, job_id: &str, _cancel: &CancellationToken) -> Result<()> {
        self.record("delete_job")?;
        self.jobs
            .lock()
            .unwrap()
            .remove(job_id)
            .map(|_| ())
            .ok_or_else(|| CronlyticError::NotFound { message: format!("Job {job_id} not found") })
    }

    async fn pause_job(&self, job_id: &str, _cancel: &CancellationToken) -> Result<JobRecord> {
        self.record("pause_job")?;
        self.set_status(job_id, JobStatus::Paused)
    }

    async fn resume_job(&self, job_id: &str, _cancel: &CancellationToken) -> Result<JobRecord> {
        self.record("resume_job")?;
        self.set_status(job_id, JobStatus::Pending)
    }

    async fn get_job_logs(
        &self,
        job_id: &str,
        _limit: usize,
        _cancel: &CancellationToken,
    ) -> Result<JobLogs> {
        self.record("get_job_logs")?;
        let job = self.lookup(job_id)?;
        Ok(JobLogs {
            job_id: job_id.to_string(),
            job: Some(job),
            entries: self.logs.lock().unwrap().clone(),
        })
    }
}
