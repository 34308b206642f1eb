//! Pause, resume, and execution log operations

use async_trait::async_trait;
use cronlytic_core::jobs::LogsQuery;
use cronlytic_core::JobService;
use cronlytic_domain::constants::{DEFAULT_LOG_LIMIT, MAX_LOG_LIMIT};
use cronlytic_domain::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use super::{job_id_schema, parse_arguments, Operation};
use crate::utils::format;

#[derive(Debug, Deserialize)]
struct JobIdArgs {
    #[serde(default)]
    job_id: String,
}

pub struct PauseJob {
    service: JobService,
}

impl PauseJob {
    pub fn new(service: JobService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Operation for PauseJob {
    fn name(&self) -> &'static str {
        "pause_job"
    }

    fn description(&self) -> &'static str {
        "Pause a job so it stops running on its schedule"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"job_id": job_id_schema("Identifier of the job to pause")},
            "required": ["job_id"]
        })
    }

    async fn execute(&self, arguments: Value, cancel: &CancellationToken) -> Result<String> {
        let args: JobIdArgs = parse_arguments(arguments)?;
        let job = self.service.pause_job(&args.job_id, cancel).await?;
        Ok(format::format_paused(&job))
    }
}

pub struct ResumeJob {
    service: JobService,
}

impl ResumeJob {
    pub fn new(service: JobService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Operation for ResumeJob {
    fn name(&self) -> &'static str {
        "resume_job"
    }

    fn description(&self) -> &'static str {
        "Resume a paused job"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"job_id": job_id_schema("Identifier of the job to resume")},
            "required": ["job_id"]
        })
    }

    async fn execute(&self, arguments: Value, cancel: &CancellationToken) -> Result<String> {
        let args: JobIdArgs = parse_arguments(arguments)?;
        let job = self.service.resume_job(&args.job_id, cancel).await?;
        Ok(format::format_resumed(&job))
    }
}

#[derive(Debug, Deserialize)]
struct LogsArgs {
    #[serde(default)]
    job_id: String,
    /// Out-of-range values fall back to the default inside the service.
    #[serde(default)]
    limit: Option<i64>,
}

pub struct GetJobLogs {
    service: JobService,
}

impl GetJobLogs {
    pub fn new(service: JobService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Operation for GetJobLogs {
    fn name(&self) -> &'static str {
        "get_job_logs"
    }

    fn description(&self) -> &'static str {
        "Get recent execution logs for a job, newest first"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "job_id": job_id_schema("Identifier of the job"),
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_LOG_LIMIT,
                    "default": DEFAULT_LOG_LIMIT,
                    "description": "Maximum number of log entries to return"
                }
            },
            "required": ["job_id"]
        })
    }

    async fn execute(&self, arguments: Value, cancel: &CancellationToken) -> Result<String> {
        let args: LogsArgs = parse_arguments(arguments)?;
        // Negative values become 0; the service swaps any out-of-range limit
        // for the default.
        let limit = args.limit.map_or(DEFAULT_LOG_LIMIT, |raw| usize::try_from(raw).unwrap_or(0));
        let logs = self.service.get_job_logs(&args.job_id, LogsQuery { limit }, cancel).await?;
        Ok(format::format_logs(&logs))
    }
}
