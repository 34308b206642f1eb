//! Read-only job views addressed by `cronlytic://` URIs

use async_trait::async_trait;
use cronlytic_core::jobs::{ListJobsQuery, LogsQuery};
use cronlytic_core::JobService;
use cronlytic_domain::{CronlyticError, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use super::{parse_arguments, Operation};
use crate::utils::format;

const SCHEME: &str = "cronlytic://";

/// A parsed resource address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri {
    /// `cronlytic://jobs`
    Jobs,
    /// `cronlytic://job/{id}`
    Job(String),
    /// `cronlytic://job/{id}/logs`
    JobLogs(String),
}

impl ResourceUri {
    /// # Errors
    /// `ValidationError` on field `uri` for anything outside the three
    /// supported shapes.
    pub fn parse(uri: &str) -> Result<Self> {
        let unknown = || {
            CronlyticError::invalid_field(
                "uri",
                format!(
                    "Unknown resource '{}'. Expected {SCHEME}jobs, {SCHEME}job/{{id}} or {SCHEME}job/{{id}}/logs",
                    format::sanitize(uri)
                ),
            )
        };

        let path = uri.trim().strip_prefix(SCHEME).ok_or_else(unknown)?;
        if path == "jobs" {
            return Ok(Self::Jobs);
        }
        let rest = path.strip_prefix("job/").ok_or_else(unknown)?;
        match rest.split('/').collect::<Vec<_>>().as_slice() {
            [id] if !id.is_empty() => Ok(Self::Job((*id).to_string())),
            [id, "logs"] if !id.is_empty() => Ok(Self::JobLogs((*id).to_string())),
            _ => Err(unknown()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResourceArgs {
    #[serde(default)]
    uri: String,
}

pub struct ReadResource {
    service: JobService,
}

impl ReadResource {
    pub fn new(service: JobService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Operation for ReadResource {
    fn name(&self) -> &'static str {
        "read_resource"
    }

    fn description(&self) -> &'static str {
        "Read a job resource: cronlytic://jobs, cronlytic://job/{id} or cronlytic://job/{id}/logs"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "uri": {
                    "type": "string",
                    "description": "Resource URI",
                    "pattern": "^cronlytic://"
                }
            },
            "required": ["uri"]
        })
    }

    async fn execute(&self, arguments: Value, cancel: &CancellationToken) -> Result<String> {
        let args: ResourceArgs = parse_arguments(arguments)?;
        match ResourceUri::parse(&args.uri)? {
            ResourceUri::Jobs => {
                let listing = self.service.list_jobs(ListJobsQuery::default(), cancel).await?;
                Ok(format::format_listing(&listing))
            }
            ResourceUri::Job(job_id) => {
                let job = self.service.get_job(&job_id, cancel).await?;
                Ok(format::format_job(&job))
            }
            ResourceUri::JobLogs(job_id) => {
                let logs = self.service.get_job_logs(&job_id, LogsQuery::default(), cancel).await?;
                Ok(format::format_logs(&logs))
            }
        }
    }
}
