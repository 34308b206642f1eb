//! Job CRUD operations

use async_trait::async_trait;
use cronlytic_core::jobs::ListJobsQuery;
use cronlytic_core::{JobDraft, JobService};
use cronlytic_domain::constants::{DEFAULT_LIST_LIMIT, MAX_JOB_NAME_LENGTH, MAX_LIST_LIMIT};
use cronlytic_domain::{HttpMethod, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use super::{job_id_schema, parse_arguments, Operation};
use crate::utils::format;

fn job_properties() -> Value {
    let methods: Vec<&str> = HttpMethod::ALL.iter().map(HttpMethod::as_str).collect();
    json!({
        "name": {
            "type": "string",
            "description": "Job name (letters, numbers, hyphens, underscores only)",
            "pattern": "^[a-zA-Z0-9_-]+$",
            "maxLength": MAX_JOB_NAME_LENGTH
        },
        "url": {
            "type": "string",
            "description": "Webhook URL to call (must be http:// or https://)",
            "format": "uri"
        },
        "method": {
            "type": "string",
            "enum": methods,
            "default": "GET",
            "description": "HTTP method for the webhook call"
        },
        "headers": {
            "type": "object",
            "additionalProperties": {"type": "string"},
            "default": {},
            "description": "HTTP headers to include with the request"
        },
        "body": {
            "type": "string",
            "default": "",
            "description": "Request body content"
        },
        "cron_expression": {
            "type": "string",
            "description": "5-field cron expression (minute hour day month day-of-week)"
        }
    })
}

pub struct CreateJob {
    service: JobService,
}

impl CreateJob {
    pub fn new(service: JobService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Operation for CreateJob {
    fn name(&self) -> &'static str {
        "create_job"
    }

    fn description(&self) -> &'static str {
        "Create a new cron job in Cronlytic"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": job_properties(),
            "required": ["name", "url", "cron_expression"]
        })
    }

    async fn execute(&self, arguments: Value, cancel: &CancellationToken) -> Result<String> {
        let draft: JobDraft = parse_arguments(arguments)?;
        let job = self.service.create_job(&draft, cancel).await?;
        Ok(format::format_created(&job))
    }
}

#[derive(Debug, Deserialize)]
struct ListArgs {
    #[serde(default = "include_paused_default")]
    include_paused: bool,
    #[serde(default = "list_limit_default")]
    limit: usize,
}

const fn include_paused_default() -> bool {
    true
}

const fn list_limit_default() -> usize {
    DEFAULT_LIST_LIMIT
}

pub struct ListJobs {
    service: JobService,
}

impl ListJobs {
    pub fn new(service: JobService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Operation for ListJobs {
    fn name(&self) -> &'static str {
        "list_jobs"
    }

    fn description(&self) -> &'static str {
        "List cron jobs with a status summary"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "include_paused": {
                    "type": "boolean",
                    "default": true,
                    "description": "Whether to include paused jobs"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_LIST_LIMIT,
                    "default": DEFAULT_LIST_LIMIT,
                    "description": "Maximum number of jobs to return"
                }
            }
        })
    }

    async fn execute(&self, arguments: Value, cancel: &CancellationToken) -> Result<String> {
        let args: ListArgs = parse_arguments(arguments)?;
        let query = ListJobsQuery { include_paused: args.include_paused, limit: args.limit };
        let listing = self.service.list_jobs(query, cancel).await?;
        Ok(format::format_listing(&listing))
    }
}

#[derive(Debug, Deserialize)]
struct JobIdArgs {
    #[serde(default)]
    job_id: String,
}

pub struct GetJob {
    service: JobService,
}

impl GetJob {
    pub fn new(service: JobService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Operation for GetJob {
    fn name(&self) -> &'static str {
        "get_job"
    }

    fn description(&self) -> &'static str {
        "Get detailed information about a job"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"job_id": job_id_schema("Identifier of the job to retrieve")},
            "required": ["job_id"]
        })
    }

    async fn execute(&self, arguments: Value, cancel: &CancellationToken) -> Result<String> {
        let args: JobIdArgs = parse_arguments(arguments)?;
        let job = self.service.get_job(&args.job_id, cancel).await?;
        Ok(format::format_job(&job))
    }
}

#[derive(Debug, Deserialize)]
struct UpdateArgs {
    #[serde(default)]
    job_id: String,
    #[serde(flatten)]
    draft: JobDraft,
}

pub struct UpdateJob {
    service: JobService,
}

impl UpdateJob {
    pub fn new(service: JobService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Operation for UpdateJob {
    fn name(&self) -> &'static str {
        "update_job"
    }

    fn description(&self) -> &'static str {
        "Replace the configuration of an existing job"
    }

    fn input_schema(&self) -> Value {
        let mut properties = job_properties();
        if let Some(map) = properties.as_object_mut() {
            map.insert("job_id".into(), job_id_schema("Identifier of the job to update"));
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": ["job_id", "name", "url", "cron_expression"]
        })
    }

    async fn execute(&self, arguments: Value, cancel: &CancellationToken) -> Result<String> {
        let args: UpdateArgs = parse_arguments(arguments)?;
        let job = self.service.update_job(&args.job_id, &args.draft, cancel).await?;
        Ok(format::format_updated(&job))
    }
}

#[derive(Debug, Deserialize)]
struct DeleteArgs {
    #[serde(default)]
    job_id: String,
    #[serde(default)]
    confirm: bool,
}

pub struct DeleteJob {
    service: JobService,
}

impl DeleteJob {
    pub fn new(service: JobService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Operation for DeleteJob {
    fn name(&self) -> &'static str {
        "delete_job"
    }

    fn description(&self) -> &'static str {
        "Permanently delete a job (cannot be undone; requires confirm=true)"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "job_id": job_id_schema("Identifier of the job to delete"),
                "confirm": {
                    "type": "boolean",
                    "default": false,
                    "description": "Confirmation that the job should be permanently deleted"
                }
            },
            "required": ["job_id", "confirm"]
        })
    }

    async fn execute(&self, arguments: Value, cancel: &CancellationToken) -> Result<String> {
        let args: DeleteArgs = parse_arguments(arguments)?;
        let receipt = self.service.delete_job(&args.job_id, args.confirm, cancel).await?;
        Ok(format::format_receipt(&receipt))
    }
}
