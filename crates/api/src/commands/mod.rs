//! Operation handlers - agent-facing bridge to the job service
//!
//! Each handler decodes its JSON arguments, calls [`JobService`], and renders
//! a text result. Errors are returned as [`CronlyticError`] and formatted by
//! the registry so every operation reports failures the same way.
//!
//! [`JobService`]: cronlytic_core::JobService

mod control;
mod health;
mod jobs;
mod performance;
mod registry;
mod resources;

use async_trait::async_trait;
use cronlytic_domain::{CronlyticError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

pub use control::{GetJobLogs, PauseJob, ResumeJob};
pub use health::HealthCheck;
pub use jobs::{CreateJob, DeleteJob, GetJob, ListJobs, UpdateJob};
pub use performance::PerformanceReport;
pub use registry::{OperationRegistry, OperationResponse};
pub use resources::{ReadResource, ResourceUri};

/// A named operation a caller can invoke.
#[async_trait]
pub trait Operation: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON schema describing the accepted arguments.
    fn input_schema(&self) -> Value;

    async fn execute(&self, arguments: Value, cancel: &CancellationToken) -> Result<String>;
}

/// Discovery entry returned by `list_operations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// Decode an argument object. `null` is treated as `{}`.
pub(crate) fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = if arguments.is_null() { Value::Object(Default::default()) } else { arguments };
    if !arguments.is_object() {
        return Err(CronlyticError::invalid_field("arguments", "Arguments must be a JSON object"));
    }
    serde_json::from_value(arguments)
        .map_err(|err| CronlyticError::invalid_field("arguments", format!("Invalid arguments: {err}")))
}

fn job_id_schema(description: &str) -> Value {
    serde_json::json!({
        "type": "string",
        "description": description,
        "minLength": 1
    })
}
