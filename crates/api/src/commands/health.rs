//! Connectivity and credential check

use async_trait::async_trait;
use cronlytic_core::JobService;
use cronlytic_domain::Result;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use super::Operation;
use crate::utils::format;

pub struct HealthCheck {
    service: JobService,
}

impl HealthCheck {
    pub fn new(service: JobService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Operation for HealthCheck {
    fn name(&self) -> &'static str {
        "health_check"
    }

    fn description(&self) -> &'static str {
        "Check connectivity to the Cronlytic API and verify the credentials"
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    /// Always succeeds; an unhealthy service is reported in the text.
    async fn execute(&self, _arguments: Value, cancel: &CancellationToken) -> Result<String> {
        let report = self.service.health_check(cancel).await;
        Ok(format::format_health(&report))
    }
}
