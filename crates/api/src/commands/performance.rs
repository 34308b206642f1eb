//! Report of the per-operation counters kept by the registry

use async_trait::async_trait;
use cronlytic_domain::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{parse_arguments, Operation};
use crate::utils::format;
use crate::utils::metrics::OperationMetrics;

#[derive(Debug, Deserialize)]
struct ReportArgs {
    #[serde(default)]
    operation: Option<String>,
    #[serde(default)]
    reset: bool,
}

pub struct PerformanceReport {
    metrics: OperationMetrics,
}

impl PerformanceReport {
    pub fn new(metrics: OperationMetrics) -> Self {
        Self { metrics }
    }
}

#[async_trait]
impl Operation for PerformanceReport {
    fn name(&self) -> &'static str {
        "performance_report"
    }

    fn description(&self) -> &'static str {
        "Show call counts, error counts and latency for each operation in this session"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "operation": {
                    "type": "string",
                    "description": "Only report this operation"
                },
                "reset": {
                    "type": "boolean",
                    "default": false,
                    "description": "Clear all counters after reporting"
                }
            }
        })
    }

    async fn execute(&self, arguments: Value, _cancel: &CancellationToken) -> Result<String> {
        let args: ReportArgs = parse_arguments(arguments)?;
        let mut snapshot = self.metrics.snapshot();
        if let Some(name) = &args.operation {
            snapshot.retain(|operation, _| operation == name);
        }
        let text = format::format_performance(&snapshot);
        if args.reset {
            self.metrics.reset();
            info!("Performance counters reset");
        }
        Ok(text)
    }
}
