//! Operation lookup and dispatch

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use cronlytic_core::JobService;
use cronlytic_domain::CronlyticError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use super::{
    CreateJob, DeleteJob, GetJob, GetJobLogs, HealthCheck, ListJobs, Operation,
    OperationDescriptor, PauseJob, PerformanceReport, ReadResource, ResumeJob, UpdateJob,
};
use crate::utils::format::format_error;
use crate::utils::logging::log_command_execution;
use crate::utils::metrics::OperationMetrics;

/// Text result of one dispatched operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResponse {
    pub is_error: bool,
    pub text: String,
}

impl OperationResponse {
    pub fn success(text: String) -> Self {
        Self { is_error: false, text }
    }

    pub fn failure(err: &CronlyticError) -> Self {
        Self { is_error: true, text: format_error(err) }
    }
}

/// Registry of named operations.
///
/// Clones share the same operations and the same [`OperationMetrics`].
#[derive(Default, Clone)]
pub struct OperationRegistry {
    operations: BTreeMap<&'static str, Arc<dyn Operation>>,
    metrics: OperationMetrics,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every job operation bound to `service`.
    pub fn with_job_service(service: &JobService) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(HealthCheck::new(service.clone())));
        registry.register(Arc::new(CreateJob::new(service.clone())));
        registry.register(Arc::new(ListJobs::new(service.clone())));
        registry.register(Arc::new(GetJob::new(service.clone())));
        registry.register(Arc::new(UpdateJob::new(service.clone())));
        registry.register(Arc::new(DeleteJob::new(service.clone())));
        registry.register(Arc::new(PauseJob::new(service.clone())));
        registry.register(Arc::new(ResumeJob::new(service.clone())));
        registry.register(Arc::new(GetJobLogs::new(service.clone())));
        registry.register(Arc::new(ReadResource::new(service.clone())));
        registry.register(Arc::new(PerformanceReport::new(registry.metrics.clone())));
        registry
    }

    /// Register an operation, replacing any previous one with the same name.
    pub fn register(&mut self, operation: Arc<dyn Operation>) {
        self.operations.insert(operation.name(), operation);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Operation>> {
        self.operations.get(name).cloned()
    }

    /// Counters recorded by [`dispatch`](Self::dispatch).
    pub fn metrics(&self) -> &OperationMetrics {
        &self.metrics
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.operations.keys().copied().collect()
    }

    pub fn catalogue(&self) -> Vec<OperationDescriptor> {
        self.operations
            .values()
            .map(|operation| OperationDescriptor {
                name: operation.name(),
                description: operation.description(),
                input_schema: operation.input_schema(),
            })
            .collect()
    }

    /// Run `name` and render its outcome. Never fails; unknown names and bad
    /// arguments come back as formatted `ValidationError`s.
    #[instrument(skip(self, arguments, cancel))]
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Value,
        cancel: &CancellationToken,
    ) -> OperationResponse {
        let Some(operation) = self.get(name) else {
            debug!("unknown operation requested");
            let err = CronlyticError::invalid_field(
                "operation",
                format!("Unknown operation '{name}'. Available: {}", self.names().join(", ")),
            );
            return OperationResponse::failure(&err);
        };

        let started = Instant::now();
        let result = operation.execute(arguments, cancel).await;
        let elapsed = started.elapsed();
        let error_kind = result.as_ref().err().map(|err| err.kind().as_str());
        log_command_execution(name, elapsed, result.is_ok(), error_kind);
        self.metrics.record(name, elapsed, result.is_ok());

        match result {
            Ok(text) => OperationResponse::success(text),
            Err(err) => OperationResponse::failure(&err),
        }
    }
}
