//! Application context - dependency injection container

use std::sync::Arc;

use cronlytic_core::JobService;
use cronlytic_domain::{AuthConfig, Result};
use cronlytic_infra::config::{self, ConfigOverrides};
use cronlytic_infra::{ApiClientConfig, CronlyticClient};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::commands::OperationRegistry;

/// Application context - holds the configured client and operations
pub struct AppContext {
    pub config: Arc<AuthConfig>,
    pub service: JobService,
    pub registry: OperationRegistry,
    /// Cancelled on shutdown; every dispatched operation observes it.
    pub shutdown: CancellationToken,
}

impl AppContext {
    /// Resolve configuration and build the context.
    ///
    /// # Errors
    /// Returns `ConfigError` when the configuration cannot be resolved or the
    /// HTTP client cannot be built from it.
    pub fn new(overrides: &ConfigOverrides, client_config: ApiClientConfig) -> Result<Self> {
        let config = config::load(overrides)?;
        Self::with_config(Arc::new(config), client_config)
    }

    /// Build the context from an already resolved configuration.
    pub fn with_config(config: Arc<AuthConfig>, client_config: ApiClientConfig) -> Result<Self> {
        let client = CronlyticClient::with_config(Arc::clone(&config), client_config)?;
        let service = JobService::new(Arc::new(client));
        let registry = OperationRegistry::with_job_service(&service);

        info!(operations = registry.names().len(), "Application context initialized");
        Ok(Self { config, service, registry, shutdown: CancellationToken::new() })
    }
}
