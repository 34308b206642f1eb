//! Cronlytic API client
//!
//! Implements the [`JobsApi`] port over HTTP. Every call carries the
//! credential headers from [`AuthConfig`], goes through [`HttpClient`] for
//! retry and cancellation, and maps failures onto [`CronlyticError`].

use std::sync::Arc;

use async_trait::async_trait;
use cronlytic_common::resilience::Jitter;
use cronlytic_core::jobs::JobsApi;
use cronlytic_domain::constants::{HEADER_API_KEY, HEADER_IDEMPOTENCY_KEY};
use cronlytic_domain::{
    AuthConfig, CronlyticError, FieldErrors, JobDefinition, JobLogs, JobRecord, LogEntry, Result,
    ServiceStatus,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::cache::{JobCache, JobCacheConfig};
use super::errors::{error_from_status, error_from_transport, unexpected_body};
use crate::http::{HttpClient, RequestOptions};

/// Client options that are not part of the credentials.
#[derive(Debug, Clone, Default)]
pub struct ApiClientConfig {
    /// Enables the read-through job cache when set
    pub cache: Option<JobCacheConfig>,
    /// Randomization applied to retry delays
    pub jitter: Jitter,
}

/// HTTP adapter for the Cronlytic jobs API
pub struct CronlyticClient {
    http: HttpClient,
    auth: Arc<AuthConfig>,
    cache: Option<JobCache>,
}

/// Successful response: status plus the fully read body.
struct Payload {
    status: StatusCode,
    body: Vec<u8>,
}

impl Payload {
    fn decode<T: DeserializeOwned>(&self, operation: &str) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|err| unexpected_body(self.status, operation, &err))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody {
    Bare(Vec<JobRecord>),
    Wrapped { jobs: Vec<JobRecord> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LogsBody {
    Bare(Vec<LogEntry>),
    Wrapped {
        #[serde(default)]
        logs: Vec<LogEntry>,
        #[serde(default)]
        job: Option<Value>,
    },
}

impl CronlyticClient {
    /// Create a client without caching.
    pub fn new(auth: Arc<AuthConfig>) -> Result<Self> {
        Self::with_config(auth, ApiClientConfig::default())
    }

    /// Create a client with explicit options.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a credential cannot be sent as an HTTP header
    /// or the underlying HTTP client cannot be built.
    pub fn with_config(auth: Arc<AuthConfig>, config: ApiClientConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(auth.timeout())
            .max_retries(auth.max_retries())
            .base_backoff(auth.retry_delay())
            .jitter(config.jitter)
            .default_headers(default_headers(&auth)?)
            .build()
            .map_err(|err| config_error("http_client", err.to_string()))?;

        info!(
            base_url = %auth.base_url(),
            max_retries = auth.max_retries(),
            cache = config.cache.is_some(),
            "Cronlytic client ready"
        );

        Ok(Self { http, auth, cache: config.cache.as_ref().map(JobCache::new) })
    }

    pub fn auth(&self) -> &AuthConfig {
        &self.auth
    }

    async fn call(
        &self,
        request: RequestBuilder,
        options: RequestOptions,
        resource: &str,
        cancel: &CancellationToken,
    ) -> Result<Payload> {
        let response =
            self.http.send(request, options, cancel).await.map_err(error_from_transport)?;
        let status = response.status();
        let headers = response.headers().clone();

        let body = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(CronlyticError::cancelled()),
            body = response.bytes() => body.map_err(|err| {
                debug!(error = %err, "response body read failed");
                CronlyticError::network("Failed to read the response body")
            })?,
        };

        if !status.is_success() {
            let err = error_from_status(status, &headers, &body, resource);
            debug!(%status, kind = %err.kind(), "request rejected");
            return Err(err);
        }
        Ok(Payload { status, body: body.to_vec() })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.auth.endpoint(path))
    }

    async fn invalidate(&self, job_id: Option<&str>) {
        if let Some(cache) = &self.cache {
            cache.invalidate(job_id).await;
        }
    }

    async fn job_transition(
        &self,
        job_id: &str,
        action: &str,
        cancel: &CancellationToken,
    ) -> Result<JobRecord> {
        let request = self.request(Method::POST, &format!("/jobs/{job_id}/{action}"));
        let payload =
            self.call(request, RequestOptions::IDEMPOTENT, &job_resource(job_id), cancel).await?;
        self.invalidate(Some(job_id)).await;
        payload.decode(action)
    }
}

#[async_trait]
impl JobsApi for CronlyticClient {
    #[instrument(skip_all)]
    async fn ping(&self, cancel: &CancellationToken) -> Result<ServiceStatus> {
        let payload = self
            .call(self.request(Method::GET, "/ping"), RequestOptions::IDEMPOTENT, "Ping endpoint", cancel)
            .await?;
        if payload.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(ServiceStatus::default());
        }
        payload.decode("ping")
    }

    #[instrument(skip_all, fields(name = %job.name))]
    async fn create_job(&self, job: &JobDefinition, cancel: &CancellationToken) -> Result<JobRecord> {
        let idempotency_key = Uuid::new_v4().to_string();
        debug!(%idempotency_key, "creating job");

        let request = self
            .request(Method::POST, "/jobs")
            .header(HEADER_IDEMPOTENCY_KEY, idempotency_key.as_str())
            .json(job);
        let payload = self.call(request, RequestOptions::NON_IDEMPOTENT, "Jobs endpoint", cancel).await?;
        self.invalidate(None).await;
        payload.decode("create job")
    }

    #[instrument(skip_all)]
    async fn list_jobs(&self, cancel: &CancellationToken) -> Result<Vec<JobRecord>> {
        let mut seen = None;
        if let Some(cache) = &self.cache {
            if let Some(jobs) = cache.listing().await {
                return Ok(jobs);
            }
            seen = Some(cache.generation());
        }

        let payload = self
            .call(self.request(Method::GET, "/jobs"), RequestOptions::IDEMPOTENT, "Jobs endpoint", cancel)
            .await?;
        let jobs = match payload.decode::<ListBody>("list jobs")? {
            ListBody::Bare(jobs) | ListBody::Wrapped { jobs } => jobs,
        };
        debug!(count = jobs.len(), "listed jobs");

        if let (Some(cache), Some(seen)) = (&self.cache, seen) {
            cache.store_listing(&jobs, seen).await;
        }
        Ok(jobs)
    }

    #[instrument(skip(self, cancel))]
    async fn get_job(&self, job_id: &str, cancel: &CancellationToken) -> Result<JobRecord> {
        let mut seen = None;
        if let Some(cache) = &self.cache {
            if let Some(record) = cache.job(job_id).await {
                return Ok(record);
            }
            seen = Some(cache.generation());
        }

        let request = self.request(Method::GET, &format!("/jobs/{job_id}"));
        let payload =
            self.call(request, RequestOptions::IDEMPOTENT, &job_resource(job_id), cancel).await?;
        let record: JobRecord = payload.decode("get job")?;

        if let (Some(cache), Some(seen)) = (&self.cache, seen) {
            cache.store_job(&record, seen).await;
        }
        Ok(record)
    }

    #[instrument(skip(self, job, cancel))]
    async fn update_job(
        &self,
        job_id: &str,
        job: &JobDefinition,
        cancel: &CancellationToken,
    ) -> Result<JobRecord> {
        let request = self.request(Method::PUT, &format!("/jobs/{job_id}")).json(job);
        let payload =
            self.call(request, RequestOptions::IDEMPOTENT, &job_resource(job_id), cancel).await?;
        self.invalidate(Some(job_id)).await;
        payload.decode("update job")
    }

    #[instrument(skip(self, cancel))]
    async fn delete_job(&self, job_id: &str, cancel: &CancellationToken) -> Result<()> {
        let request = self.request(Method::DELETE, &format!("/jobs/{job_id}"));
        self.call(request, RequestOptions::IDEMPOTENT, &job_resource(job_id), cancel).await?;
        self.invalidate(Some(job_id)).await;
        Ok(())
    }

    #[instrument(skip(self, cancel))]
    async fn pause_job(&self, job_id: &str, cancel: &CancellationToken) -> Result<JobRecord> {
        self.job_transition(job_id, "pause", cancel).await
    }

    #[instrument(skip(self, cancel))]
    async fn resume_job(&self, job_id: &str, cancel: &CancellationToken) -> Result<JobRecord> {
        self.job_transition(job_id, "resume", cancel).await
    }

    #[instrument(skip(self, cancel))]
    async fn get_job_logs(
        &self,
        job_id: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<JobLogs> {
        let request = self.request(Method::GET, &format!("/jobs/{job_id}/logs"));
        let payload =
            self.call(request, RequestOptions::IDEMPOTENT, &job_resource(job_id), cancel).await?;

        let (mut entries, job) = match payload.decode::<LogsBody>("job logs")? {
            LogsBody::Bare(entries) => (entries, None),
            LogsBody::Wrapped { logs, job } => (logs, job),
        };
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(limit);

        // The embedded job is informational; a shape we cannot read is dropped.
        let job = job.and_then(|value| serde_json::from_value::<JobRecord>(value).ok());
        Ok(JobLogs { job_id: job_id.to_string(), job, entries })
    }
}

fn job_resource(job_id: &str) -> String {
    format!("Job '{job_id}'")
}

fn config_error(field: &str, message: impl Into<String>) -> CronlyticError {
    let mut fields = FieldErrors::new();
    fields.insert(field.to_string(), vec![message.into()]);
    CronlyticError::config(fields)
}

fn default_headers(auth: &AuthConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in auth.headers() {
        let field = if name == HEADER_API_KEY { "api_key" } else { name };
        let mut header_value = HeaderValue::from_str(value).map_err(|_| {
            config_error(field, format!("Value for header '{name}' contains invalid characters"))
        })?;
        if name == HEADER_API_KEY {
            header_value.set_sensitive(true);
        }
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| config_error(field, format!("Invalid header name '{name}'")))?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}
