use std::time::Duration;

use cronlytic_common::resilience::{BackoffPolicy, BackoffStrategy, Jitter};
use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Transport-level failure after retries were exhausted or abandoned.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {attempts} attempt(s): {message}")]
    Timeout { message: String, attempts: u32 },

    #[error("connection failed after {attempts} attempt(s): {message}")]
    Connect { message: String, attempts: u32 },

    #[error("request failed after {attempts} attempt(s): {message}")]
    Request { message: String, attempts: u32 },

    #[error("request cancelled")]
    Cancelled,

    #[error("request could not be built: {0}")]
    Build(String),
}

impl TransportError {
    fn from_reqwest(err: &reqwest::Error, attempts: u32) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            Self::Timeout { message, attempts }
        } else if err.is_connect() {
            Self::Connect { message, attempts }
        } else {
            Self::Request { message, attempts }
        }
    }
}

/// Per-request retry options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    /// Whether repeating the request after it may have reached the server is
    /// safe. Non-idempotent requests still retry connection failures, 429,
    /// and 5xx, but not timeouts or mid-flight transport errors.
    pub idempotent: bool,
}

impl RequestOptions {
    pub const IDEMPOTENT: Self = Self { idempotent: true };
    pub const NON_IDEMPOTENT: Self = Self { idempotent: false };
}

/// HTTP client with built-in retry, timeout, and cancellation support.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    policy: BackoffPolicy,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder with retry semantics.
    ///
    /// Retries connection failures, timeouts (idempotent requests only),
    /// HTTP 429, and HTTP 5xx up to `max_retries` times. Any other response
    /// is returned to the caller as-is, including the last retriable one once
    /// attempts run out.
    pub async fn send(
        &self,
        builder: RequestBuilder,
        options: RequestOptions,
        cancel: &CancellationToken,
    ) -> Result<Response, TransportError> {
        let attempts = self.policy.max_attempts();

        for attempt in 1..=attempts {
            if cancel.is_cancelled() {
                return Err(TransportError::Cancelled);
            }

            let request = builder
                .try_clone()
                .ok_or_else(|| {
                    TransportError::Build(
                        "request body cannot be cloned; buffer the body to enable retries".into(),
                    )
                })?
                .build()
                .map_err(|err| TransportError::Build(err.to_string()))?;

            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt, %method, path = url.path(), "sending HTTP request");

            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(TransportError::Cancelled),
                outcome = self.client.execute(request) => outcome,
            };
            let has_budget = attempt < attempts;

            match outcome {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, path = url.path(), %status, "received HTTP response");

                    if has_budget && is_retriable_status(status) {
                        warn!(attempt, %status, path = url.path(), "retriable HTTP status, backing off");
                        self.sleep_with_backoff(attempt, cancel).await?;
                        continue;
                    }

                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt, %method, path = url.path(), error = %err, "HTTP request failed");

                    if has_budget && should_retry_error(&err, options) {
                        warn!(attempt, path = url.path(), error = %err, "transport failure, backing off");
                        self.sleep_with_backoff(attempt, cancel).await?;
                        continue;
                    }

                    return Err(TransportError::from_reqwest(&err, attempt));
                }
            }
        }

        Err(TransportError::Request {
            message: "http client exhausted retries without producing a result".into(),
            attempts,
        })
    }

    async fn sleep_with_backoff(
        &self,
        retry_number: u32,
        cancel: &CancellationToken,
    ) -> Result<(), TransportError> {
        let delay = self.policy.delay_for_retry(retry_number);
        if delay.is_zero() {
            return Ok(());
        }
        debug!(retry_number, delay_ms = delay.as_millis() as u64, "sleeping before retry");
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(TransportError::Cancelled),
            () = tokio::time::sleep(delay) => Ok(()),
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_retries: u32,
    base_backoff: Duration,
    max_backoff: Duration,
    jitter: Jitter,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            base_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(300),
            jitter: Jitter::None,
            user_agent: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure retries after the first attempt.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn max_backoff(mut self, backoff: Duration) -> Self {
        self.max_backoff = backoff;
        self
    }

    pub fn jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, TransportError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| TransportError::Build(err.to_string()))?;
        let strategy = BackoffStrategy::doubling(self.base_backoff, self.max_backoff);

        Ok(HttpClient {
            client,
            policy: BackoffPolicy::new(self.max_retries, strategy).with_jitter(self.jitter),
        })
    }
}

fn is_retriable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn should_retry_error(err: &reqwest::Error, options: RequestOptions) -> bool {
    if err.is_connect() {
        return true;
    }
    if err.is_timeout() || err.is_request() {
        return options.idempotent;
    }
    false
}
