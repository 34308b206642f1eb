//! # Cronlytic Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - `HttpClient`: reqwest wrapper with retry, backoff, and cancellation
//! - `CronlyticClient`: the `JobsApi` adapter for the remote service
//! - Auth configuration resolution from flags, environment, and files
//!
//! ## Architecture
//! - Implements traits defined in `cronlytic-core`
//! - Depends on `cronlytic-domain`, `cronlytic-common`, and `cronlytic-core`
//! - Contains all "impure" code (network, environment, file system)

pub mod api;
pub mod config;
pub mod http;

// Re-export commonly used items
pub use api::{ApiClientConfig, CronlyticClient};
pub use cronlytic_common::resilience::Jitter;
pub use config::{load, ConfigOverrides};
pub use http::{HttpClient, HttpClientBuilder, RequestOptions, TransportError};
