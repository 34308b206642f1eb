//! Cronlytic API adapter
//!
//! [`CronlyticClient`] implements the `JobsApi` port from `cronlytic-core`
//! on top of [`crate::http::HttpClient`], with an optional moka cache.

pub mod cache;
pub mod client;
pub mod errors;

pub use cache::{CacheGeneration, JobCache, JobCacheConfig};
pub use client::{ApiClientConfig, CronlyticClient};
pub use errors::{error_from_status, error_from_transport};
