//! Domain types and models
//!
//! Job definitions submitted to the service, the records it returns, and the
//! execution log entries it keeps for each job.

pub mod job;
pub mod logs;
pub mod service;
pub mod timestamp;

pub use job::{HttpMethod, JobDefinition, JobRecord, JobStatus};
pub use logs::{JobLogs, LogEntry};
pub use service::ServiceStatus;
pub use timestamp::parse_timestamp;

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
