//! Job management: validation, the API port, and the operation service.

pub mod cron;
pub mod models;
pub mod ports;
pub mod service;
pub mod validation;

pub use cron::{describe_cron, validate_cron_expression};
pub use models::{
    DeletionReceipt, HealthReport, JobListing, ListJobsQuery, LogsQuery, PerformanceRating,
    StatusBreakdown,
};
pub use ports::JobsApi;
pub use service::JobService;
