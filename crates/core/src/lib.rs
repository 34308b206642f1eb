//! # Cronlytic Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Job validation rules (name, URL, method, headers, cron expression)
//! - The `JobsApi` port implemented by the HTTP adapter
//! - `JobService`, which runs validation and the delete confirmation gate
//!   before touching the port
//!
//! ## Architecture Principles
//! - Only depends on `cronlytic-common` and `cronlytic-domain`
//! - No HTTP, file system, or environment access
//! - All external calls go through `JobsApi`
//! - Validation failures never reach the port

pub mod jobs;

// Re-export specific items to avoid ambiguity
pub use jobs::ports::JobsApi;
pub use jobs::service::JobService;
pub use jobs::validation::{validate_job_draft, validate_job_id, JobDraft};
