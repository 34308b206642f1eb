//! Inputs and results of the job operations.

use chrono::{DateTime, Utc};
use cronlytic_domain::constants::{DEFAULT_LIST_LIMIT, DEFAULT_LOG_LIMIT};
use cronlytic_domain::{ErrorRecord, JobRecord, JobStatus, ServiceStatus};
use serde::{Deserialize, Serialize};

/// Options for listing jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListJobsQuery {
    pub include_paused: bool,
    pub limit: usize,
}

impl Default for ListJobsQuery {
    fn default() -> Self {
        Self { include_paused: true, limit: DEFAULT_LIST_LIMIT }
    }
}

/// Options for fetching execution logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogsQuery {
    pub limit: usize,
}

impl Default for LogsQuery {
    fn default() -> Self {
        Self { limit: DEFAULT_LOG_LIMIT }
    }
}

/// Job counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub pending: usize,
    pub paused: usize,
    pub success: usize,
    pub failed: usize,
    pub unknown: usize,
}

impl StatusBreakdown {
    pub fn from_jobs<'a>(jobs: impl IntoIterator<Item = &'a JobRecord>) -> Self {
        let mut breakdown = Self::default();
        for job in jobs {
            match job.status {
                JobStatus::Pending => breakdown.pending += 1,
                JobStatus::Paused => breakdown.paused += 1,
                JobStatus::Success => breakdown.success += 1,
                JobStatus::Failed => breakdown.failed += 1,
                JobStatus::Unknown => breakdown.unknown += 1,
            }
        }
        breakdown
    }

    pub const fn total(&self) -> usize {
        self.pending + self.paused + self.success + self.failed + self.unknown
    }
}

/// Result of a list operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobListing {
    pub jobs: Vec<JobRecord>,
    /// Jobs that matched the filter before the limit was applied
    pub total_matching: usize,
    /// Status counts over every matching job
    pub summary: StatusBreakdown,
    pub limited: bool,
    pub limit_applied: Option<usize>,
}

/// Receipt returned after a confirmed delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionReceipt {
    pub job_id: String,
    /// Name looked up before deletion, if the lookup succeeded
    pub job_name: Option<String>,
    pub deleted_at: DateTime<Utc>,
}

/// Latency bucket for a connectivity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl PerformanceRating {
    pub const fn from_latency_ms(ms: u64) -> Self {
        match ms {
            0..=199 => Self::Excellent,
            200..=499 => Self::Good,
            500..=999 => Self::Fair,
            _ => Self::Poor,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

/// Outcome of a health check. Failures are reported here, never raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub response_time_ms: Option<u64>,
    pub performance: Option<PerformanceRating>,
    pub service_status: Option<ServiceStatus>,
    pub job_count: Option<usize>,
    pub error: Option<ErrorRecord>,
    pub recommendations: Vec<String>,
    pub checked_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latency_buckets() {
        assert_eq!(PerformanceRating::from_latency_ms(0), PerformanceRating::Excellent);
        assert_eq!(PerformanceRating::from_latency_ms(199), PerformanceRating::Excellent);
        assert_eq!(PerformanceRating::from_latency_ms(200), PerformanceRating::Good);
        assert_eq!(PerformanceRating::from_latency_ms(999), PerformanceRating::Fair);
        assert_eq!(PerformanceRating::from_latency_ms(1000), PerformanceRating::Poor);
    }

    #[test]
    fn defaults_match_service_limits() {
        assert_eq!(ListJobsQuery::default(), ListJobsQuery { include_paused: true, limit: 50 });
        assert_eq!(LogsQuery::default().limit, 20);
    }
}
