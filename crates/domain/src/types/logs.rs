//! Execution log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::job::JobRecord;
use super::timestamp::lenient;

/// One execution attempt recorded by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(alias = "executed_at", deserialize_with = "lenient")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, alias = "status_code")]
    pub http_status_code: Option<u16>,
    #[serde(default)]
    pub success: bool,
    #[serde(default, alias = "response_time_ms")]
    pub duration_ms: Option<u64>,
}

/// A bounded batch of log entries, most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobLogs {
    pub job_id: String,
    #[serde(default)]
    pub job: Option<JobRecord>,
    pub entries: Vec<LogEntry>,
}

impl JobLogs {
    pub fn success_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.success).count()
    }

    pub fn failure_count(&self) -> usize {
        self.entries.len() - self.success_count()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn entry_accepts_naive_timestamp_and_aliases() {
        let entry: LogEntry = serde_json::from_value(json!({
            "executed_at": "2026-03-01T10:00:00",
            "status_code": 502,
            "success": false,
            "response_time_ms": 340
        }))
        .unwrap();
        assert_eq!(entry.timestamp.to_rfc3339(), "2026-03-01T10:00:00+00:00");
        assert_eq!(entry.http_status_code, Some(502));
        assert_eq!(entry.duration_ms, Some(340));
    }
}
