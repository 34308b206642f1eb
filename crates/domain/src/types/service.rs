//! Service-level responses that are not tied to a job.

use serde::{Deserialize, Serialize};

/// Body of a successful connectivity check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
