//! Job types exchanged with the scheduling service.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;
use super::timestamp::lenient_option;
use crate::impl_wire_enum_conversions;

/// HTTP verb the service uses when it triggers a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALL: [Self; 7] =
        [Self::Get, Self::Post, Self::Put, Self::Delete, Self::Patch, Self::Head, Self::Options];
}

impl_wire_enum_conversions!(HttpMethod {
    Get => "GET",
    Post => "POST",
    Put => "PUT",
    Delete => "DELETE",
    Patch => "PATCH",
    Head => "HEAD",
    Options => "OPTIONS",
});

/// Lifecycle state reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Paused,
    Success,
    Failed,
    /// A status this client does not recognise yet.
    #[serde(other)]
    Unknown,
}

impl_wire_enum_conversions!(JobStatus {
    Pending => "pending",
    Paused => "paused",
    Success => "success",
    Failed => "failed",
    Unknown => "unknown",
});

/// A validated job as submitted on create and update.
///
/// Request paths only build this through the validation layer, which
/// guarantees the name pattern, URL scheme, and five-field cron expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDefinition {
    pub name: String,
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: HttpMethod,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    pub cron_expression: String,
}

/// A job as stored by the service.
///
/// Timestamps are optional; older records omit them or send naive values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(alias = "id")]
    pub job_id: String,
    #[serde(flatten)]
    pub definition: JobDefinition,
    pub status: JobStatus,
    #[serde(default, deserialize_with = "lenient_option")]
    pub next_run_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl JobRecord {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub const fn is_paused(&self) -> bool {
        matches!(self.status, JobStatus::Paused)
    }
}
