//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! client.

// Remote service defaults
pub const DEFAULT_BASE_URL: &str = "https://api.cronlytic.com/prog";
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_SECS: f64 = 1.0;

// Request headers
pub const HEADER_API_KEY: &str = "X-API-Key";
pub const HEADER_USER_ID: &str = "X-User-ID";
pub const HEADER_IDEMPOTENCY_KEY: &str = "Idempotency-Key";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const USER_AGENT: &str = concat!("cronlytic-mcp/", env!("CARGO_PKG_VERSION"));

// Job definition limits
pub const MAX_JOB_NAME_LENGTH: usize = 50;
pub const CRON_FIELD_COUNT: usize = 5;
pub const MIN_JOB_ID_LENGTH: usize = 3;

// Batch limits for list and log queries
pub const DEFAULT_LOG_LIMIT: usize = 20;
pub const MAX_LOG_LIMIT: usize = 100;
pub const DEFAULT_LIST_LIMIT: usize = 50;
pub const MAX_LIST_LIMIT: usize = 100;

// Config file discovery
pub const LOCAL_CONFIG_FILE: &str = "cronlytic_config.json";
pub const USER_CONFIG_DIR: &str = ".cronlytic";
pub const SYSTEM_CONFIG_FILE: &str = "/etc/cronlytic/config.json";
