//! Resilience primitives for transient failures
//!
//! This module provides retry timing only: how long to wait before the next
//! attempt. Deciding *whether* an outcome is retriable stays with the caller,
//! which knows the transport and status semantics.

pub mod backoff;

pub use backoff::{BackoffPolicy, BackoffStrategy, Jitter};
