//! Formatting, logging, and metrics helpers for operation handlers

pub mod format;
pub mod logging;
pub mod metrics;
