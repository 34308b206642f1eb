//! Modular common utilities shared across Cronlytic crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: field validation collector and reusable validators
//! - `runtime`: retry timing (backoff strategies and jitter)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod validation;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use resilience::{BackoffPolicy, BackoffStrategy, Jitter};
#[cfg(feature = "foundation")]
pub use validation::{
    FieldError, FieldValidator, RangeValidator, StringValidator, UrlValidator, ValidationError,
    ValidationResult, Validator,
};
