//! # Cronlytic Domain
//!
//! Business domain types and models for the Cronlytic job client.
//!
//! This crate contains:
//! - Job data types (`JobDefinition`, `JobRecord`, `LogEntry`)
//! - The closed error taxonomy and Result definition
//! - The immutable `AuthConfig` record
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Cronlytic crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
