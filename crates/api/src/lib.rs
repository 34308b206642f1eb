//! # Cronlytic API
//!
//! Agent-facing layer - operation handlers and the stdio front end.
//!
//! This crate contains:
//! - Operation handlers and the [`OperationRegistry`]
//! - Application context (dependency injection)
//! - The line-delimited JSON protocol used by the `cronlytic-mcp` binary
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires the HTTP client into the job service
//! - Renders results and errors as text for the caller

pub mod commands;
pub mod context;
pub mod protocol;
pub mod utils;

// Re-export for convenience
pub use commands::{Operation, OperationDescriptor, OperationRegistry, OperationResponse};
pub use context::AppContext;
pub use protocol::{handle_line, ProtocolRequest, ProtocolResponse, LIST_OPERATIONS};
