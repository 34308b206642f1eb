//! Configuration loading
//!
//! Resolves the client's [`cronlytic_domain::AuthConfig`] from overrides,
//! environment variables, and config files.

pub mod loader;

pub use loader::{candidate_paths, load, resolve, ConfigOverrides};
