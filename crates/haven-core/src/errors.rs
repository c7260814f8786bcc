//! Cross-cutting error types for Haven.
//!
//! Domain-specific errors (`AuthError`, `AdminError`, `ConfigError`) live in
//! their own crates.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
