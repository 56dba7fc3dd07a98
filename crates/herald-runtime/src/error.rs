//! Runtime error types.

use thiserror::Error;

use crate::config::ConfigError;
use herald_core::BoxError;

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration loading or validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The event source failed while pulling the next delivery.
    #[error("event source failed: {0}")]
    Source(#[source] BoxError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
