//! Error types for gold estimation.
//!
//! Estimation itself does not fail: a batch that cannot be processed is
//! skipped and reported through [`BatchOutcome`](crate::runner::BatchOutcome).
//! Only the threshold configuration can take the whole run down.

use thiserror::Error;

/// Errors that can occur while loading estimation configuration.
#[derive(Debug, Error)]
pub enum GoldError {
    /// Error reading a threshold file.
    #[error("failed to load threshold file: {path}: {message}")]
    Load { path: String, message: String },

    /// Error parsing a threshold file.
    #[error("failed to parse threshold file: {path}: {message}")]
    Parse { path: String, message: String },
}

/// Result type for configuration operations.
pub type GoldResult<T> = Result<T, GoldError>;
