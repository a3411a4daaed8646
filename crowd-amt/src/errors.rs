//! Error types for results-table ingestion.
//!
//! Row-level problems are not errors. A damaged row is dropped and recorded
//! as a [`RowSkip`](crate::results_table::RowSkip); only defects that
//! invalidate the whole file surface here.

use thiserror::Error;

/// Errors that can occur while ingesting a results file.
#[derive(Debug, Error)]
pub enum AmtError {
    /// Error reading a results file.
    #[error("failed to load results file: {path}: {message}")]
    Load { path: String, message: String },

    /// The file has no header row.
    #[error("results file has no header row")]
    MissingHeader,

    /// The header lacks a column ingestion cannot work without.
    #[error("results header is missing column {name:?}")]
    MissingColumn { name: String },
}

/// Result type for ingestion operations.
pub type AmtResult<T> = Result<T, AmtError>;
