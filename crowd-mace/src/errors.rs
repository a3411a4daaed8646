//! Error types for the competence-model exchange.
//!
//! Everything here is fatal for its scope: a malformed prediction file
//! fails the document it belongs to, a competence count mismatch fails the
//! whole batch. Recoverable row-level noise never reaches this crate; it is
//! filtered during ingestion.

use thiserror::Error;

/// Errors that can occur while exchanging files with the competence model.
#[derive(Debug, Error)]
pub enum MaceError {
    /// Error writing a model input file.
    #[error("failed to write model input: {path}: {message}")]
    Write { path: String, message: String },

    /// Error reading a model output file.
    #[error("failed to load model output: {path}: {message}")]
    Load { path: String, message: String },

    /// A prediction line carries a label outside the BIO tag set.
    #[error("unrecognized tag label {label:?} in prediction line {line}")]
    UnknownLabel { label: String, line: usize },

    /// A prediction line carries an unreadable probability.
    #[error("unreadable probability {value:?} in prediction line {line}")]
    BadProbability { value: String, line: usize },

    /// The competence line disagrees with the roster about the worker count.
    #[error("expected {expected} competence values, got {got}")]
    CompetenceMismatch { expected: usize, got: usize },

    /// Predictions do not line up with the tokens they should label.
    #[error("predictions cover {got} tokens, expected {expected}")]
    SequenceLengthMismatch { expected: usize, got: usize },
}

/// Result type for exchange operations.
pub type MaceResult<T> = Result<T, MaceError>;
