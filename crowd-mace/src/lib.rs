//! Competence-model file exchange and BIO sequence decoding.
//!
//! Gold estimation hands worker matrices to an external competence model
//! (MACE) and reads per-token label distributions and per-worker
//! competence back. This crate owns both directions of that exchange:
//! matrix CSVs and the worker-order file on the way out, prediction and
//! competence intake with validation on the way back, plus the decoding of
//! distributions into token spans.
//!
//! ## Pipeline
//!
//! - [`DocumentMatrix`] / [`write_inputs`] - per-batch matrix CSVs, the
//!   worker-order file, and the merged model input
//! - [`MatrixBatch`] - row bookkeeping that cuts batch predictions back
//!   apart per document
//! - [`parse_predictions`] / [`parse_competence`] - model output intake
//! - [`decode_document`] / [`extract_spans`] - tags, rewrites, and span
//!   assembly per task flavor
//!
//! ## Example
//!
//! ```
//! use crowd_anno::TaskKind;
//! use crowd_mace::{best_major_claim, decode_document, extract_spans, parse_predictions};
//!
//! let predictions = "O 0.9\nB 0.8\tI 0.1\nI 0.7\tO 0.2\nO 0.9";
//! let distributions = parse_predictions(predictions).unwrap();
//! let decoded = decode_document(&distributions, 4, TaskKind::MajorClaim).unwrap();
//! let spans = extract_spans(&decoded, TaskKind::MajorClaim);
//!
//! assert_eq!(spans.len(), 1);
//! assert_eq!((spans[0].span.start, spans[0].span.end), (1, 2));
//! assert_eq!(best_major_claim(&spans), Some(&spans[0]));
//! ```

mod bio;
mod decode;
mod errors;
mod matrix;
mod predictions;

pub use bio::BioTag;
pub use errors::{MaceError, MaceResult};

// Model input
pub use matrix::{
    worker_order, write_inputs, BatchRange, DocumentMatrix, MatrixBatch, MERGED_INPUT_FILE,
    WORKER_ORDER_FILE,
};

// Model output
pub use decode::{
    best_major_claim, decode_document, decode_tokens, extract_spans, nearest_claim, DecodedSpan,
    DecodedToken,
};
pub use predictions::{
    parse_competence, parse_predictions, read_competence, read_predictions, CompetenceTable,
    TokenDistribution, WorkerCompetence,
};
