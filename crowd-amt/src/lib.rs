//! Mechanical Turk results ingestion.
//!
//! Crowd annotation runs arrive as tab-separated results exports, one row
//! per assignment. This crate turns an export into the shared
//! [`crowd_anno`] model: rows are filtered and grouped per document and
//! HIT, worker answers are decoded into span or comment annotations, and
//! every accepted worker lands in a frozen rater roster.
//!
//! ## Pipeline
//!
//! - [`parse_results_table`] - header-driven row projection and filtering
//! - [`ingest_results`] / [`ingest_content`] - grouping and roster
//!   population
//! - [`annotated_document`] - per-batch decoding into
//!   [`crowd_anno::AnnotatedDocument`]
//! - [`nonsense_votes`] / [`claim_screened_out`] - premise-phase claim
//!   screening
//!
//! ## Example
//!
//! ```
//! use crowd_amt::ingest_content;
//!
//! let results = "workerid\tannotation\tassignmentstatus\n\
//!                w1\thit-majorclaim-review-B0001.html\tApproved";
//! let outcome = ingest_content(results).unwrap();
//! assert_eq!(outcome.batches[0].document_id, "B0001");
//! assert_eq!(outcome.roster.len(), 1);
//! ```

mod answers;
mod errors;
mod ingest;
mod results_table;

// Answer decoding
pub use answers::{
    claim_annotations, claim_fragments, claim_screened_out, is_nonsense_vote,
    major_claim_annotation, nonsense_votes, ClaimFragment,
};

// File handling
pub use errors::{AmtError, AmtResult};
pub use ingest::{annotated_document, ingest_content, ingest_results, DocumentRows, IngestOutcome};
pub use results_table::{parse_results_table, ParsedTable, ResultsRow, RowSkip, SkipReason};
