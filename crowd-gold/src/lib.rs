//! Gold standard estimation from crowd-sourced span annotations.
//!
//! Sitting on top of [`crowd_agreement`]'s measures, this crate decides
//! which worker-proposed spans become gold annotations. Major-claim batches
//! elect at most one winner per document; claim and premise batches score
//! their candidates per overlap group, with an absolute majority able to
//! bypass the agreement thresholds. Every candidate comes back as an audit
//! record, winners flagged gold.
//!
//! ## Core Types
//!
//! * [`Thresholds`] - acceptance levels, with TOML file loading.
//! * [`GoldEstimate`] / [`DocumentEstimates`] - the per-document output.
//! * [`run_batch`] / [`run_premise_batch`] - estimation over a whole
//!   ingested results file, with per-batch skip reporting.
//! * [`BatchPayload`] - a finished run, serialized for the JSON export.
//!
//! ## Example
//!
//! ```
//! use crowd_anno::{tokenize, AnnotatedDocument, TaskKind, TokenSpan, WorkerAnnotation};
//! use crowd_gold::{estimate_major_claims, Thresholds};
//!
//! let doc = AnnotatedDocument::new(
//!     "B0007",
//!     TaskKind::MajorClaim,
//!     tokenize("Great phone but the battery dies fast"),
//!     vec![
//!         WorkerAnnotation::span("w1", None, TokenSpan::new(3, 6)),
//!         WorkerAnnotation::span("w2", None, TokenSpan::new(3, 6)),
//!         WorkerAnnotation::span("w3", None, TokenSpan::new(3, 6)),
//!     ],
//! );
//!
//! let result = estimate_major_claims(&doc, &Thresholds::default());
//! assert_eq!(result.gold().count(), 1);
//! ```

mod errors;
mod estimate;
mod export;
mod groups;
mod major_claim;
mod runner;
mod studies;
mod thresholds;

pub use errors::{GoldError, GoldResult};
pub use estimate::{AgreementResult, DocumentEstimates, EstimateKey, GoldEstimate};
pub use export::{
    BatchPayload, DocumentPayload, EstimatePayload, PremisePayload, ScreenedClaimPayload,
    SkipPayload,
};
pub use groups::estimate_claims;
pub use major_claim::{estimate_major_claims, ABSOLUTE_MAJORITY};
pub use runner::{
    retire_screened_claims, run_batch, run_premise_batch, BatchOutcome, ClaimIndex,
    PremiseOutcome, ScreenedClaim, SkipReason, SkippedBatch,
};
pub use studies::{document_binary, document_study, group_binary, group_study, sorted_records};
pub use thresholds::Thresholds;
