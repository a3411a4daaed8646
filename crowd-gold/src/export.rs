//! Serialized payloads for the machine-readable estimate export.
//!
//! Downstream consumers (report writers, corpus builders) read one JSON
//! document per run. Payload structs mirror the estimate records with
//! plain serializable fields; stances and task flavors flatten to their
//! string forms.

use serde::Serialize;
use serde_json::{self, Value};

use crate::estimate::{DocumentEstimates, GoldEstimate};
use crate::runner::{BatchOutcome, PremiseOutcome, ScreenedClaim, SkippedBatch};

/// Serialized payload for a whole estimation run.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BatchPayload {
    /// Per-document estimates, in batch order.
    pub documents: Vec<DocumentPayload>,
    /// Batches the runner left out, with reasons.
    pub skipped: Vec<SkipPayload>,
}

impl BatchPayload {
    /// Convert to a JSON value for downstream consumers.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("payload always serializes")
    }

    /// Convert to a pretty-printed JSON string.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(self).expect("payload always serializes")
    }
}

/// One document's estimates plus its document-level agreement.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DocumentPayload {
    pub document_id: String,
    pub task: String,
    pub binary_agreement: f64,
    pub alpha_agreement: f64,
    pub estimates: Vec<EstimatePayload>,
}

/// One estimate record.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EstimatePayload {
    pub text: String,
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub workers: Vec<String>,
    pub stance: Option<String>,
    pub alpha: f64,
    pub binary: f64,
    pub comment: bool,
    pub gold: bool,
    pub annotators: usize,
}

/// One skipped batch.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkipPayload {
    pub document_id: String,
    pub hit: u32,
    pub reason: String,
}

/// Serialized payload for a premise run, screened claims included.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PremisePayload {
    pub documents: Vec<DocumentPayload>,
    pub skipped: Vec<SkipPayload>,
    /// Claims retired by the nonsense vote.
    pub screened_claims: Vec<ScreenedClaimPayload>,
}

impl PremisePayload {
    /// Convert to a pretty-printed JSON string.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(self).expect("payload always serializes")
    }
}

/// One claim the premise phase retired.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScreenedClaimPayload {
    pub document_id: String,
    pub start: usize,
    pub end: usize,
    pub votes: usize,
}

impl From<&GoldEstimate> for EstimatePayload {
    fn from(estimate: &GoldEstimate) -> Self {
        EstimatePayload {
            text: estimate.text.clone(),
            start: estimate.span.map(|span| span.start),
            end: estimate.span.map(|span| span.end),
            workers: estimate.workers.clone(),
            stance: estimate.stance.map(|stance| stance.as_str().to_string()),
            alpha: estimate.alpha,
            binary: estimate.binary,
            comment: estimate.is_comment,
            gold: estimate.is_gold,
            annotators: estimate.num_annotators,
        }
    }
}

impl From<&DocumentEstimates> for DocumentPayload {
    fn from(document: &DocumentEstimates) -> Self {
        DocumentPayload {
            document_id: document.document_id.clone(),
            task: document.kind.as_str().to_string(),
            binary_agreement: document.agreement.binary,
            alpha_agreement: document.agreement.alpha,
            estimates: document.estimates.iter().map(EstimatePayload::from).collect(),
        }
    }
}

impl From<&SkippedBatch> for SkipPayload {
    fn from(skip: &SkippedBatch) -> Self {
        SkipPayload {
            document_id: skip.document_id.clone(),
            hit: skip.hit,
            reason: skip.reason.to_string(),
        }
    }
}

impl From<&BatchOutcome> for BatchPayload {
    fn from(outcome: &BatchOutcome) -> Self {
        BatchPayload {
            documents: outcome.documents.iter().map(DocumentPayload::from).collect(),
            skipped: outcome.skipped.iter().map(SkipPayload::from).collect(),
        }
    }
}

impl From<&ScreenedClaim> for ScreenedClaimPayload {
    fn from(screened: &ScreenedClaim) -> Self {
        ScreenedClaimPayload {
            document_id: screened.document_id.clone(),
            start: screened.claim.start,
            end: screened.claim.end,
            votes: screened.votes,
        }
    }
}

impl From<&PremiseOutcome> for PremisePayload {
    fn from(outcome: &PremiseOutcome) -> Self {
        PremisePayload {
            documents: outcome
                .estimates
                .documents
                .iter()
                .map(DocumentPayload::from)
                .collect(),
            skipped: outcome
                .estimates
                .skipped
                .iter()
                .map(SkipPayload::from)
                .collect(),
            screened_claims: outcome
                .screened
                .iter()
                .map(ScreenedClaimPayload::from)
                .collect(),
        }
    }
}
