//! Batch estimation over an ingested results file.
//!
//! The runner walks the batches of one [`IngestOutcome`] and collects the
//! per-document estimates. A batch that cannot be processed is recorded
//! with a reason and the run continues; nothing here aborts the batch.

use std::collections::HashMap;

use thiserror::Error;

use crowd_amt::{annotated_document, claim_screened_out, nonsense_votes, IngestOutcome};
use crowd_anno::{TaskKind, TokenSequence, TokenSpan};

use crate::estimate::DocumentEstimates;
use crate::groups::estimate_claims;
use crate::major_claim::estimate_major_claims;
use crate::thresholds::Thresholds;

/// Why a batch was left out of an estimation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// No token sequence was supplied for the document.
    #[error("no token sequence supplied for this document")]
    MissingTokens,

    /// Every row of the batch decoded to nothing usable.
    #[error("no row decoded into a usable annotation")]
    NoUsableAnnotations,

    /// The premise batch points at a claim the claim phase never produced.
    #[error("premise hit {hit} names no known claim")]
    UnknownClaim { hit: u32 },

    /// The reviewed claim was voted nonsense and screened out.
    #[error("claim screened out by {votes} nonsense votes")]
    NonsenseClaim { votes: usize },
}

/// A batch the runner left out, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBatch {
    pub document_id: String,
    pub hit: u32,
    pub reason: SkipReason,
}

/// Result of estimating every batch of one results file.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Per-document estimates, in batch order.
    pub documents: Vec<DocumentEstimates>,
    /// Batches left out, with reasons, in batch order.
    pub skipped: Vec<SkippedBatch>,
}

/// Run gold estimation over every batch of an ingest outcome.
///
/// `tokens` maps document ids to their token sequences; batches without one
/// are skipped. Use [`run_premise_batch`] for premise results, which need
/// the claim phase's output on top.
pub fn run_batch(
    outcome: &IngestOutcome,
    kind: TaskKind,
    tokens: &HashMap<String, TokenSequence>,
    thresholds: &Thresholds,
) -> BatchOutcome {
    let mut result = BatchOutcome::default();
    for batch in &outcome.batches {
        let sequence = match tokens.get(&batch.document_id) {
            Some(sequence) => sequence.clone(),
            None => {
                result.skipped.push(SkippedBatch {
                    document_id: batch.document_id.clone(),
                    hit: batch.hit,
                    reason: SkipReason::MissingTokens,
                });
                continue;
            }
        };
        let doc = annotated_document(batch, kind, sequence);
        if doc.annotations().is_empty() {
            result.skipped.push(SkippedBatch {
                document_id: batch.document_id.clone(),
                hit: batch.hit,
                reason: SkipReason::NoUsableAnnotations,
            });
            continue;
        }
        result.documents.push(match kind {
            TaskKind::MajorClaim => estimate_major_claims(&doc, thresholds),
            TaskKind::Claim | TaskKind::Premise => estimate_claims(&doc, thresholds),
        });
    }
    result
}

/// Span-ordered gold claims per document, the targets premise HITs name by
/// their one-based `hit-premise-N` number.
#[derive(Debug, Clone, Default)]
pub struct ClaimIndex {
    by_document: HashMap<String, Vec<TokenSpan>>,
}

impl ClaimIndex {
    /// Collect the gold claim spans of a finished claim run.
    pub fn from_claim_run(outcome: &BatchOutcome) -> Self {
        let mut by_document: HashMap<String, Vec<TokenSpan>> = HashMap::new();
        for document in &outcome.documents {
            for estimate in document.gold() {
                if let Some(span) = estimate.span {
                    by_document
                        .entry(document.document_id.clone())
                        .or_default()
                        .push(span);
                }
            }
        }
        for spans in by_document.values_mut() {
            spans.sort();
            spans.dedup();
        }
        ClaimIndex { by_document }
    }

    /// The claim a one-based premise hit number points at.
    pub fn claim_for_hit(&self, document_id: &str, hit: u32) -> Option<TokenSpan> {
        let spans = self.by_document.get(document_id)?;
        let idx = (hit as usize).checked_sub(1)?;
        spans.get(idx).copied()
    }

    /// All indexed claims of one document, in span order.
    pub fn claims(&self, document_id: &str) -> &[TokenSpan] {
        self.by_document
            .get(document_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// A claim retired by nonsense votes during the premise phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenedClaim {
    pub document_id: String,
    pub claim: TokenSpan,
    pub votes: usize,
}

/// Result of the premise phase: estimates per surviving batch, plus the
/// claims the nonsense vote retired.
#[derive(Debug, Default)]
pub struct PremiseOutcome {
    pub estimates: BatchOutcome,
    pub screened: Vec<ScreenedClaim>,
}

/// Run gold estimation over premise batches.
///
/// Each batch reviews one claim, resolved through `claims`. A batch whose
/// hit number resolves to no claim is skipped; a reviewed claim that the
/// workers voted nonsense is screened out together with its batch and
/// reported, so callers can retire the claim itself (see
/// [`retire_screened_claims`]).
pub fn run_premise_batch(
    outcome: &IngestOutcome,
    claims: &ClaimIndex,
    tokens: &HashMap<String, TokenSequence>,
    thresholds: &Thresholds,
) -> PremiseOutcome {
    let mut result = PremiseOutcome::default();
    for batch in &outcome.batches {
        let claim = match claims.claim_for_hit(&batch.document_id, batch.hit) {
            Some(claim) => claim,
            None => {
                result.estimates.skipped.push(SkippedBatch {
                    document_id: batch.document_id.clone(),
                    hit: batch.hit,
                    reason: SkipReason::UnknownClaim { hit: batch.hit },
                });
                continue;
            }
        };
        let votes = nonsense_votes(&batch.rows);
        if claim_screened_out(votes, claim.len()) {
            result.screened.push(ScreenedClaim {
                document_id: batch.document_id.clone(),
                claim,
                votes,
            });
            result.estimates.skipped.push(SkippedBatch {
                document_id: batch.document_id.clone(),
                hit: batch.hit,
                reason: SkipReason::NonsenseClaim { votes },
            });
            continue;
        }
        let sequence = match tokens.get(&batch.document_id) {
            Some(sequence) => sequence.clone(),
            None => {
                result.estimates.skipped.push(SkippedBatch {
                    document_id: batch.document_id.clone(),
                    hit: batch.hit,
                    reason: SkipReason::MissingTokens,
                });
                continue;
            }
        };
        let doc = annotated_document(batch, TaskKind::Premise, sequence);
        if doc.annotations().is_empty() {
            result.estimates.skipped.push(SkippedBatch {
                document_id: batch.document_id.clone(),
                hit: batch.hit,
                reason: SkipReason::NoUsableAnnotations,
            });
            continue;
        }
        result
            .estimates
            .documents
            .push(estimate_claims(&doc, thresholds));
    }
    result
}

/// Drop retired claims from a finished claim run.
///
/// The gold estimate of a screened claim is removed outright; audit records
/// at the same span stay, so the run still shows what the workers proposed.
pub fn retire_screened_claims(claim_run: &mut BatchOutcome, screened: &[ScreenedClaim]) {
    for document in &mut claim_run.documents {
        let document_id = &document.document_id;
        document.estimates.retain(|estimate| {
            !(estimate.is_gold
                && screened.iter().any(|s| {
                    s.document_id == *document_id && Some(s.claim) == estimate.span
                }))
        });
    }
}
