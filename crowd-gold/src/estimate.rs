//! Estimate value records, the output side of gold selection.

use crowd_agreement::StanceMajority;
use crowd_anno::{TaskKind, TokenSpan};

/// Document-level agreement over one task batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgreementResult {
    /// Share of attempting workers that contributed an in-text span.
    pub binary: f64,
    /// Alpha-u over the whole document continuum,
    /// [`crowd_agreement::UNDEFINED`] when not computable.
    pub alpha: f64,
}

/// One estimated annotation, gold or audit-only.
///
/// Estimates are plain value records. Identity is structural: where the
/// record sits ([`GoldEstimate::key`]), not which scan produced it or which
/// workers back it. An emitted estimate is never weakened afterwards; the
/// only in-place change the selection loops perform is the promotion of an
/// audit record to gold by a later overlap group.
#[derive(Debug, Clone, PartialEq)]
pub struct GoldEstimate {
    pub document_id: String,
    pub kind: TaskKind,
    /// Covered text; empty for the merged comment record.
    pub text: String,
    /// Token span; `None` for the merged comment record.
    pub span: Option<TokenSpan>,
    /// Workers backing this record, deduplicated, first-seen order.
    pub workers: Vec<String>,
    /// Stance majority, where the task carries stances.
    pub stance: Option<StanceMajority>,
    /// Alpha-u of the study this record was scored in.
    pub alpha: f64,
    /// Binary agreement of the study this record was scored in.
    pub binary: f64,
    pub is_comment: bool,
    pub is_gold: bool,
    /// Size of the worker pool the record was scored against.
    pub num_annotators: usize,
}

impl GoldEstimate {
    /// Number of workers backing the record.
    pub fn support(&self) -> usize {
        self.workers.len()
    }

    /// Structural identity of the record inside a batch.
    pub fn key(&self) -> EstimateKey {
        EstimateKey {
            document_id: self.document_id.clone(),
            span: self.span,
            kind: self.kind,
        }
    }
}

/// Where an estimate sits: document, span, task flavor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EstimateKey {
    pub document_id: String,
    pub span: Option<TokenSpan>,
    pub kind: TaskKind,
}

/// Everything estimation produced for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentEstimates {
    pub document_id: String,
    pub kind: TaskKind,
    /// All records, gold and audit-only, in candidate order (comment record
    /// last).
    pub estimates: Vec<GoldEstimate>,
    /// Document-level agreement, independent of any per-group scores the
    /// individual records may carry.
    pub agreement: AgreementResult,
}

impl DocumentEstimates {
    /// Records promoted to gold.
    pub fn gold(&self) -> impl Iterator<Item = &GoldEstimate> {
        self.estimates.iter().filter(|e| e.is_gold)
    }

    /// Audit records that did not make it.
    pub fn non_gold(&self) -> impl Iterator<Item = &GoldEstimate> {
        self.estimates.iter().filter(|e| !e.is_gold)
    }
}
