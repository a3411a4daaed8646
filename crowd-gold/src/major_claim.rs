//! Gold selection for major-claim batches.

use crowd_agreement::aggregate_exact_matches;
use crowd_anno::AnnotatedDocument;

use crate::estimate::{AgreementResult, DocumentEstimates, GoldEstimate};
use crate::studies::{document_binary, document_study, sorted_records};
use crate::thresholds::Thresholds;

/// Exact supporters needed to accept a candidate even when alpha stays
/// below its threshold.
pub const ABSOLUTE_MAJORITY: usize = 3;

/// Estimate gold for one major-claim batch.
///
/// All exact-match records are scanned once for the largest support. A
/// record equalling the running maximum raises the draw flag; a record
/// beating it takes the lead and clears the flag again, so the flag
/// survives the scan exactly when the final maximum is shared. The leader
/// becomes gold when no draw survives, binary agreement clears its
/// threshold, and alpha clears its threshold or an absolute majority
/// overrides it. Every record is emitted for audit either way, the merged
/// comment record last; comments never compete for gold and cannot cause a
/// draw.
pub fn estimate_major_claims(
    doc: &AnnotatedDocument,
    thresholds: &Thresholds,
) -> DocumentEstimates {
    let alpha = document_study(doc).alpha();
    let binary = document_binary(doc);
    let matches = aggregate_exact_matches(doc);
    let records = sorted_records(&matches);

    let mut best = 0usize;
    let mut draw = false;
    let mut leader = None;
    for (idx, record) in records.iter().enumerate() {
        if record.support() == best {
            draw = true;
        }
        if record.support() > best {
            best = record.support();
            leader = Some(idx);
            draw = false;
        }
    }

    // One estimate per worker submission, span or comment; the pool every
    // record reports it was scored against.
    let num_annotators = doc.annotations().len();

    let mut estimates = Vec::with_capacity(records.len() + 1);
    for (idx, record) in records.iter().enumerate() {
        let is_gold = leader == Some(idx)
            && !draw
            && binary >= thresholds.binary
            && (alpha >= thresholds.alpha || record.support() >= ABSOLUTE_MAJORITY);
        estimates.push(GoldEstimate {
            document_id: doc.document_id().to_string(),
            kind: doc.kind(),
            text: record.text.clone(),
            span: Some(record.span),
            workers: record.workers.clone(),
            stance: record.majority,
            alpha,
            binary,
            is_comment: false,
            is_gold,
            num_annotators,
        });
    }

    if let Some(comments) = &matches.comments {
        estimates.push(GoldEstimate {
            document_id: doc.document_id().to_string(),
            kind: doc.kind(),
            text: String::new(),
            span: None,
            workers: comments.workers.clone(),
            stance: comments.majority,
            alpha,
            binary,
            is_comment: true,
            is_gold: false,
            num_annotators,
        });
    }

    DocumentEstimates {
        document_id: doc.document_id().to_string(),
        kind: doc.kind(),
        estimates,
        agreement: AgreementResult { binary, alpha },
    }
}
