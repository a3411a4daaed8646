//! Gold selection for claim and premise batches.

use crowd_agreement::{aggregate_exact_matches, overlap_groups, ExactMatchRecord, UNDEFINED};
use crowd_anno::{AnnotatedDocument, TokenSpan};

use crate::estimate::{AgreementResult, DocumentEstimates, GoldEstimate};
use crate::major_claim::ABSOLUTE_MAJORITY;
use crate::studies::{document_binary, document_study, group_binary, group_study, sorted_records};
use crate::thresholds::Thresholds;

/// Tasks are published with this many assignments; the comment record's
/// binary score counts its workers against the full assignment size, not
/// against the workers who actually attempted.
const ASSIGNMENTS_PER_TASK: f64 = 5.0;

/// Emit-once bookkeeping across overlap groups.
///
/// A record shared between groups keeps a single estimate. A later group
/// may promote that estimate to gold, never demote it; the promotion keeps
/// the scores of the group that first emitted it.
struct EmitState {
    estimates: Vec<GoldEstimate>,
    emitted_at: Vec<Option<usize>>,
    gold: Vec<bool>,
}

impl EmitState {
    fn new(record_count: usize) -> Self {
        EmitState {
            estimates: Vec::new(),
            emitted_at: vec![None; record_count],
            gold: vec![false; record_count],
        }
    }

    fn is_emitted(&self, idx: usize) -> bool {
        self.emitted_at[idx].is_some()
    }

    fn emit_once(&mut self, idx: usize, estimate: GoldEstimate) {
        if self.emitted_at[idx].is_none() {
            self.emitted_at[idx] = Some(self.estimates.len());
            self.estimates.push(estimate);
        }
    }

    fn promote(&mut self, idx: usize) {
        if let Some(pos) = self.emitted_at[idx] {
            self.estimates[pos].is_gold = true;
        }
    }
}

/// Estimate gold for one claim or premise batch.
///
/// Candidates are exact-match records, scored per overlap group. Within a
/// group: (a) the first fresh record backed by an absolute majority is
/// accepted outright, bypassing the thresholds; (b) otherwise, when the
/// group's binary and alpha both clear the thresholds, the record with the
/// most supporters becomes gold unless the scan saw any tie with the
/// running maximum. The tie check is sticky: one transient tie withholds
/// the threshold gold for the whole group, even when a strictly larger
/// record follows (compare the major-claim rule, which recovers). (c)
/// Everything else is emitted once, non-gold, for audit. The merged comment
/// record comes last and never competes.
pub fn estimate_claims(doc: &AnnotatedDocument, thresholds: &Thresholds) -> DocumentEstimates {
    let agreement = AgreementResult {
        binary: document_binary(doc),
        alpha: document_study(doc).alpha(),
    };
    let matches = aggregate_exact_matches(doc);
    let records = sorted_records(&matches);
    let spans: Vec<TokenSpan> = records.iter().map(|r| r.span).collect();
    let num_annotators = doc.distinct_workers().len();

    let mut state = EmitState::new(records.len());
    for group in overlap_groups(&spans) {
        let group_records: Vec<&ExactMatchRecord> =
            group.iter().map(|&idx| records[idx]).collect();
        let binary = group_binary(doc, &group_records);
        let alpha = group_study(doc, &group_records).alpha();

        // Absolute majorities first. A fresh acceptance closes this check
        // for the group; promoting a record already seen elsewhere does not.
        for &idx in &group {
            if records[idx].support() < ABSOLUTE_MAJORITY || state.gold[idx] {
                continue;
            }
            state.gold[idx] = true;
            if state.is_emitted(idx) {
                state.promote(idx);
                continue;
            }
            state.emit_once(
                idx,
                span_estimate(doc, records[idx], alpha, binary, true, num_annotators),
            );
            break;
        }

        if binary >= thresholds.binary && alpha >= thresholds.alpha {
            let mut max_votes = 0usize;
            let mut tied = false;
            for &idx in &group {
                let votes = records[idx].support();
                if votes > max_votes {
                    max_votes = votes;
                } else if votes == max_votes {
                    tied = true;
                }
            }
            for &idx in &group {
                if state.gold[idx] {
                    continue;
                }
                if !tied && records[idx].support() == max_votes {
                    state.gold[idx] = true;
                    if state.is_emitted(idx) {
                        state.promote(idx);
                    } else {
                        state.emit_once(
                            idx,
                            span_estimate(doc, records[idx], alpha, binary, true, num_annotators),
                        );
                    }
                } else {
                    state.emit_once(
                        idx,
                        span_estimate(doc, records[idx], alpha, binary, false, num_annotators),
                    );
                }
            }
        } else {
            for &idx in &group {
                if state.gold[idx] {
                    continue;
                }
                state.emit_once(
                    idx,
                    span_estimate(doc, records[idx], alpha, binary, false, num_annotators),
                );
            }
        }
    }

    let mut estimates = state.estimates;
    if let Some(comments) = &matches.comments {
        estimates.push(GoldEstimate {
            document_id: doc.document_id().to_string(),
            kind: doc.kind(),
            text: String::new(),
            span: None,
            workers: comments.workers.clone(),
            stance: comments.majority,
            alpha: UNDEFINED,
            binary: comments.workers.len() as f64 / ASSIGNMENTS_PER_TASK,
            is_comment: true,
            is_gold: false,
            num_annotators,
        });
    }

    DocumentEstimates {
        document_id: doc.document_id().to_string(),
        kind: doc.kind(),
        estimates,
        agreement,
    }
}

fn span_estimate(
    doc: &AnnotatedDocument,
    record: &ExactMatchRecord,
    alpha: f64,
    binary: f64,
    is_gold: bool,
    num_annotators: usize,
) -> GoldEstimate {
    GoldEstimate {
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
    }
}
