//! Decoding worker answers into annotations.
//!
//! Major-claim HITs submit a flat comma-separated token-id list. Claim and
//! premise HITs submit one fragment per marked span, each opened by a
//! stance keyword:
//!
//! ```text
//! [becauseid:1{token_0,undefined,token_3,},[butid:4{token_9,undefined,token_12,},],
//! ```
//!
//! Fragments split on `,}`; `undefined` entries are placeholder ids the HIT
//! page writes for unmarked slots. A worker who marked nothing but typed
//! into the free-text field becomes a comment annotation instead.

use crowd_anno::{Stance, TokenSequence, WorkerAnnotation};

use crate::results_table::ResultsRow;

/// One stance-carrying fragment of a claim or premise answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimFragment<'a> {
    pub stance: Stance,
    pub token_ids: Vec<&'a str>,
}

/// Splits a claim or premise answer into its stance fragments.
///
/// Fragments without a stance keyword are bracket debris from the HIT page
/// and are dropped. A fragment containing `]` is structurally damaged; its
/// stance survives but its token ids are not trusted, so it can only end up
/// as a comment.
pub fn claim_fragments(answer: &str) -> Vec<ClaimFragment<'_>> {
    let mut fragments = Vec::new();
    for raw in answer.split(",}") {
        let stance = if raw.contains("because") {
            Stance::Support
        } else if raw.contains("but") {
            Stance::Attack
        } else {
            continue;
        };
        let token_ids = if raw.contains(']') {
            Vec::new()
        } else {
            match raw.split_once('{') {
                Some((_, ids)) => ids
                    .split(',')
                    .filter(|id| !id.is_empty() && *id != "undefined")
                    .collect(),
                None => Vec::new(),
            }
        };
        fragments.push(ClaimFragment { stance, token_ids });
    }
    fragments
}

/// Decodes one major-claim row.
///
/// Returns a span annotation when any submitted token id resolves, a
/// comment annotation when the worker typed free text instead, and `None`
/// for an empty-handed row.
pub fn major_claim_annotation(
    row: &ResultsRow,
    tokens: &TokenSequence,
) -> Option<WorkerAnnotation> {
    let ids = row.tokens.as_deref().unwrap_or("");
    if let Some(span) = tokens.span_for_ids(ids.split(',').filter(|id| !id.is_empty())) {
        return Some(WorkerAnnotation::span(row.worker_id.as_str(), None, span));
    }
    if !row.text_input.trim().is_empty() {
        return Some(WorkerAnnotation::comment(
            row.worker_id.as_str(),
            None,
            row.text_input.as_str(),
        ));
    }
    None
}

/// Decodes one claim or premise row into zero or more annotations.
///
/// Every fragment that resolves to tokens becomes a span annotation with
/// the fragment's stance. A fragment that resolves nothing falls back to
/// the row's free-text field, keeping its stance, so one row can produce
/// several comments.
pub fn claim_annotations(row: &ResultsRow, tokens: &TokenSequence) -> Vec<WorkerAnnotation> {
    let answer = match row.tokens.as_deref() {
        Some(answer) => answer,
        None => return Vec::new(),
    };
    let mut annotations = Vec::new();
    for fragment in claim_fragments(answer) {
        match tokens.span_for_ids(fragment.token_ids.iter().copied()) {
            Some(span) => annotations.push(WorkerAnnotation::span(
                row.worker_id.as_str(),
                Some(fragment.stance),
                span,
            )),
            None if !row.text_input.trim().is_empty() => {
                annotations.push(WorkerAnnotation::comment(
                    row.worker_id.as_str(),
                    Some(fragment.stance),
                    row.text_input.as_str(),
                ));
            }
            None => {}
        }
    }
    annotations
}

/// Whether a free-text answer declares the reviewed claim nonsense.
pub fn is_nonsense_vote(in_text: &str) -> bool {
    let lowered = in_text.to_ascii_lowercase();
    lowered == "false" || lowered.contains("nonsense")
}

/// Nonsense votes against the claim a premise batch reviews.
pub fn nonsense_votes(rows: &[ResultsRow]) -> usize {
    rows.iter()
        .filter(|row| is_nonsense_vote(&row.in_text))
        .count()
}

/// Whether the reviewed claim is dropped before estimation.
///
/// A single-token claim counts as unanimously nonsense regardless of the
/// votes; otherwise more than two votes drop the claim.
pub fn claim_screened_out(votes: usize, claim_token_count: usize) -> bool {
    if claim_token_count < 2 {
        return true;
    }
    votes > 2
}
