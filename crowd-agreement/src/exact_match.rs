//! Grouping of worker submissions whose spans cover the identical text.
//!
//! Exact-match records are the strict, high-confidence consensus signal:
//! two submissions count as the same annotation only when their covered
//! text is character-identical. The looser overlap grouping lives in
//! [`crate::overlap_groups`]. Comments never compete with spans; all of a
//! document's comments merge into a single side record.

use crowd_anno::{AnnotatedDocument, Stance, TokenSpan};

/// Outcome of a stance vote over the contributors of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StanceMajority {
    Support,
    Attack,
    Tied,
}

impl StanceMajority {
    pub fn as_str(&self) -> &'static str {
        match self {
            StanceMajority::Support => "support",
            StanceMajority::Attack => "attack",
            StanceMajority::Tied => "tied",
        }
    }
}

impl std::fmt::Display for StanceMajority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Majority over one stance vote per contributor. Attack and support cancel
/// each other out; contributors without a stance abstain. `None` means no
/// contributor voted at all (major claim tasks have no stance).
pub fn stance_majority(votes: impl IntoIterator<Item = Option<Stance>>) -> Option<StanceMajority> {
    let mut balance = 0i64;
    let mut voted = false;
    for vote in votes {
        match vote {
            Some(Stance::Attack) => {
                balance += 1;
                voted = true;
            }
            Some(Stance::Support) => {
                balance -= 1;
                voted = true;
            }
            None => {}
        }
    }
    if !voted {
        None
    } else if balance > 0 {
        Some(StanceMajority::Attack)
    } else if balance < 0 {
        Some(StanceMajority::Support)
    } else {
        Some(StanceMajority::Tied)
    }
}

/// All workers whose span covers exactly this text, with their stance vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactMatchRecord {
    /// Covered text, the identity of the record.
    pub text: String,
    /// Span of the first submission that produced the text. Later workers
    /// may have marked a different occurrence of the same text; the record
    /// keeps the first position.
    pub span: TokenSpan,
    pub majority: Option<StanceMajority>,
    /// Distinct contributors in first-seen order.
    pub workers: Vec<String>,
}

impl ExactMatchRecord {
    /// Number of distinct workers backing this text.
    pub fn support(&self) -> usize {
        self.workers.len()
    }
}

/// The merged bucket of every comment submitted for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub majority: Option<StanceMajority>,
    /// Distinct commenting workers in first-seen order.
    pub workers: Vec<String>,
    /// One comment text per counted worker, in submission order.
    pub texts: Vec<String>,
}

/// Exact-match view of one annotated document: one record per distinct
/// covered text in first-seen order, plus the merged comment bucket if
/// anyone commented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactMatches {
    pub records: Vec<ExactMatchRecord>,
    pub comments: Option<CommentRecord>,
}

/// Collapses a document's submissions into exact-match records.
///
/// A worker counts once per text no matter how often they submitted it, and
/// only their first submission's stance is voted. Record order is the order
/// in which each text was first seen, so the output is a pure function of
/// the input list.
pub fn aggregate_exact_matches(doc: &AnnotatedDocument) -> ExactMatches {
    let mut records: Vec<ExactMatchRecord> = Vec::new();
    let mut votes_by_record: Vec<Vec<Option<Stance>>> = Vec::new();

    for (annotation, span) in doc.span_annotations() {
        let text = doc.tokens().covered_text(span);
        let slot = match records.iter().position(|r| r.text == text) {
            Some(slot) => slot,
            None => {
                records.push(ExactMatchRecord {
                    text,
                    span,
                    majority: None,
                    workers: Vec::new(),
                });
                votes_by_record.push(Vec::new());
                records.len() - 1
            }
        };
        if !records[slot].workers.contains(&annotation.worker) {
            records[slot].workers.push(annotation.worker.clone());
            votes_by_record[slot].push(annotation.stance);
        }
    }
    for (record, votes) in records.iter_mut().zip(votes_by_record) {
        record.majority = stance_majority(votes);
    }

    let mut comment_workers: Vec<String> = Vec::new();
    let mut comment_votes: Vec<Option<Stance>> = Vec::new();
    let mut comment_texts: Vec<String> = Vec::new();
    for annotation in doc.comment_annotations() {
        if comment_workers.contains(&annotation.worker) {
            continue;
        }
        comment_workers.push(annotation.worker.clone());
        comment_votes.push(annotation.stance);
        if let crowd_anno::AnnotationBody::Comment(text) = &annotation.body {
            comment_texts.push(text.clone());
        }
    }
    let comments = if comment_workers.is_empty() {
        None
    } else {
        Some(CommentRecord {
            majority: stance_majority(comment_votes),
            workers: comment_workers,
            texts: comment_texts,
        })
    };

    ExactMatches { records, comments }
}
