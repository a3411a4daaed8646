//! Results-file ingestion: load, group, and decode assignment rows.
//!
//! One results file holds one task level's assignments for a whole batch
//! of documents. Ingestion reads the file once, groups accepted rows into
//! per-document (and, for premises, per-HIT) batches in first-seen order,
//! and registers every accepted worker into a roster that is frozen before
//! anything downstream runs.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crowd_anno::{AnnotatedDocument, FrozenRoster, RaterRoster, TaskKind, TokenSequence};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::answers::{claim_annotations, major_claim_annotation};
use crate::errors::{AmtError, AmtResult};
use crate::results_table::{parse_results_table, ResultsRow, RowSkip, SkipReason};

static HIT_PREMISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"hit-premise-(\d+)-review-").expect("Invalid premise HIT regex"));

/// Rows of one task batch: one document and, for premises, one HIT.
#[derive(Debug)]
pub struct DocumentRows {
    pub document_id: String,
    /// Premise HIT number; `0` for major-claim and claim batches.
    pub hit: u32,
    pub rows: Vec<ResultsRow>,
}

impl DocumentRows {
    /// Workers with an accepted assignment in this batch, first-seen.
    pub fn attempting_workers(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for row in &self.rows {
            let worker = row.worker_id.as_str();
            if !seen.contains(&worker) {
                seen.push(worker);
            }
        }
        seen
    }
}

/// Everything ingestion extracted from one results file.
#[derive(Debug)]
pub struct IngestOutcome {
    /// Batches in first-seen `(document, hit)` order.
    pub batches: Vec<DocumentRows>,
    /// Every accepted worker, in first-seen order.
    pub roster: FrozenRoster,
    /// Rows dropped on the way, in line order.
    pub skipped: Vec<RowSkip>,
}

/// Reads one results file and groups its accepted rows.
///
/// An unreadable file is fatal: a partial roster would shift every rater
/// index downstream.
pub fn ingest_results(path: &Path) -> AmtResult<IngestOutcome> {
    let content = fs::read_to_string(path).map_err(|e| AmtError::Load {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    ingest_content(&content)
}

/// Grouping pass over already-loaded results content.
pub fn ingest_content(content: &str) -> AmtResult<IngestOutcome> {
    let parsed = parse_results_table(content)?;
    let mut skipped = parsed.skipped;

    let mut roster = RaterRoster::new();
    let mut batches: Vec<DocumentRows> = Vec::new();
    let mut index: HashMap<(String, u32), usize> = HashMap::new();
    for row in parsed.rows {
        // Accepted rows register their worker even when the row itself is
        // dropped below; the roster tracks assignments, not usable answers.
        roster.observe(&row.worker_id);
        let hit = match premise_hit_number(&row.annotation) {
            Ok(hit) => hit,
            Err(reason) => {
                skipped.push(RowSkip {
                    line: row.line,
                    reason,
                });
                continue;
            }
        };
        let document_id = document_name(&row.annotation).to_string();
        let key = (document_id.clone(), hit);
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                batches.push(DocumentRows {
                    document_id,
                    hit,
                    rows: Vec::new(),
                });
                index.insert(key, batches.len() - 1);
                batches.len() - 1
            }
        };
        batches[slot].rows.push(row);
    }
    skipped.sort_by_key(|skip| skip.line);

    Ok(IngestOutcome {
        batches,
        roster: roster.freeze(),
        skipped,
    })
}

/// Decodes one batch into the shared annotation model.
///
/// Major-claim rows carry a flat token-id list; claim and premise rows
/// carry stance fragments. The attempting-worker list comes from the batch
/// rows, so workers who submitted nothing usable stay countable.
pub fn annotated_document(
    batch: &DocumentRows,
    kind: TaskKind,
    tokens: TokenSequence,
) -> AnnotatedDocument {
    let mut annotations = Vec::new();
    for row in &batch.rows {
        match kind {
            TaskKind::MajorClaim => {
                if let Some(annotation) = major_claim_annotation(row, &tokens) {
                    annotations.push(annotation);
                }
            }
            TaskKind::Claim | TaskKind::Premise => {
                annotations.extend(claim_annotations(row, &tokens));
            }
        }
    }
    let attempting = batch
        .attempting_workers()
        .into_iter()
        .map(str::to_string)
        .collect();
    AnnotatedDocument::new(batch.document_id.clone(), kind, tokens, annotations)
        .with_attempting(attempting)
}

/// The document a row belongs to: the last `-` segment of the HIT page
/// path, without its `.html` suffix.
fn document_name(annotation: &str) -> &str {
    let segment = annotation.rsplit('-').next().unwrap_or(annotation);
    segment.trim_end_matches(".html")
}

/// Premise HIT number from the HIT page path; `0` for non-premise HITs.
fn premise_hit_number(annotation: &str) -> Result<u32, SkipReason> {
    if !annotation.contains("hit-premise") {
        return Ok(0);
    }
    HIT_PREMISE
        .captures(annotation)
        .and_then(|caps| caps.get(1))
        .and_then(|number| number.as_str().parse().ok())
        .ok_or(SkipReason::UnparsableHitNumber)
}
