//! Agreement study assembly for documents and overlap groups.
//!
//! The selection scans score candidates against two study shapes. The
//! document study spans every attempting worker and every in-text span of
//! the batch; a group study restricts raters and units to one overlap
//! group. Both run over the whole document continuum, so a group study
//! still sees the unannotated remainder of the text as gap sections.

use crowd_agreement::{binary_agreement, ExactMatchRecord, ExactMatches, UnitizingStudy};
use crowd_anno::AnnotatedDocument;

/// Unitizing study over the full document: one rater per attempting worker,
/// one unit per in-text span. Workers who attempted but placed nothing
/// contribute gap sections only.
pub fn document_study(doc: &AnnotatedDocument) -> UnitizingStudy {
    let attempting = doc.attempting_workers();
    let mut study = UnitizingStudy::new(attempting.len(), doc.tokens().len());
    for (annotation, span) in doc.span_annotations() {
        if let Some(rater) = attempting.iter().position(|w| *w == annotation.worker) {
            study.add_unit(rater, span.start, span.len());
        }
    }
    study
}

/// Document-level binary agreement: contributing workers over attempting
/// workers.
pub fn document_binary(doc: &AnnotatedDocument) -> f64 {
    binary_agreement(
        doc.contributing_workers().len(),
        doc.attempting_workers().len(),
    )
}

/// Unitizing study over one overlap group: raters are the group's distinct
/// workers, units its records' spans, continuum the whole document.
pub fn group_study(doc: &AnnotatedDocument, records: &[&ExactMatchRecord]) -> UnitizingStudy {
    let raters = group_workers(records);
    let mut study = UnitizingStudy::new(raters.len(), doc.tokens().len());
    for record in records {
        for worker in &record.workers {
            if let Some(rater) = raters.iter().position(|r| *r == worker.as_str()) {
                study.add_unit(rater, record.span.start, record.span.len());
            }
        }
    }
    study
}

/// Group binary agreement: the group's distinct workers over the document's
/// attempting workers.
pub fn group_binary(doc: &AnnotatedDocument, records: &[&ExactMatchRecord]) -> f64 {
    binary_agreement(
        group_workers(records).len(),
        doc.attempting_workers().len(),
    )
}

fn group_workers<'a>(records: &[&'a ExactMatchRecord]) -> Vec<&'a str> {
    let mut workers: Vec<&str> = Vec::new();
    for record in records {
        for worker in &record.workers {
            if !workers.contains(&worker.as_str()) {
                workers.push(worker);
            }
        }
    }
    workers
}

/// Candidate order for the selection scans: start token index, then the
/// first contributor's id, then end index. First-found-wins rules and tie
/// detection run over this order, so submission order cannot change the
/// outcome.
pub fn sorted_records(matches: &ExactMatches) -> Vec<&ExactMatchRecord> {
    let mut records: Vec<&ExactMatchRecord> = matches.records.iter().collect();
    records.sort_by(|a, b| {
        (a.span.start, a.workers.first(), a.span.end).cmp(&(
            b.span.start,
            b.workers.first(),
            b.span.end,
        ))
    });
    records
}
