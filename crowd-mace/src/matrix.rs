//! Worker matrices: the per-document CSV input of the competence model.
//!
//! The model consumes one CSV per task batch, rows are tokens and columns
//! are raters. A worker who attempted the batch gets a full column of tags
//! (all `O` unless their spans say otherwise); a worker who never saw the
//! document gets an empty cell, which the model reads as "no judgement".
//! Columns follow the frozen roster, so every batch of one results file
//! lines up with the same `workerIDs.txt`.
//!
//! The model itself is run on one merged file per task level. [`MatrixBatch`]
//! concatenates the per-document matrices and remembers each document's row
//! range, so predictions can be cut back apart afterwards.

use std::fs;
use std::ops::Range;
use std::path::Path;

use crowd_anno::{AnnotatedDocument, FrozenRoster};

use crate::bio::BioTag;
use crate::errors::{MaceError, MaceResult};

/// File listing the roster, one worker per line, next to the matrices.
pub const WORKER_ORDER_FILE: &str = "workerIDs.txt";
/// The merged matrix the model is actually pointed at.
pub const MERGED_INPUT_FILE: &str = "inputFile.csv";

/// BIO tag matrix of one task batch: token rows times roster columns.
#[derive(Debug)]
pub struct DocumentMatrix {
    document_id: String,
    file_stem: String,
    rows: Vec<Vec<Option<BioTag>>>,
}

impl DocumentMatrix {
    /// Matrix for a major-claim or claim batch. The file stem is the
    /// document id.
    pub fn from_document(doc: &AnnotatedDocument, roster: &FrozenRoster) -> DocumentMatrix {
        let file_stem = doc.document_id().to_string();
        DocumentMatrix::build(doc, roster, file_stem)
    }

    /// Matrix for one premise HIT. Premise batches of one document are
    /// separate model inputs, so the HIT number joins the file stem.
    pub fn for_premise_hit(
        doc: &AnnotatedDocument,
        roster: &FrozenRoster,
        hit: u32,
    ) -> DocumentMatrix {
        let file_stem = format!("{}-{}", doc.document_id(), hit);
        DocumentMatrix::build(doc, roster, file_stem)
    }

    fn build(doc: &AnnotatedDocument, roster: &FrozenRoster, file_stem: String) -> DocumentMatrix {
        let mut rows = vec![vec![None; roster.len()]; doc.tokens().len()];
        // Attempting workers judged every token, including the ones they
        // left unmarked. Everyone else stays an empty cell.
        for worker in doc.attempting_workers() {
            if let Some(id) = roster.id_of(worker) {
                for row in rows.iter_mut() {
                    row[id.index()] = Some(BioTag::Outside);
                }
            }
        }
        if let Some(last) = rows.len().checked_sub(1) {
            for (annotation, span) in doc.span_annotations() {
                let column = match roster.id_of(&annotation.worker) {
                    Some(id) => id.index(),
                    None => continue,
                };
                for idx in span.start..=span.end.min(last) {
                    let tag = if idx == span.start {
                        BioTag::Begin(annotation.stance)
                    } else {
                        BioTag::Inside(annotation.stance)
                    };
                    rows[idx][column] = Some(tag);
                }
            }
        }
        DocumentMatrix {
            document_id: doc.document_id().to_string(),
            file_stem,
            rows,
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Base name of this matrix's CSV file, without the extension.
    pub fn file_stem(&self) -> &str {
        &self.file_stem
    }

    pub fn token_count(&self) -> usize {
        self.rows.len()
    }

    /// Render the matrix as CSV, one token per line. Empty cells stay
    /// empty, which is how absent workers are encoded.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                if let Some(tag) = cell {
                    out.push_str(tag.as_str());
                }
            }
            out.push('\n');
        }
        out
    }
}

/// The roster as the model expects it: one worker name per line, in
/// column order.
pub fn worker_order(roster: &FrozenRoster) -> String {
    let mut out = String::new();
    for (_, name) in roster.iter() {
        out.push_str(name);
        out.push('\n');
    }
    out
}

/// Row range of one document inside a merged matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRange {
    pub file_stem: String,
    pub rows: Range<usize>,
}

/// The merged matrix for one whole task level.
#[derive(Debug)]
pub struct MatrixBatch {
    csv: String,
    ranges: Vec<BatchRange>,
}

impl MatrixBatch {
    pub fn merge<'a>(matrices: impl IntoIterator<Item = &'a DocumentMatrix>) -> MatrixBatch {
        let mut csv = String::new();
        let mut ranges = Vec::new();
        let mut next_row = 0;
        for matrix in matrices {
            let start = next_row;
            next_row += matrix.token_count();
            csv.push_str(&matrix.to_csv());
            ranges.push(BatchRange {
                file_stem: matrix.file_stem().to_string(),
                rows: start..next_row,
            });
        }
        MatrixBatch { csv, ranges }
    }

    pub fn csv(&self) -> &str {
        &self.csv
    }

    pub fn ranges(&self) -> &[BatchRange] {
        &self.ranges
    }

    /// Total token rows across all merged documents.
    pub fn row_count(&self) -> usize {
        self.ranges.last().map(|range| range.rows.end).unwrap_or(0)
    }

    /// Cut a per-row sequence (one prediction per merged row) back into
    /// per-document slices, in merge order.
    pub fn split<'a, T>(&self, items: &'a [T]) -> MaceResult<Vec<(&str, &'a [T])>> {
        let expected = self.row_count();
        if items.len() != expected {
            return Err(MaceError::SequenceLengthMismatch {
                expected,
                got: items.len(),
            });
        }
        Ok(self
            .ranges
            .iter()
            .map(|range| {
                (
                    range.file_stem.as_str(),
                    &items[range.rows.start..range.rows.end],
                )
            })
            .collect())
    }
}

/// Write the model's input files into `dir`: one CSV per matrix, the
/// worker order, and the merged matrix. Returns the merge bookkeeping
/// needed to split predictions later.
pub fn write_inputs(
    dir: &Path,
    matrices: &[DocumentMatrix],
    roster: &FrozenRoster,
) -> MaceResult<MatrixBatch> {
    fs::create_dir_all(dir).map_err(|e| MaceError::Write {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;
    for matrix in matrices {
        let path = dir.join(format!("{}.csv", matrix.file_stem()));
        write_file(&path, &matrix.to_csv())?;
    }
    write_file(&dir.join(WORKER_ORDER_FILE), &worker_order(roster))?;
    let batch = MatrixBatch::merge(matrices);
    write_file(&dir.join(MERGED_INPUT_FILE), batch.csv())?;
    Ok(batch)
}

fn write_file(path: &Path, content: &str) -> MaceResult<()> {
    fs::write(path, content).map_err(|e| MaceError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crowd_anno::{
        tokenize, RaterRoster, Stance, TaskKind, TokenSpan, WorkerAnnotation,
    };

    fn roster() -> FrozenRoster {
        let mut roster = RaterRoster::new();
        roster.observe("w1");
        roster.observe("w2");
        roster.observe("w3");
        roster.freeze()
    }

    fn claim_doc() -> AnnotatedDocument {
        AnnotatedDocument::new(
            "B0001",
            TaskKind::Claim,
            tokenize("Great battery life"),
            vec![
                WorkerAnnotation::span("w1", Some(Stance::Support), TokenSpan::new(0, 1)),
                WorkerAnnotation::comment("w2", None, "no claims here"),
            ],
        )
    }

    fn premise_doc() -> AnnotatedDocument {
        AnnotatedDocument::new(
            "B0002",
            TaskKind::Premise,
            tokenize("The cable broke"),
            vec![WorkerAnnotation::span(
                "w3",
                Some(Stance::Attack),
                TokenSpan::new(1, 2),
            )],
        )
    }

    #[test]
    fn attempting_workers_fill_columns_and_absent_workers_stay_empty() {
        let matrix = DocumentMatrix::from_document(&claim_doc(), &roster());

        assert_eq!(matrix.file_stem(), "B0001");
        assert_eq!(matrix.to_csv(), "B-S,O,\nI-S,O,\nO,O,\n");
    }

    #[test]
    fn premise_matrices_carry_the_hit_in_their_stem() {
        let matrix = DocumentMatrix::for_premise_hit(&premise_doc(), &roster(), 2);

        assert_eq!(matrix.file_stem(), "B0002-2");
        assert_eq!(matrix.to_csv(), ",,O\n,,B-A\n,,I-A\n");
    }

    #[test]
    fn later_spans_overwrite_earlier_cells() {
        let doc = AnnotatedDocument::new(
            "B0003",
            TaskKind::Claim,
            tokenize("Great battery life"),
            vec![
                WorkerAnnotation::span("w1", Some(Stance::Support), TokenSpan::new(0, 2)),
                WorkerAnnotation::span("w1", Some(Stance::Attack), TokenSpan::new(1, 2)),
            ],
        );
        let matrix = DocumentMatrix::from_document(&doc, &roster());

        assert_eq!(matrix.to_csv(), "B-S,,\nB-A,,\nI-A,,\n");
    }

    #[test]
    fn major_claim_tags_are_plain_and_spans_clamp_to_the_document() {
        let doc = AnnotatedDocument::new(
            "B0004",
            TaskKind::MajorClaim,
            tokenize("Great battery life"),
            vec![WorkerAnnotation::span("w2", None, TokenSpan::new(1, 5))],
        );
        let matrix = DocumentMatrix::from_document(&doc, &roster());

        assert_eq!(matrix.to_csv(), ",O,\n,B,\n,I,\n");
    }

    #[test]
    fn worker_order_lists_the_roster_one_per_line() {
        assert_eq!(worker_order(&roster()), "w1\nw2\nw3\n");
    }

    #[test]
    fn merged_batches_split_predictions_back_per_document() {
        let matrices = vec![
            DocumentMatrix::from_document(&claim_doc(), &roster()),
            DocumentMatrix::for_premise_hit(&premise_doc(), &roster(), 2),
        ];
        let batch = MatrixBatch::merge(&matrices);

        assert_eq!(batch.csv(), format!("{}{}", matrices[0].to_csv(), matrices[1].to_csv()));
        assert_eq!(
            batch.ranges(),
            &[
                BatchRange {
                    file_stem: "B0001".to_string(),
                    rows: 0..3,
                },
                BatchRange {
                    file_stem: "B0002-2".to_string(),
                    rows: 3..6,
                },
            ]
        );

        let labels = ["a", "b", "c", "d", "e", "f"];
        let parts = batch.split(&labels).unwrap();
        assert_eq!(parts[0], ("B0001", &labels[0..3]));
        assert_eq!(parts[1], ("B0002-2", &labels[3..6]));
    }

    #[test]
    fn split_rejects_a_prediction_count_that_does_not_cover_the_batch() {
        let matrices = vec![DocumentMatrix::from_document(&claim_doc(), &roster())];
        let batch = MatrixBatch::merge(&matrices);

        let err = batch.split(&[0u8, 1]).unwrap_err();
        assert!(matches!(
            err,
            MaceError::SequenceLengthMismatch {
                expected: 3,
                got: 2,
            }
        ));
    }
}
