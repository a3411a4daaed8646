//! Tab-separated results-table parsing.
//!
//! Results exports carry one assignment per row under a tab-separated
//! header. Parsing projects each row onto the columns ingestion reads,
//! strips the export's quotation marks, silently drops rejected
//! assignments, and records a skip for every row too damaged to attribute
//! to a worker and document.

use std::collections::HashMap;
use std::fmt;

use crate::errors::{AmtError, AmtResult};

/// One accepted assignment row, projected onto the columns ingestion reads.
///
/// Rejected assignments never become rows; rejection is decided here so no
/// later stage has to re-check assignment status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsRow {
    /// 1-based line number in the results file.
    pub line: usize,
    pub hit_id: String,
    pub hit_type_id: String,
    pub worker_id: String,
    /// Raw `Answer.intext` cell; `"true"` when the worker marked tokens.
    pub in_text: String,
    /// Raw `Answer.tokens` cell, `None` when the row is truncated before it.
    pub tokens: Option<String>,
    /// HIT page path. Carries the document name and, for premise HITs, the
    /// HIT number.
    pub annotation: String,
    /// Free text the worker typed instead of marking tokens.
    pub text_input: String,
}

/// Why a row was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The row is truncated before this required column.
    MissingCell { column: &'static str },
    /// The cell under this column is empty where a value is required.
    EmptyCell { column: &'static str },
    /// The row names a premise HIT but its number cannot be read.
    UnparsableHitNumber,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingCell { column } => {
                write!(f, "row ends before column {:?}", column)
            }
            SkipReason::EmptyCell { column } => {
                write!(f, "column {:?} is empty", column)
            }
            SkipReason::UnparsableHitNumber => {
                write!(f, "premise HIT number is unreadable")
            }
        }
    }
}

/// One dropped row, kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSkip {
    pub line: usize,
    pub reason: SkipReason,
}

impl fmt::Display for RowSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// Everything the parser extracted from one results file.
#[derive(Debug)]
pub struct ParsedTable {
    pub rows: Vec<ResultsRow>,
    pub skipped: Vec<RowSkip>,
}

/// Parses a whole results file.
///
/// The header must contain `workerid`, `annotation`, and
/// `assignmentstatus`; every other column is optional and defaults to
/// empty. Columns outside the read set are ignored wholesale, as are blank
/// lines and cells beyond the header width.
pub fn parse_results_table(content: &str) -> AmtResult<ParsedTable> {
    let mut lines = content.lines();
    let header = match lines.next() {
        Some(line) => HeaderIndex::parse(line)?,
        None => return Err(AmtError::MissingHeader),
    };

    let mut rows = Vec::new();
    let mut skipped = Vec::new();
    for (offset, line) in lines.enumerate() {
        // Header is line 1; the first data row is line 2.
        let number = offset + 2;
        if line.is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split('\t').map(strip_quotation).collect();
        match header.project(number, &cells) {
            Ok(Some(row)) => rows.push(row),
            Ok(None) => {}
            Err(reason) => skipped.push(RowSkip {
                line: number,
                reason,
            }),
        }
    }
    Ok(ParsedTable { rows, skipped })
}

/// Column positions of the read set within one file's header.
struct HeaderIndex {
    hit_id: Option<usize>,
    hit_type_id: Option<usize>,
    worker_id: usize,
    in_text: Option<usize>,
    tokens: Option<usize>,
    annotation: usize,
    assignment_status: usize,
    text_input: Option<usize>,
    reject: Option<usize>,
}

impl HeaderIndex {
    fn parse(line: &str) -> AmtResult<HeaderIndex> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for (idx, cell) in line.split('\t').enumerate() {
            positions.insert(strip_quotation(cell), idx);
        }
        let optional = |name: &str| positions.get(name).copied();
        let required = |name: &str| {
            positions
                .get(name)
                .copied()
                .ok_or_else(|| AmtError::MissingColumn {
                    name: name.to_string(),
                })
        };
        Ok(HeaderIndex {
            hit_id: optional("hitid"),
            hit_type_id: optional("hittypeid"),
            worker_id: required("workerid")?,
            in_text: optional("Answer.intext"),
            tokens: optional("Answer.tokens"),
            annotation: required("annotation")?,
            assignment_status: required("assignmentstatus")?,
            text_input: optional("Answer.textinput"),
            reject: optional("reject"),
        })
    }

    /// Projects one row. `Ok(None)` is a rejected assignment.
    fn project(
        &self,
        line: usize,
        cells: &[&str],
    ) -> Result<Option<ResultsRow>, SkipReason> {
        let status = cells.get(self.assignment_status).ok_or(SkipReason::MissingCell {
            column: "assignmentstatus",
        })?;
        let reject = self
            .reject
            .and_then(|idx| cells.get(idx))
            .copied()
            .unwrap_or("");
        if *status == "Rejected" || !reject.is_empty() {
            return Ok(None);
        }

        let worker_id = self.required_cell(cells, self.worker_id, "workerid")?;
        let annotation = self.required_cell(cells, self.annotation, "annotation")?;
        let fetch = |slot: Option<usize>| {
            slot.and_then(|idx| cells.get(idx))
                .map(|cell| (*cell).to_string())
                .unwrap_or_default()
        };
        Ok(Some(ResultsRow {
            line,
            hit_id: fetch(self.hit_id),
            hit_type_id: fetch(self.hit_type_id),
            worker_id: worker_id.to_string(),
            in_text: fetch(self.in_text),
            tokens: self
                .tokens
                .and_then(|idx| cells.get(idx))
                .map(|cell| (*cell).to_string()),
            annotation: annotation.to_string(),
            text_input: fetch(self.text_input),
        }))
    }

    fn required_cell<'a>(
        &self,
        cells: &[&'a str],
        idx: usize,
        column: &'static str,
    ) -> Result<&'a str, SkipReason> {
        let cell = *cells
            .get(idx)
            .ok_or(SkipReason::MissingCell { column })?;
        if cell.is_empty() {
            return Err(SkipReason::EmptyCell { column });
        }
        Ok(cell)
    }
}

/// Strips the export's quotation wrapping.
///
/// Any cell containing a double quote loses its first and last character,
/// matching how the export writes quoted cells. Cells without quotes pass
/// through untouched.
pub(crate) fn strip_quotation(cell: &str) -> &str {
    if cell.contains('"') {
        let mut chars = cell.chars();
        chars.next();
        chars.next_back();
        chars.as_str()
    } else {
        cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "hitid\thittypeid\tannotation\tworkerid\tassignmentstatus\treject\tAnswer.intext\tAnswer.tokens\tAnswer.textinput";

    fn table(rows: &[&str]) -> String {
        let mut content = String::from(HEADER);
        for row in rows {
            content.push('\n');
            content.push_str(row);
        }
        content
    }

    #[test]
    fn accepted_rows_keep_the_read_columns() {
        let content = table(&[
            "H1\tT1\thit-majorclaim-review-B000.html\tw1\tApproved\t\ttrue\ttoken_0,token_1\t",
        ]);
        let parsed = parse_results_table(&content).unwrap();

        assert_eq!(parsed.rows.len(), 1);
        assert!(parsed.skipped.is_empty());
        let row = &parsed.rows[0];
        assert_eq!(row.line, 2);
        assert_eq!(row.hit_id, "H1");
        assert_eq!(row.hit_type_id, "T1");
        assert_eq!(row.worker_id, "w1");
        assert_eq!(row.in_text, "true");
        assert_eq!(row.tokens.as_deref(), Some("token_0,token_1"));
        assert_eq!(row.annotation, "hit-majorclaim-review-B000.html");
        assert_eq!(row.text_input, "");
    }

    #[test]
    fn rejected_assignments_are_dropped_silently() {
        let content = table(&[
            "H1\tT1\ta-review-B000.html\tw1\tRejected\t\ttrue\ttoken_0\t",
            "H1\tT1\ta-review-B000.html\tw2\tApproved\tspam\ttrue\ttoken_0\t",
            "H1\tT1\ta-review-B000.html\tw3\tApproved\t\ttrue\ttoken_0\t",
        ]);
        let parsed = parse_results_table(&content).unwrap();

        let workers: Vec<&str> = parsed.rows.iter().map(|r| r.worker_id.as_str()).collect();
        assert_eq!(workers, vec!["w3"]);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn truncated_rows_are_skipped_with_their_line_number() {
        let content = table(&[
            "H1\tT1\ta-review-B000.html\tw1\tApproved\t\ttrue\ttoken_0\t",
            "H1\tT1",
            "H1\tT1\ta-review-B000.html\t\tApproved\t\ttrue\ttoken_0\t",
        ]);
        let parsed = parse_results_table(&content).unwrap();

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(
            parsed.skipped,
            vec![
                RowSkip {
                    line: 3,
                    reason: SkipReason::MissingCell {
                        column: "assignmentstatus"
                    },
                },
                RowSkip {
                    line: 4,
                    reason: SkipReason::EmptyCell { column: "workerid" },
                },
            ]
        );
        insta::assert_snapshot!(
            parsed.skipped[0].to_string(),
            @r###"line 3: row ends before column "assignmentstatus""###
        );
        insta::assert_snapshot!(
            parsed.skipped[1].to_string(),
            @r###"line 4: column "workerid" is empty"###
        );
    }

    #[test]
    fn quoted_cells_are_unwrapped() {
        let content = table(&[
            "\"H1\"\tT1\t\"a-review-B000.html\"\t\"w1\"\tApproved\t\ttrue\t\"token_0,token_1\"\t\"no claim present\"",
        ]);
        let parsed = parse_results_table(&content).unwrap();

        let row = &parsed.rows[0];
        assert_eq!(row.hit_id, "H1");
        assert_eq!(row.worker_id, "w1");
        assert_eq!(row.annotation, "a-review-B000.html");
        assert_eq!(row.tokens.as_deref(), Some("token_0,token_1"));
        assert_eq!(row.text_input, "no claim present");
    }

    #[test]
    fn columns_outside_the_read_set_are_ignored() {
        let content = "workerid\tassignments\tannotation\tassignmentstatus\n\
                       w1\t37\ta-review-B000.html\tApproved";
        let parsed = parse_results_table(content).unwrap();

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].worker_id, "w1");
        assert_eq!(parsed.rows[0].hit_id, "");
        assert_eq!(parsed.rows[0].tokens, None);
    }

    #[test]
    fn blank_lines_are_not_rows() {
        let content = table(&[
            "",
            "H1\tT1\ta-review-B000.html\tw1\tApproved\t\ttrue\ttoken_0\t",
            "",
        ]);
        let parsed = parse_results_table(&content).unwrap();

        assert_eq!(parsed.rows.len(), 1);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn missing_required_column_is_a_file_error() {
        let err = parse_results_table("hitid\tannotation\tassignmentstatus\nH1\ta\tApproved")
            .unwrap_err();
        assert!(matches!(err, AmtError::MissingColumn { .. }));
        insta::assert_snapshot!(
            err.to_string(),
            @r###"results header is missing column "workerid""###
        );
    }

    #[test]
    fn empty_content_has_no_header() {
        assert!(matches!(
            parse_results_table(""),
            Err(AmtError::MissingHeader)
        ));
    }

    #[test]
    fn quotation_stripping_matches_the_export_contract() {
        assert_eq!(strip_quotation("\"B000063W1R\""), "B000063W1R");
        assert_eq!(strip_quotation("plain"), "plain");
        assert_eq!(strip_quotation("\""), "");
        assert_eq!(strip_quotation(""), "");
    }
}
