use std::fs;

use crowd_anno::{
    tokenize, AnnotatedDocument, FrozenRoster, RaterRoster, Stance, TaskKind, TokenSpan,
    WorkerAnnotation,
};

use crate::{
    decode_document, extract_spans, parse_competence, read_competence, read_predictions,
    write_inputs, CompetenceTable, DecodedSpan, DocumentMatrix, MaceError, MatrixBatch,
    MERGED_INPUT_FILE, WORKER_ORDER_FILE,
};

fn roster() -> FrozenRoster {
    let mut roster = RaterRoster::new();
    roster.observe("w1");
    roster.observe("w2");
    roster.observe("w3");
    roster.freeze()
}

fn matrices(roster: &FrozenRoster) -> Vec<DocumentMatrix> {
    let claim_doc = AnnotatedDocument::new(
        "B0001",
        TaskKind::Claim,
        tokenize("Great battery life"),
        vec![
            WorkerAnnotation::span("w1", Some(Stance::Support), TokenSpan::new(0, 1)),
            WorkerAnnotation::comment("w2", None, "no claims here"),
        ],
    );
    let premise_doc = AnnotatedDocument::new(
        "B0002",
        TaskKind::Premise,
        tokenize("The cable broke"),
        vec![WorkerAnnotation::span(
            "w3",
            Some(Stance::Attack),
            TokenSpan::new(1, 2),
        )],
    );
    vec![
        DocumentMatrix::from_document(&claim_doc, roster),
        DocumentMatrix::for_premise_hit(&premise_doc, roster, 2),
    ]
}

#[test]
fn model_files_round_trip_through_a_working_directory() {
    let roster = roster();
    let matrices = matrices(&roster);
    let dir = tempfile::tempdir().unwrap();

    let batch = write_inputs(dir.path(), &matrices, &roster).unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("B0001.csv")).unwrap(),
        "B-S,O,\nI-S,O,\nO,O,\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("B0002-2.csv")).unwrap(),
        ",,O\n,,B-A\n,,I-A\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join(WORKER_ORDER_FILE)).unwrap(),
        "w1\nw2\nw3\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join(MERGED_INPUT_FILE)).unwrap(),
        "B-S,O,\nI-S,O,\nO,O,\n,,O\n,,B-A\n,,I-A\n"
    );

    // The model answers over the merged rows; the batch bookkeeping cuts
    // its predictions back apart in merge order.
    let predictions = dir.path().join("predictions.csv");
    fs::write(
        &predictions,
        "B-S 0.7\tI-S 0.2\tO 0.1\nI-S 0.8\tO 0.1\nO 0.9\nO 0.9\nB-A 0.6\tI-A 0.3\nI-A 0.8\tO 0.1\n",
    )
    .unwrap();
    let distributions = read_predictions(&predictions).unwrap();
    assert_eq!(distributions.len(), 6);

    let parts = batch.split(&distributions).unwrap();
    assert_eq!(parts[0].0, "B0001");
    assert_eq!(parts[1].0, "B0002-2");

    let claim_tokens = decode_document(parts[0].1, 3, TaskKind::Claim).unwrap();
    assert_eq!(
        extract_spans(&claim_tokens, TaskKind::Claim),
        vec![DecodedSpan {
            span: TokenSpan::new(0, 1),
            stance: Some(Stance::Support),
            confidence: 0.75,
        }]
    );

    let premise_tokens = decode_document(parts[1].1, 3, TaskKind::Premise).unwrap();
    assert_eq!(
        extract_spans(&premise_tokens, TaskKind::Premise),
        vec![DecodedSpan {
            span: TokenSpan::new(1, 2),
            stance: Some(Stance::Attack),
            confidence: 0.7,
        }]
    );

    let competence = dir.path().join("competence.csv");
    fs::write(&competence, "0.9\t0.5\t0.7\n").unwrap();
    let run = read_competence(&competence, &roster).unwrap();
    assert_eq!(run, vec![0.9, 0.5, 0.7]);

    let mut table = CompetenceTable::new(&roster);
    table.add_run(run).unwrap();
    table.add_run(vec![0.7, 0.5, 0.9]).unwrap();
    let means = table.means();
    let competences: Vec<f64> = means.iter().map(|m| m.competence).collect();
    assert_eq!(competences, vec![0.8, 0.5, 0.8]);
    assert_eq!(means[0].worker, "w1");
}

#[test]
fn width_mismatches_are_fatal_for_the_batch() {
    let roster = roster();
    let batch = MatrixBatch::merge(&matrices(&roster));

    let short: Vec<u8> = vec![0; 5];
    let err = batch.split(&short).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"predictions cover 5 tokens, expected 6");

    let err = parse_competence("0.9\t0.5", &roster).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"expected 3 competence values, got 2");
}

#[test]
fn missing_model_output_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_predictions(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, MaceError::Load { .. }));

    let err = read_competence(&dir.path().join("absent.csv"), &roster()).unwrap_err();
    assert!(matches!(err, MaceError::Load { .. }));
}
