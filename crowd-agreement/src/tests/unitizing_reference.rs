//! Cross-checks the closed-form expected disagreement against a direct
//! enumeration of unit placements on small continua.

use crate::UnitizingStudy;

/// Expected disagreement by brute force: every ordered pair of pooled units
/// is averaged over every placement both units admit on the continuum.
/// Overlapping placements contribute the squared begin and end differences;
/// disjoint placements read as the measured unit against a gap and
/// contribute its squared length.
fn enumerated_expected_disagreement(lengths: &[usize], continuum: usize) -> f64 {
    let n = lengths.len();
    let mut total = 0.0;
    for (i, &a) in lengths.iter().enumerate() {
        for (j, &c) in lengths.iter().enumerate() {
            if i == j {
                continue;
            }
            let mut pair_total = 0.0;
            let mut placements = 0usize;
            for p in 0..=(continuum - a) {
                for q in 0..=(continuum - c) {
                    placements += 1;
                    let (b_u, e_u) = (p as i64, (p + a) as i64);
                    let (b_v, e_v) = (q as i64, (q + c) as i64);
                    if b_v < e_u && b_u < e_v {
                        let begin_diff = b_u - b_v;
                        let end_diff = e_u - e_v;
                        pair_total += (begin_diff * begin_diff + end_diff * end_diff) as f64;
                    } else {
                        pair_total += (a * a) as f64;
                    }
                }
            }
            total += pair_total / placements as f64;
        }
    }
    total / ((n * (n - 1)) as f64 * (continuum * continuum) as f64)
}

fn study_with_lengths(lengths: &[usize], continuum: usize) -> UnitizingStudy {
    let mut study = UnitizingStudy::new(lengths.len(), continuum);
    for (rater, &length) in lengths.iter().enumerate() {
        study.add_unit(rater, 0, length);
    }
    study
}

#[test]
fn closed_form_matches_placement_enumeration() {
    let cases: &[(usize, &[usize])] = &[
        (3, &[1, 2]),
        (5, &[2, 2, 3]),
        (6, &[3, 3]),
        (8, &[1, 1, 4]),
        (10, &[2, 5, 7, 1]),
        (4, &[4, 4]),
    ];
    for &(continuum, lengths) in cases {
        let study = study_with_lengths(lengths, continuum);
        let closed = study.expected_disagreement();
        let enumerated = enumerated_expected_disagreement(lengths, continuum);
        assert!(
            (closed - enumerated).abs() < 1e-9,
            "continuum {} lengths {:?}: closed form {} vs enumeration {}",
            continuum,
            lengths,
            closed,
            enumerated
        );
    }
}

#[test]
fn closer_spans_score_higher() {
    // Same span on both sides.
    let mut exact = UnitizingStudy::new(2, 6);
    exact.add_unit(0, 1, 3);
    exact.add_unit(1, 1, 3);

    // Shifted by one token.
    let mut partial = UnitizingStudy::new(2, 6);
    partial.add_unit(0, 1, 3);
    partial.add_unit(1, 2, 3);

    // No shared token at all.
    let mut disjoint = UnitizingStudy::new(2, 6);
    disjoint.add_unit(0, 0, 2);
    disjoint.add_unit(1, 4, 2);

    assert_eq!(exact.alpha(), 1.0);
    assert!((partial.alpha() - 15.0 / 31.0).abs() < 1e-9);
    assert!((disjoint.alpha() - (-0.5625)).abs() < 1e-9);
    assert!(exact.alpha() > partial.alpha());
    assert!(partial.alpha() > disjoint.alpha());
}

#[test]
fn unanimous_crowd_scores_one() {
    let mut study = UnitizingStudy::new(5, 40);
    for rater in 0..5 {
        study.add_unit(rater, 12, 7);
    }
    assert_eq!(study.observed_disagreement(), 0.0);
    assert_eq!(study.alpha(), 1.0);
}
