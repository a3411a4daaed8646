//! Krippendorff's unitizing alpha over a token continuum.
//!
//! A study collects the spans ("units") each rater marked on a shared
//! continuum of tokens. Observed disagreement compares every rater's units
//! against every other rater's units and gaps; expected disagreement averages
//! the same distance over all equiprobable placements of the pooled units.
//!
//! Agreement values are in `(-inf, 1.0]`. `1.0` means the raters drew
//! identical spans. Values at or below `0.0` mean the overlap is no better
//! than chance. When the coefficient has no defined value (fewer than two
//! raters, an empty continuum, or zero expected disagreement) the study
//! reports [`UNDEFINED`] instead of `NaN`.

/// Sentinel returned when the coefficient is not defined for a study.
///
/// Downstream consumers treat this as "no usable agreement signal"; it is
/// deliberately outside the `(0.0, 1.0]` range that any threshold can accept.
pub const UNDEFINED: f64 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Unit {
    rater: usize,
    begin: usize,
    length: usize,
}

impl Unit {
    fn end(&self) -> usize {
        self.begin + self.length
    }
}

/// A continuum section belonging to one rater: either one of their units or
/// a maximal stretch they left unannotated.
#[derive(Debug, Clone, Copy)]
struct Section {
    begin: usize,
    end: usize,
    gap: bool,
}

/// One unitizing study: a fixed number of raters marking spans on a fixed
/// continuum of tokens.
#[derive(Debug, Clone)]
pub struct UnitizingStudy {
    rater_count: usize,
    continuum_length: usize,
    units: Vec<Unit>,
}

impl UnitizingStudy {
    pub fn new(rater_count: usize, continuum_length: usize) -> Self {
        UnitizingStudy {
            rater_count,
            continuum_length,
            units: Vec::new(),
        }
    }

    /// Records that `rater` marked `length` tokens starting at token index
    /// `begin`. Zero-length units carry no information and are ignored.
    pub fn add_unit(&mut self, rater: usize, begin: usize, length: usize) {
        debug_assert!(rater < self.rater_count);
        debug_assert!(begin + length <= self.continuum_length);
        if length == 0 {
            return;
        }
        self.units.push(Unit {
            rater,
            begin,
            length,
        });
    }

    pub fn rater_count(&self) -> usize {
        self.rater_count
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Raters that placed at least one unit. Raters counted in
    /// [`UnitizingStudy::new`] but absent here contribute gap sections only.
    pub fn contributing_raters(&self) -> usize {
        let mut seen = Vec::new();
        for unit in &self.units {
            if !seen.contains(&unit.rater) {
                seen.push(unit.rater);
            }
        }
        seen.len()
    }

    /// Krippendorff's unitizing alpha, or [`UNDEFINED`] when the study has
    /// fewer than two raters, fewer than two raters with units, an empty
    /// continuum, or no expected disagreement to normalize by.
    pub fn alpha(&self) -> f64 {
        if self.rater_count < 2 || self.continuum_length == 0 {
            return UNDEFINED;
        }
        if self.contributing_raters() < 2 {
            return UNDEFINED;
        }
        let expected = self.expected_disagreement();
        if expected == 0.0 {
            return UNDEFINED;
        }
        1.0 - self.observed_disagreement() / expected
    }

    /// Mean squared distance between each rater's units and every other
    /// rater's sections, normalized by `m * (m - 1) * len^2`.
    pub fn observed_disagreement(&self) -> f64 {
        let m = self.rater_count;
        let ell = self.continuum_length;
        if m < 2 || ell == 0 {
            return 0.0;
        }
        let sections: Vec<Vec<Section>> = (0..m).map(|rater| self.sections_of(rater)).collect();
        let mut total = 0.0;
        for unit in &self.units {
            for (rater, rater_sections) in sections.iter().enumerate() {
                if rater == unit.rater {
                    continue;
                }
                for section in rater_sections {
                    total += section_distance(unit, section);
                }
            }
        }
        total / ((m * (m - 1)) as f64 * (ell * ell) as f64)
    }

    /// Mean squared distance between ordered pairs of pooled units, averaged
    /// over all placements the continuum admits for each pair, normalized by
    /// `n * (n - 1) * len^2`.
    pub fn expected_disagreement(&self) -> f64 {
        let n = self.units.len();
        let ell = self.continuum_length;
        if n < 2 || ell == 0 {
            return 0.0;
        }
        let mut total = 0.0;
        for (i, u) in self.units.iter().enumerate() {
            for (j, v) in self.units.iter().enumerate() {
                if i != j {
                    total += expected_pair_distance(u.length, v.length, ell);
                }
            }
        }
        total / ((n * (n - 1)) as f64 * (ell * ell) as f64)
    }

    /// The units of `rater` plus the maximal gaps between them. Units of the
    /// same rater may overlap; gaps are computed against their union.
    fn sections_of(&self, rater: usize) -> Vec<Section> {
        let mut spans: Vec<(usize, usize)> = self
            .units
            .iter()
            .filter(|u| u.rater == rater)
            .map(|u| (u.begin, u.end()))
            .collect();
        spans.sort_unstable();

        let mut sections: Vec<Section> = spans
            .iter()
            .map(|&(begin, end)| Section {
                begin,
                end,
                gap: false,
            })
            .collect();

        let mut cursor = 0;
        for &(begin, end) in &spans {
            if begin > cursor {
                sections.push(Section {
                    begin: cursor,
                    end: begin,
                    gap: true,
                });
            }
            cursor = cursor.max(end);
        }
        if cursor < self.continuum_length {
            sections.push(Section {
                begin: cursor,
                end: self.continuum_length,
                gap: true,
            });
        }
        sections
    }
}

/// Squared distance between one rater's unit and another rater's section.
///
/// Overlapping units differ by their begin and end offsets; a unit lying
/// wholly inside the other rater's gap counts its full squared length;
/// everything else contributes nothing.
fn section_distance(unit: &Unit, section: &Section) -> f64 {
    let b_u = unit.begin as i64;
    let e_u = unit.end() as i64;
    let b_v = section.begin as i64;
    let e_v = section.end as i64;
    if section.gap {
        if b_v <= b_u && e_u <= e_v {
            (unit.length * unit.length) as f64
        } else {
            0.0
        }
    } else if b_v < e_u && b_u < e_v {
        let begin_diff = b_u - b_v;
        let end_diff = e_u - e_v;
        (begin_diff * begin_diff + end_diff * end_diff) as f64
    } else {
        0.0
    }
}

/// Expected squared distance between a unit of length `a` and one of length
/// `c`, averaged over every placement of both on a continuum of `ell` tokens.
///
/// A unit of length `x` has `ell - x + 1` placements. The placements overlap
/// exactly when the begin offset difference `d` lies in `-(a-1)..=(c-1)`; the
/// number of pairs realizing a given `d` is
/// `min(ell - a, ell - c + d) - max(0, d) + 1` (clamped at zero) and each
/// contributes `d^2 + (d + a - c)^2`. All remaining pairs are disjoint, which
/// for the measured unit reads as length `a` against a gap.
fn expected_pair_distance(a: usize, c: usize, ell: usize) -> f64 {
    let placements_u = (ell - a + 1) as f64;
    let placements_v = (ell - c + 1) as f64;
    let mut overlapping_pairs = 0.0;
    let mut overlap_total = 0.0;
    let shift = a as i64 - c as i64;
    for d in -(a as i64 - 1)..=(c as i64 - 1) {
        let lo = d.max(0);
        let hi = ((ell - a) as i64).min((ell - c) as i64 + d);
        if hi < lo {
            continue;
        }
        let count = (hi - lo + 1) as f64;
        let distance = (d * d + (d + shift) * (d + shift)) as f64;
        overlapping_pairs += count;
        overlap_total += count * distance;
    }
    let disjoint_pairs = placements_u * placements_v - overlapping_pairs;
    (overlap_total + (a * a) as f64 * disjoint_pairs) / (placements_u * placements_v)
}
