//! Percentage agreement on the yes/no question "did this rater mark a span?".

/// Share of raters that produced the annotation under consideration, out of
/// all raters that attempted the task. An empty task yields `0.0`.
pub fn binary_agreement(in_favor: usize, attempting: usize) -> f64 {
    if attempting == 0 {
        return 0.0;
    }
    in_favor as f64 / attempting as f64
}
