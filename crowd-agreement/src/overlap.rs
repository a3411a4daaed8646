//! Neighborhood grouping of spans that overlap each other.

use std::collections::BTreeSet;

use crowd_anno::TokenSpan;

/// Builds one group per span: the span itself plus every other span
/// overlapping it. Groups with the same member set are reported once.
///
/// Grouping is deliberately not transitive. For a chain `A-B-C` where only
/// the neighbors touch, `A`'s group excludes `C` and vice versa, while `B`'s
/// group holds all three. Spans overlapping nothing form singleton groups.
/// Members are indices into `spans`, seed first, then in input order.
pub fn overlap_groups(spans: &[TokenSpan]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut seen: Vec<BTreeSet<usize>> = Vec::new();
    for (seed, span) in spans.iter().enumerate() {
        let mut group = vec![seed];
        for (other, candidate) in spans.iter().enumerate() {
            if other != seed && span.overlaps(candidate) {
                group.push(other);
            }
        }
        let members: BTreeSet<usize> = group.iter().copied().collect();
        if !seen.contains(&members) {
            seen.push(members);
            groups.push(group);
        }
    }
    groups
}
