/// A contiguous token range within one document.
///
/// Both indices are inclusive and refer to token positions (not character
/// positions), so a single-token span has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenSpan {
    /// Inclusive start token index
    pub start: usize,
    /// Inclusive end token index
    pub end: usize,
}

impl TokenSpan {
    /// Create a new span. `start` must not exceed `end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} exceeds end {}", start, end);
        TokenSpan { start, end }
    }

    /// Number of tokens covered.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, token_idx: usize) -> bool {
        self.start <= token_idx && token_idx <= self.end
    }

    /// Whether the two spans share at least one token.
    ///
    /// Spans that merely touch (one ends exactly where the other starts, on
    /// adjacent tokens) do not overlap.
    pub fn overlaps(&self, other: &TokenSpan) -> bool {
        !(other.end < self.start || other.start > self.end)
    }
}

impl std::fmt::Display for TokenSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}..={}]", self.start, self.end)
    }
}
