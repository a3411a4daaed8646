//! BIO tags for span sequence labeling.
//!
//! Worker matrices and model predictions exchange spans as per-token BIO
//! tags: `B` opens a span, `I` continues it, `O` is outside any span.
//! Claim and premise tags carry a stance suffix (`B-S`, `I-A`); major-claim
//! tags are plain `B` and `I`. The tag is a real enum so the decoder's
//! rewrite rules can match on it exhaustively instead of poking at label
//! strings.

use std::fmt;

use crowd_anno::Stance;

/// One token's position relative to a span, with the span's stance when
/// the task distinguishes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BioTag {
    /// The token is outside every span.
    Outside,
    /// The token opens a span.
    Begin(Option<Stance>),
    /// The token continues the span opened to its left.
    Inside(Option<Stance>),
}

impl BioTag {
    /// Parse a matrix cell or prediction label. Returns `None` for
    /// anything outside the tag set.
    pub fn parse(label: &str) -> Option<BioTag> {
        match label {
            "O" => Some(BioTag::Outside),
            "B" => Some(BioTag::Begin(None)),
            "B-S" => Some(BioTag::Begin(Some(Stance::Support))),
            "B-A" => Some(BioTag::Begin(Some(Stance::Attack))),
            "I" => Some(BioTag::Inside(None)),
            "I-S" => Some(BioTag::Inside(Some(Stance::Support))),
            "I-A" => Some(BioTag::Inside(Some(Stance::Attack))),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BioTag::Outside => "O",
            BioTag::Begin(None) => "B",
            BioTag::Begin(Some(Stance::Support)) => "B-S",
            BioTag::Begin(Some(Stance::Attack)) => "B-A",
            BioTag::Inside(None) => "I",
            BioTag::Inside(Some(Stance::Support)) => "I-S",
            BioTag::Inside(Some(Stance::Attack)) => "I-A",
        }
    }

    /// The stance suffix, if the tag carries one.
    pub fn stance(&self) -> Option<Stance> {
        match self {
            BioTag::Outside => None,
            BioTag::Begin(stance) | BioTag::Inside(stance) => *stance,
        }
    }
}

impl fmt::Display for BioTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
