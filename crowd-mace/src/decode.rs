//! Decoding model distributions back into token spans.
//!
//! Decoding runs in three steps. First a token-by-token class decision
//! turns each distribution into a single tag. Then a fixed, ordered list
//! of pairwise rewrites repairs the tag sequence per task flavor; each
//! rule is one left-to-right pass and later rules see earlier rules'
//! output. Finally maximal `B I*` runs become spans with a mean
//! per-token confidence.

use crowd_anno::{Stance, TaskKind, TokenSpan};

use crate::bio::BioTag;
use crate::errors::{MaceError, MaceResult};
use crate::predictions::TokenDistribution;

/// One token's decoded tag plus the probability mass that argued for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedToken {
    pub tag: BioTag,
    pub probability: f64,
}

/// Token-by-token class decision over aggregate masses.
///
/// `O` wins only against the combined span mass, so weak span evidence
/// still beats a moderate `O`. A `B` directly behind another `B` stays an
/// opener unless its mass falls below the probability that opened the
/// current run; then it demotes to `I` and the run closes behind it.
pub fn decode_tokens(distributions: &[TokenDistribution]) -> Vec<DecodedToken> {
    let mut decoded = Vec::with_capacity(distributions.len());
    // Probability of the B that opened the run currently being extended.
    let mut open_run: Option<f64> = None;
    for dist in distributions {
        let outside = dist.outside;
        let begin = dist.begin_mass();
        let inside = dist.inside_mass();
        let token = if outside > begin + inside {
            open_run = None;
            DecodedToken {
                tag: BioTag::Outside,
                probability: outside,
            }
        } else if begin > inside {
            match open_run {
                Some(opener) if begin < opener => {
                    open_run = None;
                    DecodedToken {
                        tag: BioTag::Inside(dist.inside_stance()),
                        probability: begin,
                    }
                }
                Some(_) => DecodedToken {
                    tag: BioTag::Begin(dist.begin_stance()),
                    probability: begin,
                },
                None => {
                    open_run = Some(begin);
                    DecodedToken {
                        tag: BioTag::Begin(dist.begin_stance()),
                        probability: begin,
                    }
                }
            }
        } else {
            open_run = None;
            DecodedToken {
                tag: BioTag::Inside(dist.inside_stance()),
                probability: begin + inside,
            }
        };
        decoded.push(token);
    }
    decoded
}

/// Decode one document's slice of the merged predictions.
///
/// The distribution count must equal the document's token count; a
/// mismatch fails this document and the batch moves on.
pub fn decode_document(
    distributions: &[TokenDistribution],
    token_count: usize,
    kind: TaskKind,
) -> MaceResult<Vec<DecodedToken>> {
    if distributions.len() != token_count {
        return Err(MaceError::SequenceLengthMismatch {
            expected: token_count,
            got: distributions.len(),
        });
    }
    let mut tokens = decode_tokens(distributions);
    match kind {
        TaskKind::MajorClaim => {}
        TaskKind::Claim => rewrite_claim(&mut tokens),
        TaskKind::Premise => rewrite_premise(&mut tokens),
    }
    Ok(tokens)
}

/// One left-to-right pass of a single pairwise rule. A match consumes
/// both tokens; only the tags change, recorded probabilities stay put.
fn rewrite_pass(
    tokens: &mut [DecodedToken],
    rule: impl Fn(BioTag, BioTag) -> Option<(BioTag, BioTag)>,
) {
    let mut idx = 0;
    while idx + 1 < tokens.len() {
        match rule(tokens[idx].tag, tokens[idx + 1].tag) {
            Some((left, right)) => {
                tokens[idx].tag = left;
                tokens[idx + 1].tag = right;
                idx += 2;
            }
            None => idx += 1,
        }
    }
}

/// Shared head of both rewrite tables: an `I` behind an `O` opens a fresh
/// span, and a stance flip between two `I` tokens starts a new span.
fn rewrite_stance_continuity(tokens: &mut [DecodedToken]) {
    use BioTag::{Begin, Inside, Outside};
    use Stance::{Attack, Support};
    rewrite_pass(tokens, |a, b| match (a, b) {
        (Outside, Inside(Some(Support))) => Some((Outside, Begin(Some(Support)))),
        _ => None,
    });
    rewrite_pass(tokens, |a, b| match (a, b) {
        (Outside, Inside(Some(Attack))) => Some((Outside, Begin(Some(Attack)))),
        _ => None,
    });
    rewrite_pass(tokens, |a, b| match (a, b) {
        (Inside(Some(Attack)), Inside(Some(Support))) => {
            Some((Inside(Some(Attack)), Begin(Some(Support))))
        }
        _ => None,
    });
    rewrite_pass(tokens, |a, b| match (a, b) {
        (Inside(Some(Support)), Inside(Some(Attack))) => {
            Some((Inside(Some(Support)), Begin(Some(Attack))))
        }
        _ => None,
    });
}

/// Claim repair: a stance flip right after an opener splits the run but
/// keeps the opener.
fn rewrite_claim(tokens: &mut [DecodedToken]) {
    use BioTag::{Begin, Inside};
    use Stance::{Attack, Support};
    rewrite_stance_continuity(tokens);
    rewrite_pass(tokens, |a, b| match (a, b) {
        (Begin(Some(Support)), Inside(Some(Attack))) => {
            Some((Begin(Some(Support)), Begin(Some(Attack))))
        }
        _ => None,
    });
    rewrite_pass(tokens, |a, b| match (a, b) {
        (Begin(Some(Attack)), Inside(Some(Support))) => {
            Some((Begin(Some(Attack)), Begin(Some(Support))))
        }
        _ => None,
    });
}

/// Premise repair: a stance flip right after an opener discards the
/// opener, and a span that never grew past its opener is dropped.
fn rewrite_premise(tokens: &mut [DecodedToken]) {
    use BioTag::{Begin, Inside, Outside};
    use Stance::{Attack, Support};
    rewrite_stance_continuity(tokens);
    rewrite_pass(tokens, |a, b| match (a, b) {
        (Begin(Some(Support)), Inside(Some(Attack))) => Some((Outside, Begin(Some(Attack)))),
        _ => None,
    });
    rewrite_pass(tokens, |a, b| match (a, b) {
        (Begin(Some(Attack)), Inside(Some(Support))) => Some((Outside, Begin(Some(Support)))),
        _ => None,
    });
    rewrite_pass(tokens, |a, b| match (a, b) {
        (Begin(Some(_)), Outside) => Some((Outside, Outside)),
        _ => None,
    });
}

/// One span assembled from a decoded run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedSpan {
    pub span: TokenSpan,
    pub stance: Option<Stance>,
    /// Mean recorded probability over the run's tokens.
    pub confidence: f64,
}

struct RunState {
    start: usize,
    end: usize,
    stance: Option<Stance>,
    total: f64,
}

/// Collect maximal `B I*` runs into spans.
///
/// An `I` with no open run is noise and is skipped; a run still open at
/// the document end is kept. Claim batches drop runs shorter than two
/// tokens, single-token claims are unanimously-rejected noise upstream.
pub fn extract_spans(tokens: &[DecodedToken], kind: TaskKind) -> Vec<DecodedSpan> {
    let mut spans = Vec::new();
    let mut open: Option<RunState> = None;
    for (idx, token) in tokens.iter().enumerate() {
        match token.tag {
            BioTag::Begin(stance) => {
                finish_run(open.take(), kind, &mut spans);
                open = Some(RunState {
                    start: idx,
                    end: idx,
                    stance,
                    total: token.probability,
                });
            }
            BioTag::Inside(_) => {
                if let Some(run) = open.as_mut() {
                    run.end = idx;
                    run.total += token.probability;
                }
            }
            BioTag::Outside => finish_run(open.take(), kind, &mut spans),
        }
    }
    finish_run(open.take(), kind, &mut spans);
    spans
}

fn finish_run(run: Option<RunState>, kind: TaskKind, spans: &mut Vec<DecodedSpan>) {
    let run = match run {
        Some(run) => run,
        None => return,
    };
    let len = run.end - run.start + 1;
    if kind == TaskKind::Claim && len < 2 {
        return;
    }
    spans.push(DecodedSpan {
        span: TokenSpan::new(run.start, run.end),
        stance: run.stance,
        confidence: run.total / len as f64,
    });
}

/// The winning major-claim span: highest mean confidence, first span wins
/// ties.
pub fn best_major_claim(spans: &[DecodedSpan]) -> Option<&DecodedSpan> {
    let mut best: Option<&DecodedSpan> = None;
    for span in spans {
        match best {
            Some(current) if span.confidence <= current.confidence => {}
            _ => best = Some(span),
        }
    }
    best
}

/// Index of the claim a premise span attaches to: the last claim starting
/// at or before the premise start, with `claims` ordered by start index.
/// A premise ahead of every claim attaches to the first one.
pub fn nearest_claim(claims: &[TokenSpan], premise: TokenSpan) -> Option<usize> {
    if claims.is_empty() {
        return None;
    }
    match claims.iter().rposition(|claim| claim.start <= premise.start) {
        Some(idx) => Some(idx),
        None => Some(0),
    }
}
