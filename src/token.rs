use std::collections::HashMap;

use crate::span::TokenSpan;

/// A single token of a source document.
///
/// Tokens carry a stable string id (assigned at tokenization time) and the
/// character offsets of the token text within the original document. All
/// span arithmetic in this workspace happens over token *indices*; the
/// character offsets exist so annotations collected against raw text can be
/// resolved back onto the token sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    id: String,
    text: String,
    begin: usize,
    end: usize,
}

impl Token {
    pub fn new(id: impl Into<String>, text: impl Into<String>, begin: usize, end: usize) -> Self {
        Token {
            id: id.into(),
            text: text.into(),
            begin,
            end,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Character offset of the first character of this token.
    pub fn begin(&self) -> usize {
        self.begin
    }

    /// Character offset one past the last character of this token.
    pub fn end(&self) -> usize {
        self.end
    }
}

/// The ordered token list of one document.
///
/// The sequence fixes the continuum that agreement measures work over: token
/// index 0 is the first position, `len() - 1` the last. Lookups by token id
/// are backed by a map built once at construction.
#[derive(Debug, Clone)]
pub struct TokenSequence {
    tokens: Vec<Token>,
    index_by_id: HashMap<String, usize>,
}

impl TokenSequence {
    /// Build a sequence from tokens already in document order.
    ///
    /// Token ids are expected to be unique; if an id repeats, id lookups
    /// resolve to its first occurrence.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut index_by_id = HashMap::with_capacity(tokens.len());
        for (idx, token) in tokens.iter().enumerate() {
            index_by_id.entry(token.id.clone()).or_insert(idx);
        }
        TokenSequence {
            tokens,
            index_by_id,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// Token index for a token id, if the id belongs to this document.
    pub fn index_of(&self, token_id: &str) -> Option<usize> {
        self.index_by_id.get(token_id).copied()
    }

    /// Token index of the token starting at the given character offset.
    ///
    /// Document order keeps the offset columns sorted, so this is a binary
    /// search.
    pub fn index_at_begin(&self, begin: usize) -> Option<usize> {
        self.tokens.binary_search_by(|t| t.begin.cmp(&begin)).ok()
    }

    /// Token index of the token ending at the given character offset.
    pub fn index_at_end(&self, end: usize) -> Option<usize> {
        self.tokens.binary_search_by(|t| t.end.cmp(&end)).ok()
    }

    /// Resolve a set of token ids to the smallest [`TokenSpan`] covering all
    /// of them.
    ///
    /// Ids that do not belong to this document are ignored. Returns `None`
    /// when no id resolves, which is how comment-only submissions surface.
    pub fn span_for_ids<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> Option<TokenSpan> {
        let mut bounds: Option<(usize, usize)> = None;
        for id in ids {
            if let Some(idx) = self.index_of(id) {
                bounds = Some(match bounds {
                    None => (idx, idx),
                    Some((lo, hi)) => (lo.min(idx), hi.max(idx)),
                });
            }
        }
        bounds.map(|(lo, hi)| TokenSpan::new(lo, hi))
    }

    /// The token texts covered by `span`, joined with single spaces.
    ///
    /// Out-of-range portions of the span are ignored.
    pub fn covered_text(&self, span: TokenSpan) -> String {
        let mut out = String::new();
        for token in self
            .tokens
            .iter()
            .take(span.end + 1)
            .skip(span.start.min(self.tokens.len()))
        {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&token.text);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq() -> TokenSequence {
        TokenSequence::new(vec![
            Token::new("token_0", "This", 0, 4),
            Token::new("token_1", "charger", 5, 12),
            Token::new("token_2", "died", 13, 17),
            Token::new("token_3", "fast", 18, 22),
        ])
    }

    #[test]
    fn id_lookup_resolves_to_index() {
        let tokens = seq();
        assert_eq!(tokens.index_of("token_0"), Some(0));
        assert_eq!(tokens.index_of("token_3"), Some(3));
        assert_eq!(tokens.index_of("token_9"), None);
    }

    #[test]
    fn offset_lookups() {
        let tokens = seq();
        assert_eq!(tokens.index_at_begin(5), Some(1));
        assert_eq!(tokens.index_at_end(17), Some(2));
        assert_eq!(tokens.index_at_begin(6), None);
    }

    #[test]
    fn span_for_ids_covers_min_to_max() {
        let tokens = seq();
        let span = tokens.span_for_ids(vec!["token_2", "token_0"]);
        assert_eq!(span, Some(TokenSpan::new(0, 2)));
    }

    #[test]
    fn span_for_ids_skips_unknown_ids() {
        let tokens = seq();
        let span = tokens.span_for_ids(vec!["bogus", "token_1"]);
        assert_eq!(span, Some(TokenSpan::new(1, 1)));
        assert_eq!(tokens.span_for_ids(vec!["bogus"]), None);
    }

    #[test]
    fn covered_text_joins_tokens() {
        let tokens = seq();
        assert_eq!(tokens.covered_text(TokenSpan::new(1, 2)), "charger died");
        assert_eq!(
            tokens.covered_text(TokenSpan::new(0, 3)),
            "This charger died fast"
        );
    }

    #[test]
    fn duplicate_ids_resolve_to_first_occurrence() {
        let tokens = TokenSequence::new(vec![
            Token::new("dup", "a", 0, 1),
            Token::new("dup", "b", 2, 3),
        ]);
        assert_eq!(tokens.index_of("dup"), Some(0));
    }
}
