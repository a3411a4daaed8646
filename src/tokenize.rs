use unicode_segmentation::UnicodeSegmentation;

use crate::token::{Token, TokenSequence};

/// Tokenize raw text on Unicode word boundaries, dropping whitespace.
///
/// Production documents arrive already tokenized (ids and offsets come with
/// the upstream corpus); this tokenizer exists so tests and small tools can
/// build a [`TokenSequence`] straight from a string. Ids follow the
/// `token_<index>` scheme the rest of the workspace expects.
pub fn tokenize(text: &str) -> TokenSequence {
    let mut tokens = Vec::new();
    for (offset, word) in text.split_word_bound_indices() {
        if word.trim().is_empty() {
            continue;
        }
        let idx = tokens.len();
        tokens.push(Token::new(
            format!("token_{}", idx),
            word,
            offset,
            offset + word.len(),
        ));
    }
    TokenSequence::new(tokens)
}
