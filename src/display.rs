use std::fmt::Write as _;

use unicode_width::UnicodeWidthStr;

use crate::span::TokenSpan;
use crate::token::TokenSequence;

/// A labeled span queued for rendering.
struct IncludedSpan {
    span: TokenSpan,
    label: String,
}

/// Renders a token sequence with annotation spans underlined beneath it.
///
/// Used heavily by snapshot tests: the token texts are printed on one line
/// with two spaces of padding between tokens, and every included span adds a
/// `╰──╯ label` row that is aligned under the tokens it covers.
///
/// ```ignore
/// Great  battery  life  ,  dead  in  a  week
/// ╰─────────────────╯ w1 claim(support)
///                          ╰──────────────╯ w2 claim(attack)
/// ```
pub struct AnnotationDisplay<'a> {
    tokens: &'a TokenSequence,
    included: Vec<IncludedSpan>,
}

impl<'a> AnnotationDisplay<'a> {
    pub fn new(tokens: &'a TokenSequence) -> Self {
        AnnotationDisplay {
            tokens,
            included: Vec::new(),
        }
    }

    /// Queue a span for rendering under its covered tokens.
    pub fn include(&mut self, span: TokenSpan, label: impl Into<String>) {
        self.included.push(IncludedSpan {
            span,
            label: label.into(),
        });
    }

    /// Takes self
    pub fn with(mut self, span: TokenSpan, label: impl Into<String>) -> Self {
        self.include(span, label);
        self
    }
}

impl<'a> std::fmt::Display for AnnotationDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const SPACE_PADDING: usize = 2;
        let mut start_display_col = Vec::with_capacity(self.tokens.len());
        let mut end_display_col = Vec::with_capacity(self.tokens.len());

        // write opening display text
        let mut opening_line = String::new();
        {
            // for skipping padding at beginning
            let mut is_first = true;
            for token in self.tokens.iter() {
                if is_first {
                    is_first = false;
                } else {
                    opening_line.extend(std::iter::repeat(' ').take(SPACE_PADDING));
                }

                start_display_col.push(UnicodeWidthStr::width(&*opening_line));
                opening_line.push_str(token.text());
                end_display_col.push(UnicodeWidthStr::width(&*opening_line));
            }
        }

        f.write_str(&opening_line)?;

        for included in self.included.iter() {
            let start_col = match start_display_col.get(included.span.start) {
                Some(&col) => col,
                None => continue,
            };
            let end_col = match end_display_col.get(included.span.end) {
                Some(&col) => col,
                None => continue,
            };

            f.write_char('\n')?;
            for _ in 0..start_col {
                f.write_char(' ')?;
            }

            f.write_char('╰')?;
            for _ in (start_col + 1)..end_col.saturating_sub(1) {
                f.write_char('─')?;
            }
            if end_col - start_col > 1 {
                f.write_char('╯')?;
            }

            write!(f, " {}", included.label)?;
        }

        Ok(())
    }
}
