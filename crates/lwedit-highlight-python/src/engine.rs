//! Full-buffer highlighting: tokens in, tagged character ranges out.

use crate::token::{Token, TokenKind, Tokenizer};

/// The four tag categories a buffer is coloured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightCategory {
    /// Any keyword, constants included.
    Keyword,
    /// Any string literal.
    String,
    /// A comment.
    Comment,
    /// The name of a function being defined.
    FunctionName,
}

impl HighlightCategory {
    /// Category for a token kind, if it is tagged at all.
    pub fn of(kind: TokenKind) -> Option<Self> {
        if kind.is_keyword() {
            Some(Self::Keyword)
        } else if kind.is_string() {
            Some(Self::String)
        } else if kind.is_comment() {
            Some(Self::Comment)
        } else if kind.is_function_name() {
            Some(Self::FunctionName)
        } else {
            None
        }
    }
}

/// A tagged range of the buffer (char offsets, half-open).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    /// Tag category.
    pub category: HighlightCategory,
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

/// Runs a [`Tokenizer`] over a whole buffer and turns its tokens into [`HighlightSpan`]s.
///
/// Highlighting is unconditional and non-incremental: every call tokenizes the full text from
/// offset 0. Each span covers exactly one token; adjacent spans of the same category are not
/// merged.
#[derive(Debug, Clone)]
pub struct HighlightEngine<T> {
    tokenizer: T,
}

impl<T: Tokenizer> HighlightEngine<T> {
    /// Wrap a tokenizer.
    pub fn new(tokenizer: T) -> Self {
        Self { tokenizer }
    }

    /// The wrapped tokenizer.
    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Raw tokens for `text`.
    pub fn tokens(&self, text: &str) -> Result<Vec<Token>, T::Error> {
        self.tokenizer.tokenize(text)
    }

    /// Tagged ranges for `text`, in buffer order.
    pub fn highlight(&self, text: &str) -> Result<Vec<HighlightSpan>, T::Error> {
        let tokens = self.tokenizer.tokenize(text)?;
        let mut spans = Vec::new();
        let mut cursor = 0;

        for token in &tokens {
            let start = cursor;
            cursor += token.char_len();
            if let Some(category) = HighlightCategory::of(token.kind) {
                spans.push(HighlightSpan {
                    category,
                    start,
                    end: cursor,
                });
            }
        }

        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{KeywordKind, NameKind};
    use std::convert::Infallible;

    /// Splits on spaces; `kw`, `fn_` and `#...` words get tagged kinds.
    struct WordTokenizer;

    impl Tokenizer for WordTokenizer {
        type Error = Infallible;

        fn tokenize(&self, text: &str) -> Result<Vec<Token>, Self::Error> {
            Ok(text
                .split_inclusive(' ')
                .map(|word| {
                    let kind = match word.trim_end() {
                        "kw" => TokenKind::Keyword(KeywordKind::Reserved),
                        "fn_" => TokenKind::Name(NameKind::Function),
                        w if w.starts_with('#') => TokenKind::Comment,
                        _ => TokenKind::Text,
                    };
                    Token::new(kind, word)
                })
                .collect())
        }
    }

    struct FailingTokenizer;

    impl Tokenizer for FailingTokenizer {
        type Error = &'static str;

        fn tokenize(&self, _text: &str) -> Result<Vec<Token>, Self::Error> {
            Err("lexer unavailable")
        }
    }

    #[test]
    fn test_spans_follow_char_offsets() {
        let engine = HighlightEngine::new(WordTokenizer);
        let Ok(spans) = engine.highlight("é kw fn_ #x");
        assert_eq!(
            spans,
            vec![
                HighlightSpan {
                    category: HighlightCategory::Keyword,
                    start: 2,
                    end: 5,
                },
                HighlightSpan {
                    category: HighlightCategory::FunctionName,
                    start: 5,
                    end: 9,
                },
                HighlightSpan {
                    category: HighlightCategory::Comment,
                    start: 9,
                    end: 11,
                },
            ]
        );
    }

    #[test]
    fn test_adjacent_same_category_spans_stay_separate() {
        let engine = HighlightEngine::new(WordTokenizer);
        let Ok(spans) = engine.highlight("kw kw");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].end, spans[1].start);
    }

    #[test]
    fn test_tokenizer_errors_propagate() {
        let engine = HighlightEngine::new(FailingTokenizer);
        assert_eq!(engine.highlight("x"), Err("lexer unavailable"));
    }
}
