//! Token taxonomy shared by tokenizers and the highlight engine.

/// Keyword subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordKind {
    /// Reserved words such as `def`, `if`, `return`.
    Reserved,
    /// `True`, `False`, `None`.
    Constant,
    /// `import`, `from`.
    Namespace,
}

/// Name subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    /// Any other identifier.
    Plain,
    /// The name right after `def`.
    Function,
    /// The name right after `class`.
    Class,
    /// A builtin such as `print` or `len`.
    Builtin,
    /// `@decorator`, `@` included.
    Decorator,
}

/// String literal subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKind {
    /// `'...'`
    Single,
    /// `"..."`
    Double,
    /// `'''...'''` or `"""..."""`, possibly spanning lines.
    Triple,
}

/// Hierarchical token type.
///
/// A subtype is "in" its parent: `Keyword(KeywordKind::Constant)` is a keyword,
/// `Name(NameKind::Function)` is a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Plain text with no further meaning.
    Text,
    /// Spaces, tabs and line breaks.
    Whitespace,
    /// A keyword.
    Keyword(KeywordKind),
    /// An identifier.
    Name(NameKind),
    /// A string literal, prefix and quotes included.
    String(StringKind),
    /// A `#` comment up to the end of the line.
    Comment,
    /// A numeric literal.
    Number,
    /// An operator.
    Operator,
    /// Brackets, commas, colons and the like.
    Punctuation,
    /// A character the tokenizer does not recognise.
    Error,
}

impl TokenKind {
    /// Whether this is any kind of keyword.
    pub fn is_keyword(self) -> bool {
        matches!(self, Self::Keyword(_))
    }

    /// Whether this is any kind of string literal.
    pub fn is_string(self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Whether this is a comment.
    pub fn is_comment(self) -> bool {
        matches!(self, Self::Comment)
    }

    /// Whether this names a function being defined.
    pub fn is_function_name(self) -> bool {
        matches!(self, Self::Name(NameKind::Function))
    }
}

/// One token: its type and the exact source text it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token type.
    pub kind: TokenKind,
    /// Source text, unmodified.
    pub text: String,
}

impl Token {
    /// Create a token.
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Length of the token in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Splits source text into tokens.
///
/// Implementations must be lossless: concatenating the texts of the returned tokens yields the
/// input exactly.
pub trait Tokenizer {
    /// The error type returned by [`Tokenizer::tokenize`].
    type Error;

    /// Tokenize the whole of `text`.
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtypes_belong_to_parent() {
        assert!(TokenKind::Keyword(KeywordKind::Constant).is_keyword());
        assert!(TokenKind::String(StringKind::Triple).is_string());
        assert!(TokenKind::Name(NameKind::Function).is_function_name());
        assert!(!TokenKind::Name(NameKind::Class).is_function_name());
        assert!(!TokenKind::Name(NameKind::Builtin).is_keyword());
        assert!(!TokenKind::Comment.is_string());
    }
}
