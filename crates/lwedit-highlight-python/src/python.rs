//! Regex-based Python tokenizer.
//!
//! Rules are tried in order at the current position; the first one that matches produces the
//! next token. Every rule is anchored with `\A`, so a rule never skips input. When no rule
//! matches, a single character is emitted as [`TokenKind::Error`], which keeps the output
//! lossless for any input.

use crate::token::{KeywordKind, NameKind, StringKind, Token, TokenKind, Tokenizer};
use regex::Regex;
use std::convert::Infallible;

const STRING_PREFIX: &str = r"(?i:rb|br|fr|rf|r|b|u|f)?";

const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "global", "if", "in", "is", "lambda", "nonlocal", "not",
    "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

const CONSTANTS: &[&str] = &["True", "False", "None"];

const NAMESPACE_KEYWORDS: &[&str] = &["import", "from"];

const BUILTINS: &[&str] = &[
    "abs", "all", "any", "ascii", "bin", "bool", "breakpoint", "bytearray", "bytes", "callable",
    "chr", "classmethod", "compile", "complex", "delattr", "dict", "dir", "divmod", "enumerate",
    "eval", "exec", "filter", "float", "format", "frozenset", "getattr", "globals", "hasattr",
    "hash", "help", "hex", "id", "input", "int", "isinstance", "issubclass", "iter", "len",
    "list", "locals", "map", "max", "memoryview", "min", "next", "object", "oct", "open", "ord",
    "pow", "print", "property", "range", "repr", "reversed", "round", "set", "setattr", "slice",
    "sorted", "staticmethod", "str", "sum", "super", "tuple", "type", "vars", "zip",
];

/// What a rule's match becomes.
#[derive(Debug, Clone, Copy)]
enum Rule {
    Fixed(TokenKind),
    /// An identifier, classified against the keyword and builtin tables.
    Word,
}

#[derive(Debug, Clone)]
struct LexRule {
    regex: Regex,
    rule: Rule,
}

impl LexRule {
    fn new(pattern: &str, rule: Rule) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(&format!(r"\A(?:{pattern})"))?,
            rule,
        })
    }
}

/// Name expected after `def` / `class`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Nothing,
    Function,
    Class,
}

/// Tokenizer for Python source.
#[derive(Debug, Clone)]
pub struct PythonLexer {
    rules: Vec<LexRule>,
}

impl PythonLexer {
    /// Compile the rule set.
    pub fn new() -> Result<Self, regex::Error> {
        let triple_single = format!(r"{STRING_PREFIX}'''(?:\\(?s:.)?|[^\\])*?(?:'''|\z)");
        let triple_double = format!(r#"{STRING_PREFIX}"""(?:\\(?s:.)?|[^\\])*?(?:"""|\z)"#);
        let single = format!(r"{STRING_PREFIX}'(?:\\(?:\r\n|(?s:.))|[^\\'\r\n])*\\?'?");
        let double = format!(r#"{STRING_PREFIX}"(?:\\(?:\r\n|(?s:.))|[^\\"\r\n])*\\?"?"#);

        let rules = vec![
            LexRule::new(r"\s+", Rule::Fixed(TokenKind::Whitespace))?,
            LexRule::new(r"\\\r?\n", Rule::Fixed(TokenKind::Text))?,
            LexRule::new(r"#[^\r\n]*", Rule::Fixed(TokenKind::Comment))?,
            LexRule::new(&triple_single, Rule::Fixed(TokenKind::String(StringKind::Triple)))?,
            LexRule::new(&triple_double, Rule::Fixed(TokenKind::String(StringKind::Triple)))?,
            LexRule::new(&single, Rule::Fixed(TokenKind::String(StringKind::Single)))?,
            LexRule::new(&double, Rule::Fixed(TokenKind::String(StringKind::Double)))?,
            LexRule::new(
                r"0[xX](?:_?[0-9a-fA-F])+|0[oO](?:_?[0-7])+|0[bB](?:_?[01])+|(?:(?:\d(?:_?\d)*)?\.\d(?:_?\d)*|\d(?:_?\d)*\.?)(?:[eE][+-]?\d(?:_?\d)*)?[jJ]?",
                Rule::Fixed(TokenKind::Number),
            )?,
            LexRule::new(
                r"@[^\W\d]\w*(?:\.[^\W\d]\w*)*",
                Rule::Fixed(TokenKind::Name(NameKind::Decorator)),
            )?,
            LexRule::new(r"[^\W\d]\w*", Rule::Word)?,
            LexRule::new(
                r"\*\*=?|//=?|>>=?|<<=?|->|:=|[-+*/%&|^@<>=!]=|[-+*/%&|^~<>=@]",
                Rule::Fixed(TokenKind::Operator),
            )?,
            LexRule::new(r"[()\[\]{},:;.]", Rule::Fixed(TokenKind::Punctuation))?,
        ];

        Ok(Self { rules })
    }

    fn next_token(&self, rest: &str, pending: Pending) -> (TokenKind, usize) {
        for lex_rule in &self.rules {
            let Some(m) = lex_rule.regex.find(rest) else {
                continue;
            };
            if m.end() == 0 {
                continue;
            }

            let kind = match lex_rule.rule {
                Rule::Fixed(kind) => kind,
                Rule::Word => classify_word(m.as_str(), pending),
            };
            return (kind, m.end());
        }

        let len = rest.chars().next().map_or(rest.len(), char::len_utf8);
        (TokenKind::Error, len)
    }
}

fn classify_word(word: &str, pending: Pending) -> TokenKind {
    if CONSTANTS.contains(&word) {
        return TokenKind::Keyword(KeywordKind::Constant);
    }
    if NAMESPACE_KEYWORDS.contains(&word) {
        return TokenKind::Keyword(KeywordKind::Namespace);
    }
    if KEYWORDS.contains(&word) {
        return TokenKind::Keyword(KeywordKind::Reserved);
    }

    match pending {
        Pending::Function => TokenKind::Name(NameKind::Function),
        Pending::Class => TokenKind::Name(NameKind::Class),
        Pending::Nothing if BUILTINS.contains(&word) => TokenKind::Name(NameKind::Builtin),
        Pending::Nothing => TokenKind::Name(NameKind::Plain),
    }
}

impl Tokenizer for PythonLexer {
    type Error = Infallible;

    fn tokenize(&self, text: &str) -> Result<Vec<Token>, Self::Error> {
        let mut tokens = Vec::new();
        let mut pending = Pending::Nothing;
        let mut pos = 0;

        while pos < text.len() {
            let rest = &text[pos..];
            let (kind, len) = self.next_token(rest, pending);
            let token_text = &rest[..len];

            pending = match kind {
                TokenKind::Whitespace => pending,
                TokenKind::Keyword(_) if token_text == "def" => Pending::Function,
                TokenKind::Keyword(_) if token_text == "class" => Pending::Class,
                _ => Pending::Nothing,
            };

            tokens.push(Token::new(kind, token_text));
            pos += len;
        }

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lex(text: &str) -> Vec<(TokenKind, String)> {
        let lexer = PythonLexer::new().unwrap();
        let Ok(tokens) = lexer.tokenize(text);
        tokens.into_iter().map(|t| (t.kind, t.text)).collect()
    }

    fn significant(text: &str) -> Vec<(TokenKind, String)> {
        lex(text)
            .into_iter()
            .filter(|(kind, _)| *kind != TokenKind::Whitespace)
            .collect()
    }

    fn tok(kind: TokenKind, text: &str) -> (TokenKind, String) {
        (kind, text.to_string())
    }

    #[test]
    fn test_def_names_function() {
        assert_eq!(
            significant("def f():\n    pass\n"),
            vec![
                tok(TokenKind::Keyword(KeywordKind::Reserved), "def"),
                tok(TokenKind::Name(NameKind::Function), "f"),
                tok(TokenKind::Punctuation, "("),
                tok(TokenKind::Punctuation, ")"),
                tok(TokenKind::Punctuation, ":"),
                tok(TokenKind::Keyword(KeywordKind::Reserved), "pass"),
            ]
        );
    }

    #[test]
    fn test_class_and_constants() {
        assert_eq!(
            significant("class Point: x = None"),
            vec![
                tok(TokenKind::Keyword(KeywordKind::Reserved), "class"),
                tok(TokenKind::Name(NameKind::Class), "Point"),
                tok(TokenKind::Punctuation, ":"),
                tok(TokenKind::Name(NameKind::Plain), "x"),
                tok(TokenKind::Operator, "="),
                tok(TokenKind::Keyword(KeywordKind::Constant), "None"),
            ]
        );
    }

    #[test]
    fn test_pending_name_is_cleared_by_other_tokens() {
        // `def` followed by a non-name does not turn a later name into a function name.
        let tokens = significant("def (g)");
        assert_eq!(tokens[2], tok(TokenKind::Name(NameKind::Plain), "g"));
    }

    #[test]
    fn test_string_prefixes_and_quotes() {
        assert_eq!(
            significant(r#"rb'\x00' F"{x}" 'it\'s'"#),
            vec![
                tok(TokenKind::String(StringKind::Single), r"rb'\x00'"),
                tok(TokenKind::String(StringKind::Double), r#"F"{x}""#),
                tok(TokenKind::String(StringKind::Single), r"'it\'s'"),
            ]
        );
    }

    #[test]
    fn test_triple_quoted_string_spans_lines() {
        let text = "x = \"\"\"doc\n'still' doc\"\"\"\ny";
        let tokens = significant(text);
        assert_eq!(
            tokens[2],
            tok(TokenKind::String(StringKind::Triple), "\"\"\"doc\n'still' doc\"\"\"")
        );
        assert_eq!(tokens[3], tok(TokenKind::Name(NameKind::Plain), "y"));
    }

    #[test]
    fn test_unterminated_strings() {
        let tokens = significant("s = 'open\nt = 1");
        assert_eq!(tokens[2], tok(TokenKind::String(StringKind::Single), "'open"));
        assert_eq!(tokens[3], tok(TokenKind::Name(NameKind::Plain), "t"));

        let tokens = significant("s = '''never\nclosed");
        assert_eq!(
            tokens[2],
            tok(TokenKind::String(StringKind::Triple), "'''never\nclosed")
        );
    }

    #[test]
    fn test_comment_runs_to_end_of_line() {
        assert_eq!(
            significant("x  # note 'quoted'\ny"),
            vec![
                tok(TokenKind::Name(NameKind::Plain), "x"),
                tok(TokenKind::Comment, "# note 'quoted'"),
                tok(TokenKind::Name(NameKind::Plain), "y"),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        for literal in ["0", "42", "1_000", "0xFF", "0o17", "0b1010", "3.14", ".5", "1e-3", "2j"] {
            assert_eq!(significant(literal), vec![tok(TokenKind::Number, literal)]);
        }
    }

    #[test]
    fn test_builtins_decorators_and_operators() {
        assert_eq!(
            significant("@functools.cache\nprint(a ** 2 != b)"),
            vec![
                tok(TokenKind::Name(NameKind::Decorator), "@functools.cache"),
                tok(TokenKind::Name(NameKind::Builtin), "print"),
                tok(TokenKind::Punctuation, "("),
                tok(TokenKind::Name(NameKind::Plain), "a"),
                tok(TokenKind::Operator, "**"),
                tok(TokenKind::Number, "2"),
                tok(TokenKind::Operator, "!="),
                tok(TokenKind::Name(NameKind::Plain), "b"),
                tok(TokenKind::Punctuation, ")"),
            ]
        );
    }

    #[test]
    fn test_unknown_characters_are_errors() {
        assert_eq!(
            significant("a ? $"),
            vec![
                tok(TokenKind::Name(NameKind::Plain), "a"),
                tok(TokenKind::Error, "?"),
                tok(TokenKind::Error, "$"),
            ]
        );
    }

    #[test]
    fn test_lossless_on_awkward_input() {
        let text = "déf ünïcode = 'x\\\n\"\"\"\r\n\t$ 1__2 \\";
        let joined: String = lex(text).into_iter().map(|(_, t)| t).collect();
        assert_eq!(joined, text);
    }
}
