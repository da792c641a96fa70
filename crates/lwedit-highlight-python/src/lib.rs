//! `lwedit-highlight-python` - Python syntax highlighting for `lwedit-core`.
//!
//! A [`Tokenizer`] splits source text into typed [`Token`]s; [`PythonLexer`] is the regex-based
//! tokenizer for Python. [`HighlightEngine`] turns tokens into keyword / string / comment /
//! function-name spans, and [`PythonHighlightProcessor`] plugs the whole pipeline into
//! `lwedit-core`'s processing interface so every edit re-tags the buffer.
//!
//! ```rust
//! use lwedit_highlight_python::{HighlightCategory, HighlightEngine, PythonLexer};
//!
//! let engine = HighlightEngine::new(PythonLexer::new().unwrap());
//! let Ok(spans) = engine.highlight("def f():\n    pass\n");
//! assert_eq!(spans[0].category, HighlightCategory::Keyword);
//! assert_eq!(spans[1].category, HighlightCategory::FunctionName);
//! assert_eq!((spans[1].start, spans[1].end), (4, 5));
//! ```

pub mod engine;
pub mod processor;
pub mod python;
pub mod token;

pub use engine::{HighlightCategory, HighlightEngine, HighlightSpan};
pub use processor::{
    HighlightProcessor, HighlightStyles, PythonHighlightProcessor, STYLE_COMMENT, STYLE_FUNCTION,
    STYLE_KEYWORD, STYLE_STRING,
};
pub use python::PythonLexer;
pub use token::{KeywordKind, NameKind, StringKind, Token, TokenKind, Tokenizer};
