//! Session processor that keeps the syntax style layer in sync with the buffer.

use crate::engine::{HighlightCategory, HighlightEngine};
use crate::python::PythonLexer;
use crate::token::Tokenizer;
use lwedit_core::intervals::{Interval, StyleId, StyleLayerId};
use lwedit_core::processing::{DocumentProcessor, ProcessingEdit};
use lwedit_core::DocumentSession;
use tracing::trace;

/// Style id for keywords.
///
/// These are only identifiers. The UI/theme layer maps them to actual colors.
pub const STYLE_KEYWORD: StyleId = 0x0300_0001;
/// Style id for string literals.
pub const STYLE_STRING: StyleId = 0x0300_0002;
/// Style id for comments.
pub const STYLE_COMMENT: StyleId = 0x0300_0003;
/// Style id for function names.
pub const STYLE_FUNCTION: StyleId = 0x0300_0004;

/// Style id assigned to each [`HighlightCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightStyles {
    /// Keywords.
    pub keyword: StyleId,
    /// String literals.
    pub string: StyleId,
    /// Comments.
    pub comment: StyleId,
    /// Function names.
    pub function: StyleId,
}

impl Default for HighlightStyles {
    fn default() -> Self {
        Self {
            keyword: STYLE_KEYWORD,
            string: STYLE_STRING,
            comment: STYLE_COMMENT,
            function: STYLE_FUNCTION,
        }
    }
}

impl HighlightStyles {
    /// Style id for `category`.
    pub fn style_for(&self, category: HighlightCategory) -> StyleId {
        match category {
            HighlightCategory::Keyword => self.keyword,
            HighlightCategory::String => self.string,
            HighlightCategory::Comment => self.comment,
            HighlightCategory::FunctionName => self.function,
        }
    }
}

/// A processor that re-highlights the whole session into one style layer.
///
/// Each run emits [`ProcessingEdit::ReplaceStyleLayer`], so the previous tags are dropped and
/// the new ones applied in a single step.
#[derive(Debug, Clone)]
pub struct HighlightProcessor<T> {
    layer: StyleLayerId,
    engine: HighlightEngine<T>,
    styles: HighlightStyles,
}

/// The Python highlighter as a session processor.
pub type PythonHighlightProcessor = HighlightProcessor<PythonLexer>;

impl<T: Tokenizer> HighlightProcessor<T> {
    pub fn new(layer: StyleLayerId, engine: HighlightEngine<T>, styles: HighlightStyles) -> Self {
        Self {
            layer,
            engine,
            styles,
        }
    }

    pub fn layer(&self) -> StyleLayerId {
        self.layer
    }

    pub fn engine(&self) -> &HighlightEngine<T> {
        &self.engine
    }

    pub fn styles(&self) -> HighlightStyles {
        self.styles
    }

    /// Style intervals for `text` (char offsets).
    pub fn intervals(&self, text: &str) -> Result<Vec<Interval>, T::Error> {
        let spans = self.engine.highlight(text)?;
        Ok(spans
            .into_iter()
            .map(|span| Interval::new(span.start, span.end, self.styles.style_for(span.category)))
            .collect())
    }
}

impl HighlightProcessor<PythonLexer> {
    /// Python highlighting into [`StyleLayerId::SYNTAX`] with the default style ids.
    pub fn python_default() -> Result<Self, regex::Error> {
        Ok(Self::new(
            StyleLayerId::SYNTAX,
            HighlightEngine::new(PythonLexer::new()?),
            HighlightStyles::default(),
        ))
    }
}

impl<T: Tokenizer> DocumentProcessor for HighlightProcessor<T> {
    type Error = T::Error;

    fn process(&mut self, session: &DocumentSession) -> Result<Vec<ProcessingEdit>, Self::Error> {
        let intervals = self.intervals(&session.text())?;
        trace!(
            version = session.version(),
            tags = intervals.len(),
            "re-highlighted session"
        );
        Ok(vec![ProcessingEdit::ReplaceStyleLayer {
            layer: self.layer,
            intervals,
        }])
    }
}
