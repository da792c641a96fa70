//! Find and replace-all.
//!
//! Offsets are in characters. Replace-all is always a literal substitution; find can also
//! match case-insensitively, as a regex, or on whole words only.

use std::ops::Range;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// How "Find next" interprets its query. The default is a case-sensitive literal search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Match letter case exactly.
    pub case_sensitive: bool,
    /// Reject matches touching a word character (alphanumeric or `_`) on either side.
    pub whole_word: bool,
    /// Treat the query as a regular expression.
    pub regex: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            whole_word: false,
            regex: false,
        }
    }
}

/// A half-open character range `[start, end)` of one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// First character of the match.
    pub start: usize,
    /// One past the last character.
    pub end: usize,
}

impl SearchMatch {
    /// Length in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the match covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// The match as a range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Result of [`replace_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced {
    /// The text after substitution.
    pub text: String,
    /// How many occurrences were replaced.
    pub count: usize,
}

/// Search errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Replace-all was asked to substitute the empty string.
    #[error("search text must not be empty")]
    EmptyQuery,
    /// The provided regex pattern failed to compile.
    #[error("invalid regex: {0}")]
    InvalidRegex(String),
}

/// A compiled query.
struct Finder {
    regex: Regex,
    whole_word: bool,
}

impl Finder {
    fn new(query: &str, options: SearchOptions) -> Result<Self, SearchError> {
        let pattern = if options.regex {
            query.to_string()
        } else {
            regex::escape(query)
        };
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(!options.case_sensitive)
            .multi_line(true)
            .build()
            .map_err(|err| SearchError::InvalidRegex(err.to_string()))?;

        Ok(Self {
            regex,
            whole_word: options.whole_word,
        })
    }

    /// Byte ranges of accepted matches at or after `from_byte`, in order.
    fn matches<'t>(
        &'t self,
        text: &'t str,
        from_byte: usize,
    ) -> impl Iterator<Item = Range<usize>> + 't {
        let mut at = from_byte;
        std::iter::from_fn(move || {
            while at <= text.len() {
                let found = self.regex.find_at(text, at)?;
                let range = found.range();
                if range.is_empty() {
                    // Step over the next char so empty matches cannot stall.
                    at = text[range.end..]
                        .chars()
                        .next()
                        .map_or(text.len() + 1, |ch| range.end + ch.len_utf8());
                    continue;
                }
                at = range.end;
                if self.whole_word && !is_whole_word(text, &range) {
                    continue;
                }
                return Some(range);
            }
            None
        })
    }
}

fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

fn is_whole_word(text: &str, range: &Range<usize>) -> bool {
    let before = text[..range.start].chars().next_back();
    let after = text[range.end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Converts ascending byte ranges to char ranges, counting chars only once.
struct CharCounter<'t> {
    text: &'t str,
    byte: usize,
    chars: usize,
}

impl<'t> CharCounter<'t> {
    fn new(text: &'t str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    fn advance_to(&mut self, byte: usize) -> usize {
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }

    fn char_range(&mut self, range: Range<usize>) -> SearchMatch {
        let start = self.advance_to(range.start);
        let end = self.advance_to(range.end);
        SearchMatch { start, end }
    }
}

/// Find the next occurrence of `query` in `text`, searching forward from `from_char`.
///
/// Returns `Ok(None)` if there is no match or `query` is empty.
pub fn find_next(
    text: &str,
    query: &str,
    options: SearchOptions,
    from_char: usize,
) -> Result<Option<SearchMatch>, SearchError> {
    if query.is_empty() {
        return Ok(None);
    }

    let finder = Finder::new(query, options)?;
    let from_byte = char_to_byte(text, from_char);
    let mut counter = CharCounter::new(text);
    Ok(finder
        .matches(text, from_byte)
        .next()
        .map(|range| counter.char_range(range)))
}

/// Like [`find_next`], wrapping around to the start of `text`.
pub fn find_next_wrapping(
    text: &str,
    query: &str,
    options: SearchOptions,
    from_char: usize,
) -> Result<Option<SearchMatch>, SearchError> {
    match find_next(text, query, options, from_char)? {
        None if from_char > 0 => find_next(text, query, options, 0),
        found => Ok(found),
    }
}

/// All occurrences of `query` in `text`; empty if `query` is empty.
pub fn find_all(
    text: &str,
    query: &str,
    options: SearchOptions,
) -> Result<Vec<SearchMatch>, SearchError> {
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let finder = Finder::new(query, options)?;
    let mut counter = CharCounter::new(text);
    Ok(finder
        .matches(text, 0)
        .map(|range| counter.char_range(range))
        .collect())
}

/// Replace every non-overlapping occurrence of `search` with `replacement`, left to right.
///
/// The substitution is literal: neither argument is interpreted as a pattern. An empty
/// `search` is rejected with [`SearchError::EmptyQuery`]. When `search` does not occur the
/// text is returned unchanged with a count of zero.
pub fn replace_all(text: &str, search: &str, replacement: &str) -> Result<Replaced, SearchError> {
    if search.is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    let count = text.matches(search).count();
    if count == 0 {
        return Ok(Replaced {
            text: text.to_string(),
            count,
        });
    }

    Ok(Replaced {
        text: text.replace(search, replacement),
        count,
    })
}
