//! Rope-backed text buffer.
//!
//! All public offsets are **character offsets** (not bytes). Positions are zero-based
//! `(line, column)` pairs where the column counts characters within the logical line.

use ropey::Rope;
use std::cmp::Ordering;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

/// Position coordinates (line and column numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based column in characters within the logical line.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Editable text content of a document session.
///
/// Rope provides O(log N) line access, insertion and deletion, so every keystroke stays cheap
/// even though derived state (highlighting, line labels) is recomputed from the whole text.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build a buffer from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Full buffer contents.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Total number of characters.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns `true` if the buffer holds no text.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of logical lines (`N` newlines => `N + 1` lines).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Text of a logical line without its line terminator.
    pub fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }

        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        if text.ends_with('\r') {
            text.pop();
        }
        Some(text)
    }

    /// Character count of a logical line, excluding its line terminator.
    pub fn line_len_chars(&self, line: usize) -> usize {
        self.line_text(line)
            .map(|text| text.chars().count())
            .unwrap_or(0)
    }

    /// Character offset at which `line` starts (clamped to the end of the buffer).
    pub fn line_start(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }

    /// Convert a character offset into a `(line, column)` position.
    pub fn char_to_position(&self, char_offset: usize) -> Position {
        let char_offset = char_offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(char_offset);
        let line_start = self.rope.line_to_char(line);
        Position::new(line, char_offset - line_start)
    }

    /// Convert a position into a character offset. Out-of-range lines and columns are clamped.
    pub fn position_to_char(&self, position: Position) -> usize {
        let last_line = self.rope.len_lines().saturating_sub(1);
        let line = position.line.min(last_line);
        let column = position.column.min(self.line_len_chars(line));
        self.rope.line_to_char(line) + column
    }

    /// Copy out the text in a half-open character range (clamped).
    pub fn slice(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.rope.len_chars());
        let start = range.start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// Insert `text` at `char_offset` (clamped to the end of the buffer).
    pub fn insert(&mut self, char_offset: usize, text: &str) {
        let offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(offset, text);
    }

    /// Remove a half-open character range (clamped).
    pub fn remove(&mut self, range: Range<usize>) {
        let end = range.end.min(self.rope.len_chars());
        let start = range.start.min(end);
        if start < end {
            self.rope.remove(start..end);
        }
    }

    /// Offset of the grapheme boundary preceding `char_offset`.
    ///
    /// Stepping back from the start of a line lands on the end of the previous line.
    pub fn prev_grapheme_boundary(&self, char_offset: usize) -> usize {
        let char_offset = char_offset.min(self.rope.len_chars());
        let pos = self.char_to_position(char_offset);
        if pos.column == 0 {
            return char_offset.saturating_sub(1);
        }

        let line_text = self.line_text(pos.line).unwrap_or_default();
        let line_start = char_offset - pos.column;
        let mut column = 0;
        let mut prev = 0;
        for grapheme in line_text.graphemes(true) {
            if column >= pos.column {
                break;
            }
            prev = column;
            column += grapheme.chars().count();
        }
        line_start + prev
    }

    /// Offset of the grapheme boundary following `char_offset`.
    ///
    /// Stepping forward from the end of a line lands on the start of the next line.
    pub fn next_grapheme_boundary(&self, char_offset: usize) -> usize {
        let len = self.rope.len_chars();
        let char_offset = char_offset.min(len);
        let pos = self.char_to_position(char_offset);
        let line_len = self.line_len_chars(pos.line);
        if pos.column >= line_len {
            return if pos.line + 1 < self.rope.len_lines() {
                self.rope.line_to_char(pos.line + 1)
            } else {
                len
            };
        }

        let line_text = self.line_text(pos.line).unwrap_or_default();
        let line_start = char_offset - pos.column;
        let mut column = 0;
        for grapheme in line_text.graphemes(true) {
            column += grapheme.chars().count();
            if column > pos.column {
                break;
            }
        }
        line_start + column.min(line_len)
    }
}
