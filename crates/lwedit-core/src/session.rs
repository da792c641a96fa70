//! Document sessions: one editable buffer plus its optional backing file.
//!
//! Every text mutation goes through a single edit path that records undo history, moves the
//! cursor, bumps the version and rebuilds the line-number gutter from the full text. Syntax
//! highlighting is applied afterwards by a [`DocumentProcessor`].

use crate::buffer::{Position, TextBuffer};
use crate::history::{TextEdit, UndoRedoManager, UndoStep};
use crate::intervals::{Interval, SEARCH_MATCH_STYLE_ID, StyleLayerId, StyleLayers};
use crate::line_numbers::LineNumbers;
use crate::processing::{DocumentProcessor, ProcessingEdit};
use crate::search::{self, SearchError};
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Tab label used by sessions with no backing file.
pub const UNTITLED_NAME: &str = "Untitled";

/// Lifecycle state of a session. A closed session no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No backing file yet; saving requires a destination path.
    Untitled,
    /// Bound to a file path.
    Named,
}

/// An open editable buffer plus its optional backing file path.
#[derive(Debug)]
pub struct DocumentSession {
    buffer: TextBuffer,
    path: Option<PathBuf>,
    history: UndoRedoManager,
    cursor: usize,
    anchor: Option<usize>,
    preferred_column: Option<usize>,
    styles: StyleLayers,
    line_numbers: LineNumbers,
    version: u64,
}

impl Default for DocumentSession {
    fn default() -> Self {
        Self::new_untitled()
    }
}

impl DocumentSession {
    /// An empty session with no backing file.
    pub fn new_untitled() -> Self {
        Self::with_content(None, "")
    }

    /// A session holding `content`, optionally bound to `path`.
    pub fn with_content(path: Option<PathBuf>, content: &str) -> Self {
        Self {
            buffer: TextBuffer::from_text(content),
            path,
            history: UndoRedoManager::new(),
            cursor: 0,
            anchor: None,
            preferred_column: None,
            styles: StyleLayers::new(),
            line_numbers: LineNumbers::from_text(content),
            version: 0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        if self.path.is_some() {
            SessionState::Named
        } else {
            SessionState::Untitled
        }
    }

    /// Backing file path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn bind_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    /// Label shown on the tab: the file's base name, or `Untitled`.
    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED_NAME.to_string())
    }

    /// The whole buffer text.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Read access to the underlying buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Gutter labels for the current text.
    pub fn line_numbers(&self) -> &LineNumbers {
        &self.line_numbers
    }

    /// Highlight tags currently applied.
    pub fn styles(&self) -> &StyleLayers {
        &self.styles
    }

    /// Incremented on every text change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// `true` when the buffer differs from the last saved (or loaded) state.
    pub fn is_modified(&self) -> bool {
        !self.history.is_clean()
    }

    /// Record the current state as saved.
    pub fn mark_saved(&mut self) {
        self.history.mark_clean();
    }

    /// Cursor as a character offset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cursor as a `(line, column)` position.
    pub fn cursor_position(&self) -> Position {
        self.buffer.char_to_position(self.cursor)
    }

    /// The selected character range, if the selection is non-empty.
    pub fn selection(&self) -> Option<Range<usize>> {
        let anchor = self.anchor?;
        if anchor == self.cursor {
            return None;
        }
        Some(anchor.min(self.cursor)..anchor.max(self.cursor))
    }

    /// Text of the current selection.
    pub fn selected_text(&self) -> Option<String> {
        self.selection().map(|range| self.buffer.slice(range))
    }

    /// Undo stack depth, counted in steps.
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Redo stack depth, counted in steps.
    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    /// Whether there is anything to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether there is anything to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ---- cursor & selection ----

    /// Move the cursor to `offset`. With `extend`, the selection grows from its anchor.
    pub fn set_cursor(&mut self, offset: usize, extend: bool) {
        self.move_cursor(offset, extend);
        self.preferred_column = None;
    }

    fn move_cursor(&mut self, offset: usize, extend: bool) {
        if extend {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }
        self.cursor = offset.min(self.buffer.len_chars());
        self.history.end_group();
    }

    /// Select `range` with the cursor at its end.
    pub fn select_range(&mut self, range: Range<usize>) {
        let len = self.buffer.len_chars();
        self.anchor = Some(range.start.min(len));
        self.cursor = range.end.min(len);
        self.preferred_column = None;
        self.history.end_group();
    }

    /// Select the whole buffer.
    pub fn select_all(&mut self) {
        self.select_range(0..self.buffer.len_chars());
    }

    /// Move one grapheme left.
    pub fn move_left(&mut self, extend: bool) {
        let target = match self.selection() {
            Some(range) if !extend => range.start,
            _ => self.buffer.prev_grapheme_boundary(self.cursor),
        };
        self.set_cursor(target, extend);
    }

    /// Move one grapheme right.
    pub fn move_right(&mut self, extend: bool) {
        let target = match self.selection() {
            Some(range) if !extend => range.end,
            _ => self.buffer.next_grapheme_boundary(self.cursor),
        };
        self.set_cursor(target, extend);
    }

    /// Move one line up, keeping the preferred column.
    pub fn move_up(&mut self, extend: bool) {
        let pos = self.cursor_position();
        if pos.line == 0 {
            self.set_cursor(0, extend);
            return;
        }
        self.move_vertically(pos.line - 1, pos.column, extend);
    }

    /// Move one line down, keeping the preferred column.
    pub fn move_down(&mut self, extend: bool) {
        let pos = self.cursor_position();
        if pos.line + 1 >= self.buffer.line_count() {
            self.set_cursor(self.buffer.len_chars(), extend);
            return;
        }
        self.move_vertically(pos.line + 1, pos.column, extend);
    }

    /// Move by `lines` lines (negative moves up).
    pub fn move_by_lines(&mut self, lines: isize, extend: bool) {
        let pos = self.cursor_position();
        let last_line = self.buffer.line_count().saturating_sub(1);
        let target = pos.line.saturating_add_signed(lines).min(last_line);
        if target != pos.line {
            self.move_vertically(target, pos.column, extend);
        }
    }

    fn move_vertically(&mut self, line: usize, column: usize, extend: bool) {
        let column = *self.preferred_column.get_or_insert(column);
        let target = self.buffer.position_to_char(Position::new(line, column));
        self.move_cursor(target, extend);
    }

    /// Move to the start of the cursor line.
    pub fn move_home(&mut self, extend: bool) {
        let line = self.cursor_position().line;
        self.set_cursor(self.buffer.line_start(line), extend);
    }

    /// Move to the end of the cursor line.
    pub fn move_end(&mut self, extend: bool) {
        let line = self.cursor_position().line;
        let end = self.buffer.line_start(line) + self.buffer.line_len_chars(line);
        self.set_cursor(end, extend);
    }

    /// Place the cursor at a logical position (clamped).
    pub fn move_to_position(&mut self, position: Position, extend: bool) {
        let offset = self.buffer.position_to_char(position);
        self.set_cursor(offset, extend);
    }

    // ---- editing ----

    /// Insert `text` at the cursor, replacing the selection if there is one.
    pub fn insert_text(&mut self, text: &str) -> bool {
        let (range, coalescible) = match self.selection() {
            Some(range) => (range, false),
            None => {
                let single_char = text.chars().count() == 1 && text != "\n";
                (self.cursor..self.cursor, single_char)
            }
        };
        let cursor_after = range.start + text.chars().count();
        self.record_edit(range, text, coalescible, cursor_after)
    }

    /// Delete the selection, or the grapheme before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.cursor == 0 {
            return false;
        }
        let start = self.buffer.prev_grapheme_boundary(self.cursor);
        self.record_edit(start..self.cursor, "", false, start)
    }

    /// Delete the selection, or the grapheme after the cursor.
    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let end = self.buffer.next_grapheme_boundary(self.cursor);
        if end == self.cursor {
            return false;
        }
        self.record_edit(self.cursor..end, "", false, self.cursor)
    }

    /// Delete the selected text. Returns `false` if nothing was selected.
    pub fn delete_selection(&mut self) -> bool {
        let Some(range) = self.selection() else {
            return false;
        };
        let start = range.start;
        self.record_edit(range, "", false, start)
    }

    /// Remove the selection and return its text.
    pub fn cut(&mut self) -> Option<String> {
        let text = self.selected_text()?;
        self.delete_selection();
        Some(text)
    }

    /// Insert `width` spaces at the cursor.
    pub fn indent(&mut self, width: usize) -> bool {
        let spaces = " ".repeat(width);
        let at = self.cursor;
        self.record_edit(at..at, &spaces, false, at + width)
    }

    /// Remove up to `width` leading spaces from the cursor line.
    pub fn unindent(&mut self, width: usize) -> bool {
        let line = self.cursor_position().line;
        let line_text = self.buffer.line_text(line).unwrap_or_default();
        let removable = line_text.chars().take(width).take_while(|&c| c == ' ').count();
        if removable == 0 {
            return false;
        }

        let line_start = self.buffer.line_start(line);
        let cursor_after = self.cursor.saturating_sub(removable).max(line_start);
        self.record_edit(line_start..line_start + removable, "", false, cursor_after)
    }

    /// Replace every literal occurrence of `search` in the buffer with `replacement`.
    ///
    /// The substitution is one undo step, and none is recorded when the text comes out
    /// unchanged. Returns how many occurrences were replaced.
    pub fn replace_all(&mut self, search: &str, replacement: &str) -> Result<usize, SearchError> {
        let current = self.buffer.text();
        let replaced = search::replace_all(&current, search, replacement)?;
        if replaced.count > 0 && replaced.text != current {
            let len = self.buffer.len_chars();
            let cursor_after = self.cursor.min(replaced.text.chars().count());
            self.record_edit(0..len, &replaced.text, false, cursor_after);
        }
        Ok(replaced.count)
    }

    /// Select a search match and tag it in the search layer.
    pub fn show_search_match(&mut self, range: Range<usize>) {
        self.styles.replace_layer(
            StyleLayerId::SEARCH,
            vec![Interval::new(range.start, range.end, SEARCH_MATCH_STYLE_ID)],
        );
        self.select_range(range);
    }

    fn record_edit(
        &mut self,
        range: Range<usize>,
        inserted: &str,
        coalescible: bool,
        cursor_after: usize,
    ) -> bool {
        let end = range.end.min(self.buffer.len_chars());
        let start = range.start.min(end);
        if start == end && inserted.is_empty() {
            return false;
        }

        let deleted = self.buffer.slice(start..end);
        let cursor_before = self.cursor;
        self.buffer.remove(start..end);
        self.buffer.insert(start, inserted);

        self.history.push_step(
            UndoStep {
                group_id: 0,
                edit: TextEdit {
                    start,
                    deleted,
                    inserted: inserted.to_string(),
                },
                cursor_before,
                cursor_after,
            },
            coalescible,
        );

        self.cursor = cursor_after.min(self.buffer.len_chars());
        self.anchor = None;
        self.preferred_column = None;
        self.after_text_change();
        true
    }

    /// Revert the most recent undo group.
    pub fn undo(&mut self) -> bool {
        let Some(steps) = self.history.pop_undo_group() else {
            return false;
        };

        for step in steps {
            let edit = &step.edit;
            self.buffer.remove(edit.start..edit.start + edit.inserted_len());
            self.buffer.insert(edit.start, &edit.deleted);
            self.cursor = step.cursor_before;
            self.history.push_redo(step);
        }

        self.anchor = None;
        self.preferred_column = None;
        self.after_text_change();
        true
    }

    /// Re-apply the most recently undone group.
    pub fn redo(&mut self) -> bool {
        let Some(steps) = self.history.pop_redo_group() else {
            return false;
        };

        for step in steps {
            let edit = &step.edit;
            self.buffer.remove(edit.start..edit.start + edit.deleted_len());
            self.buffer.insert(edit.start, &edit.inserted);
            self.cursor = step.cursor_after;
            self.history.push_undo(step);
        }

        self.anchor = None;
        self.preferred_column = None;
        self.after_text_change();
        true
    }

    fn after_text_change(&mut self) {
        self.version = self.version.wrapping_add(1);
        self.cursor = self.cursor.min(self.buffer.len_chars());
        self.line_numbers.rebuild(&self.buffer.text());
        self.styles.clear_layer(StyleLayerId::SEARCH);
    }

    // ---- derived state ----

    /// Apply derived-state edits produced by a processor.
    pub fn apply_processing_edits<I>(&mut self, edits: I)
    where
        I: IntoIterator<Item = ProcessingEdit>,
    {
        for edit in edits {
            match edit {
                ProcessingEdit::ReplaceStyleLayer { layer, intervals } => {
                    self.styles.replace_layer(layer, intervals);
                }
                ProcessingEdit::ClearStyleLayer { layer } => {
                    self.styles.clear_layer(layer);
                }
            }
        }
    }

    /// Run `processor` over this session and apply its edits.
    pub fn apply_processor<P>(&mut self, processor: &mut P) -> Result<(), P::Error>
    where
        P: DocumentProcessor,
    {
        let edits = processor.process(self)?;
        self.apply_processing_edits(edits);
        Ok(())
    }
}
