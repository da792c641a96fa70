//! Command Interface Layer
//!
//! [`Editor`] is the application state owned by a frontend's event loop: the open tabs, the
//! highlighting processor, an internal clipboard and the status line text. Frontends translate
//! user input into [`Command`]s and call [`Editor::execute`].
//!
//! After every command that changes text, the affected session's derived state is rebuilt from
//! the full buffer: line numbers by the session itself, highlight tags by the processor.
//!
//! # Example
//!
//! ```rust
//! use lwedit_core::{Command, EditCommand, Editor, NoopProcessor};
//!
//! let mut editor = Editor::new(NoopProcessor);
//! editor.execute(Command::Edit(EditCommand::InsertText {
//!     text: "hello hello".to_string(),
//! })).unwrap();
//! editor.execute(Command::ReplaceAll {
//!     search: "hello".to_string(),
//!     replace: "bye".to_string(),
//! }).unwrap();
//! assert_eq!(editor.active().text(), "bye bye");
//! ```

use crate::file_io::{self, FileError};
use crate::processing::DocumentProcessor;
use crate::search::{SearchError, SearchOptions, find_next_wrapping};
use crate::session::{DocumentSession, SessionState};
use crate::tabs::{TabError, TabId, TabManager};
use crate::Position;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Default number of spaces inserted by [`EditCommand::Indent`].
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Text editing commands (always target the active tab)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Insert text at the cursor, replacing the selection
    InsertText {
        /// Text to insert.
        text: String,
    },
    /// Delete the selection or the grapheme before the cursor
    Backspace,
    /// Delete the selection or the grapheme after the cursor
    DeleteForward,
    /// Insert indentation at the cursor
    Indent,
    /// Remove indentation from the start of the cursor line
    Unindent,
    /// Copy the selection to the clipboard
    Copy,
    /// Move the selection to the clipboard
    Cut,
    /// Insert the clipboard contents
    Paste,
    /// Undo last edit group
    Undo,
    /// Redo last undone edit group
    Redo,
}

/// Cursor movement commands (always target the active tab)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorCommand {
    /// One grapheme left
    Left {
        /// Extend the selection instead of collapsing it.
        extend: bool,
    },
    /// One grapheme right
    Right {
        /// Extend the selection instead of collapsing it.
        extend: bool,
    },
    /// One line up
    Up {
        /// Extend the selection instead of collapsing it.
        extend: bool,
    },
    /// One line down
    Down {
        /// Extend the selection instead of collapsing it.
        extend: bool,
    },
    /// Several lines up (negative) or down
    ByLines {
        /// Signed line delta.
        lines: isize,
        /// Extend the selection instead of collapsing it.
        extend: bool,
    },
    /// Start of line
    Home {
        /// Extend the selection instead of collapsing it.
        extend: bool,
    },
    /// End of line
    End {
        /// Extend the selection instead of collapsing it.
        extend: bool,
    },
    /// Jump to a logical position
    MoveTo {
        /// Target position (clamped).
        position: Position,
        /// Extend the selection instead of collapsing it.
        extend: bool,
    },
    /// Select the whole buffer
    SelectAll,
}

/// Top-level editor commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a new untitled tab
    NewFile,
    /// Open a file from disk into a new tab
    OpenFile {
        /// File to read.
        path: PathBuf,
    },
    /// Open a tab bound to `path` without reading it (the file may not exist yet)
    OpenNew {
        /// Future location of the file.
        path: PathBuf,
    },
    /// Save the active tab to its path
    Save,
    /// Save the active tab to a new path and bind it
    SaveAs {
        /// Destination path.
        path: PathBuf,
    },
    /// Close a tab
    CloseTab {
        /// Tab to close.
        id: TabId,
    },
    /// Make a tab active
    SelectTab {
        /// Tab to select.
        id: TabId,
    },
    /// Select the next tab
    NextTab,
    /// Select the previous tab
    PrevTab,
    /// Replace every literal occurrence in the active tab
    ReplaceAll {
        /// Text to search for (must not be empty).
        search: String,
        /// Replacement text.
        replace: String,
    },
    /// Select the next match after the cursor, wrapping around
    FindNext {
        /// Query text.
        query: String,
        /// Search options.
        options: SearchOptions,
    },
    /// Text editing
    Edit(EditCommand),
    /// Cursor movement
    Cursor(CursorCommand),
}

/// Command execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Command completed with nothing to report
    Success,
    /// A tab was opened or selected
    Opened {
        /// The tab now active.
        id: TabId,
    },
    /// The active tab was written to disk
    Saved {
        /// Where it was written.
        path: PathBuf,
    },
    /// Save on an untitled tab: the frontend must ask for a path and issue [`Command::SaveAs`]
    NeedsPath,
    /// A tab was closed
    Closed {
        /// The closed tab.
        id: TabId,
        /// Whether closing it opened a fresh untitled tab.
        replaced_with_untitled: bool,
    },
    /// Replace-all finished
    Replaced {
        /// Number of occurrences replaced.
        count: usize,
    },
    /// A search match is now selected
    SearchMatch {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
    },
    /// No match for the query
    SearchNotFound,
    /// Text was copied or cut
    Copied {
        /// Characters placed on the clipboard.
        chars: usize,
    },
    /// The command had no effect (nothing selected, nothing to undo, ...)
    Unchanged,
}

/// Command error type
#[derive(Debug, Error)]
pub enum CommandError {
    /// Reading or writing a file failed.
    #[error(transparent)]
    File(#[from] FileError),
    /// Search or replace failed.
    #[error(transparent)]
    Search(#[from] SearchError),
    /// A tab id was not found.
    #[error(transparent)]
    Tab(#[from] TabError),
    /// The highlighting processor failed.
    #[error("highlighting failed: {0}")]
    Highlight(String),
}

/// Tunables for editing behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    /// Spaces inserted by indent / removed by unindent.
    pub indent_width: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}

/// Application state: open tabs plus everything shared between them.
#[derive(Debug)]
pub struct Editor<P> {
    tabs: TabManager,
    processor: P,
    options: EditorOptions,
    clipboard: String,
    status: String,
}

impl<P> Editor<P>
where
    P: DocumentProcessor,
    P::Error: Display,
{
    /// Create an editor holding one untitled tab.
    pub fn new(processor: P) -> Self {
        Self::with_options(processor, EditorOptions::default())
    }

    /// Create an editor with explicit options.
    pub fn with_options(processor: P, options: EditorOptions) -> Self {
        let mut editor = Self {
            tabs: TabManager::new(),
            processor,
            options,
            clipboard: String::new(),
            status: "Ready".to_string(),
        };
        if let Err(err) = editor.refresh_active() {
            editor.status = err.to_string();
        }
        editor
    }

    /// The open tabs.
    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    /// The active session.
    pub fn active(&self) -> &DocumentSession {
        self.tabs.active()
    }

    /// The active tab id.
    pub fn active_id(&self) -> TabId {
        self.tabs.active_id()
    }

    /// Outcome of the last file operation (or other notable command).
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Replace the status line text.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Internal clipboard contents.
    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    /// Current options.
    pub fn options(&self) -> EditorOptions {
        self.options
    }

    /// The highlighting processor.
    pub fn processor(&self) -> &P {
        &self.processor
    }

    /// Open each path in its own tab: existing files are read, missing ones open as empty
    /// named buffers. The initial untitled tab is dropped when it is still pristine.
    ///
    /// Returns the paths that failed to open alongside their errors.
    pub fn open_paths<I>(&mut self, paths: I) -> Vec<CommandError>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let initial = self.tabs.active_id();
        let mut errors = Vec::new();
        let mut opened = 0;

        for path in paths {
            let command = if path.exists() {
                Command::OpenFile { path }
            } else {
                Command::OpenNew { path }
            };
            match self.execute(command) {
                Ok(_) => opened += 1,
                Err(err) => errors.push(err),
            }
        }

        let pristine = self.tabs.get(initial).is_some_and(|session| {
            session.state() == SessionState::Untitled
                && !session.is_modified()
                && session.buffer().is_empty()
        });
        if opened > 0
            && pristine
            && let Err(err) = self.tabs.close(initial)
        {
            warn!(error = %err, "could not drop the initial untitled tab");
        }

        errors
    }

    /// Execute a command. Failures are also reported on the status line.
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        let result = self.dispatch(command);
        if let Err(err) = &result {
            warn!(error = %err, "command failed");
            self.status = err.to_string();
        }
        result
    }

    fn dispatch(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        match command {
            Command::NewFile => {
                let id = self.tabs.new_untitled();
                self.refresh(id)?;
                self.status = "New file created".to_string();
                Ok(CommandResult::Opened { id })
            }
            Command::OpenFile { path } => {
                let content = file_io::open_file(&path)?;
                let status = format!("Opened: {}", path.display());
                let id = self.tabs.open(path, &content);
                self.refresh(id)?;
                self.status = status;
                Ok(CommandResult::Opened { id })
            }
            Command::OpenNew { path } => {
                let status = format!("New file: {}", path.display());
                let id = self.tabs.open(path, "");
                self.refresh(id)?;
                self.status = status;
                Ok(CommandResult::Opened { id })
            }
            Command::Save => self.save(),
            Command::SaveAs { path } => self.save_as(path),
            Command::CloseTab { id } => {
                let before = self.tabs.len();
                let closed = self.tabs.close(id)?;
                let replaced_with_untitled = before == 1;
                if replaced_with_untitled {
                    let active = self.tabs.active_id();
                    self.refresh(active)?;
                }
                self.status = format!("Closed: {}", closed.display_name());
                Ok(CommandResult::Closed {
                    id,
                    replaced_with_untitled,
                })
            }
            Command::SelectTab { id } => {
                self.tabs.select(id)?;
                Ok(CommandResult::Success)
            }
            Command::NextTab => {
                self.tabs.select_next();
                Ok(CommandResult::Success)
            }
            Command::PrevTab => {
                self.tabs.select_prev();
                Ok(CommandResult::Success)
            }
            Command::ReplaceAll { search, replace } => {
                let count = self.tabs.active_mut().replace_all(&search, &replace)?;
                if count > 0 {
                    self.refresh_active()?;
                }
                self.status = match count {
                    1 => "Replaced 1 occurrence".to_string(),
                    n => format!("Replaced {n} occurrences"),
                };
                Ok(CommandResult::Replaced { count })
            }
            Command::FindNext { query, options } => {
                let session = self.tabs.active_mut();
                let from = session
                    .selection()
                    .map(|range| range.end)
                    .unwrap_or_else(|| session.cursor());
                match find_next_wrapping(&session.text(), &query, options, from)? {
                    Some(found) => {
                        session.show_search_match(found.start..found.end);
                        Ok(CommandResult::SearchMatch {
                            start: found.start,
                            end: found.end,
                        })
                    }
                    None => {
                        self.status = format!("Not found: {query}");
                        Ok(CommandResult::SearchNotFound)
                    }
                }
            }
            Command::Edit(edit) => self.edit(edit),
            Command::Cursor(cursor) => {
                self.move_cursor(cursor);
                Ok(CommandResult::Success)
            }
        }
    }

    fn save(&mut self) -> Result<CommandResult, CommandError> {
        let session = self.tabs.active_mut();
        let Some(path) = session.path().map(Path::to_path_buf) else {
            return Ok(CommandResult::NeedsPath);
        };

        file_io::save_file(&path, &session.text())?;
        session.mark_saved();
        self.status = format!("Saved: {}", path.display());
        Ok(CommandResult::Saved { path })
    }

    fn save_as(&mut self, path: PathBuf) -> Result<CommandResult, CommandError> {
        self.tabs.check_path_free(self.tabs.active_id(), &path)?;
        let session = self.tabs.active_mut();
        file_io::save_file(&path, &session.text())?;
        session.bind_path(path.clone());
        session.mark_saved();
        info!(path = %path.display(), "bound tab to path");
        self.status = format!("Saved as: {}", path.display());
        Ok(CommandResult::Saved { path })
    }

    fn edit(&mut self, edit: EditCommand) -> Result<CommandResult, CommandError> {
        let indent_width = self.options.indent_width;
        let session = self.tabs.active_mut();
        let changed = match edit {
            EditCommand::InsertText { text } => session.insert_text(&text),
            EditCommand::Backspace => session.backspace(),
            EditCommand::DeleteForward => session.delete_forward(),
            EditCommand::Indent => session.indent(indent_width),
            EditCommand::Unindent => session.unindent(indent_width),
            EditCommand::Copy => {
                let Some(text) = session.selected_text() else {
                    return Ok(CommandResult::Unchanged);
                };
                let chars = text.chars().count();
                self.clipboard = text;
                return Ok(CommandResult::Copied { chars });
            }
            EditCommand::Cut => {
                let Some(text) = session.cut() else {
                    return Ok(CommandResult::Unchanged);
                };
                let chars = text.chars().count();
                self.clipboard = text;
                self.refresh_active()?;
                return Ok(CommandResult::Copied { chars });
            }
            EditCommand::Paste => {
                if self.clipboard.is_empty() {
                    return Ok(CommandResult::Unchanged);
                }
                session.insert_text(&self.clipboard)
            }
            EditCommand::Undo => session.undo(),
            EditCommand::Redo => session.redo(),
        };

        if !changed {
            return Ok(CommandResult::Unchanged);
        }
        self.refresh_active()?;
        Ok(CommandResult::Success)
    }

    fn move_cursor(&mut self, command: CursorCommand) {
        let session = self.tabs.active_mut();
        match command {
            CursorCommand::Left { extend } => session.move_left(extend),
            CursorCommand::Right { extend } => session.move_right(extend),
            CursorCommand::Up { extend } => session.move_up(extend),
            CursorCommand::Down { extend } => session.move_down(extend),
            CursorCommand::ByLines { lines, extend } => session.move_by_lines(lines, extend),
            CursorCommand::Home { extend } => session.move_home(extend),
            CursorCommand::End { extend } => session.move_end(extend),
            CursorCommand::MoveTo { position, extend } => {
                session.move_to_position(position, extend)
            }
            CursorCommand::SelectAll => session.select_all(),
        }
    }

    fn refresh_active(&mut self) -> Result<(), CommandError> {
        let id = self.tabs.active_id();
        self.refresh(id)
    }

    /// Re-run highlighting over the whole buffer of `id`.
    fn refresh(&mut self, id: TabId) -> Result<(), CommandError> {
        let session = self
            .tabs
            .get_mut(id)
            .ok_or(TabError::TabNotFound(id))?;
        session
            .apply_processor(&mut self.processor)
            .map_err(|err| CommandError::Highlight(err.to_string()))
    }
}
