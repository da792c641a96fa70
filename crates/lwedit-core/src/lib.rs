#![warn(missing_docs)]
//! lwedit core - headless state for a small tabbed text editor
//!
//! # Overview
//!
//! `lwedit-core` holds everything of the editor that is not drawing: document sessions, the
//! tab manager, line-number gutters, search & replace and file I/O. A frontend owns one
//! [`Editor`], feeds it [`Command`]s from its event loop and renders from the state it exposes.
//!
//! # Update cycle
//!
//! ```text
//! keystroke ─▶ Command ─▶ DocumentSession edit ─┬─▶ LineNumbers::rebuild (full text)
//!                                               └─▶ DocumentProcessor::process (full text)
//!                                                     └─▶ ProcessingEdit::ReplaceStyleLayer
//! ```
//!
//! Derived state is never patched: every edit rebuilds the gutter and the highlight tags from
//! the whole buffer.
//!
//! # Quick Start
//!
//! ```rust
//! use lwedit_core::{Command, Editor, NoopProcessor, SessionState};
//!
//! let mut editor = Editor::new(NoopProcessor);
//! assert_eq!(editor.tabs().len(), 1);
//! assert_eq!(editor.active().state(), SessionState::Untitled);
//!
//! let first = editor.active_id();
//! editor.execute(Command::CloseTab { id: first }).unwrap();
//! // Closing the last tab leaves a fresh untitled one.
//! assert_eq!(editor.tabs().len(), 1);
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - Rope-backed text buffer
//! - [`session`] - Document sessions (buffer + path + undo history)
//! - [`tabs`] - Tab manager
//! - [`tab_strip`] - Tab strip layout and close-glyph hit-testing
//! - [`line_numbers`] - Line number gutter labels
//! - [`search`] - Find and literal replace-all
//! - [`file_io`] - UTF-8 file reading/writing
//! - [`intervals`] - Highlight tags grouped in style layers
//! - [`processing`] - Derived-state processor interface
//! - [`commands`] - Command interface and application state

pub mod buffer;
pub mod commands;
pub mod file_io;
mod history;
pub mod intervals;
pub mod line_numbers;
pub mod processing;
pub mod search;
pub mod session;
pub mod tab_strip;
pub mod tabs;

pub use buffer::{Position, TextBuffer};
pub use commands::{
    Command, CommandError, CommandResult, CursorCommand, DEFAULT_INDENT_WIDTH, EditCommand,
    Editor, EditorOptions,
};
pub use file_io::{FileError, open_file, save_file};
pub use intervals::{Interval, SEARCH_MATCH_STYLE_ID, StyleId, StyleLayerId, StyleLayers};
pub use line_numbers::{LineNumbers, render_line_numbers};
pub use processing::{DocumentProcessor, NoopProcessor, ProcessingEdit};
pub use search::{Replaced, SearchError, SearchMatch, SearchOptions, replace_all};
pub use session::{DocumentSession, SessionState, UNTITLED_NAME};
pub use tab_strip::{CLOSE_GLYPH, TabHit, TabSegment, TabStrip};
pub use tabs::{TabError, TabId, TabLabel, TabManager};
