//! Application state and input handling.
//!
//! [`App`] owns the [`Editor`] and translates terminal events into editor commands. Modal
//! dialogs (path prompt, search & replace, quit confirmation) capture the keyboard while open.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use lwedit_core::{
    Command, CommandResult, CursorCommand, EditCommand, Editor, Position, SearchOptions, TabHit,
    TabId, TabStrip,
};
use lwedit_highlight_python::PythonHighlightProcessor;
use ratatui::layout::{Position as ScreenPosition, Rect};
use tracing::{debug, warn};

use crate::config::{Config, EditorConfig, Theme};
use crate::ui;

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: usize = 3;

/// Side panel entries, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarAction {
    NewFile,
    OpenFile,
    Save,
    SaveAs,
    SearchReplace,
    Exit,
}

impl SidebarAction {
    pub const ALL: [Self; 6] = [
        Self::NewFile,
        Self::OpenFile,
        Self::Save,
        Self::SaveAs,
        Self::SearchReplace,
        Self::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::NewFile => "New File",
            Self::OpenFile => "Open File",
            Self::Save => "Save",
            Self::SaveAs => "Save As",
            Self::SearchReplace => "Search & Replace",
            Self::Exit => "Exit",
        }
    }

    pub fn shortcut(self) -> &'static str {
        match self {
            Self::NewFile => "^N",
            Self::OpenFile => "^O",
            Self::Save => "^S",
            Self::SaveAs => "M-S",
            Self::SearchReplace => "^F",
            Self::Exit => "^Q",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPurpose {
    Open,
    SaveAs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrompt {
    pub purpose: PathPurpose,
    pub input: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchField {
    #[default]
    Search,
    Replace,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchDialog {
    pub search: String,
    pub replace: String,
    pub focus: SearchField,
}

impl SearchDialog {
    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            SearchField::Search => &mut self.search,
            SearchField::Replace => &mut self.replace,
        }
    }

    fn switch_focus(&mut self) {
        self.focus = match self.focus {
            SearchField::Search => SearchField::Replace,
            SearchField::Replace => SearchField::Search,
        };
    }
}

/// What currently receives keyboard input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    PathPrompt(PathPrompt),
    SearchReplace(SearchDialog),
    ConfirmQuit,
}

/// First visible line and display column of a tab's text area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub top: usize,
    pub left: usize,
}

/// Screen regions from the last render, used for mouse hit-testing.
#[derive(Debug, Clone, Default)]
pub struct ScreenLayout {
    pub sidebar_buttons: Vec<(Rect, SidebarAction)>,
    pub tab_strip_area: Rect,
    pub tab_strip: TabStrip,
    pub text_area: Rect,
}

pub struct App {
    editor: Editor<PythonHighlightProcessor>,
    editor_config: EditorConfig,
    theme: Theme,
    mode: Mode,
    last_search: SearchDialog,
    viewports: HashMap<TabId, Viewport>,
    screen: ScreenLayout,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let processor =
            PythonHighlightProcessor::python_default().context("compiling the Python lexer")?;
        Ok(Self {
            editor: Editor::with_options(processor, config.editor.options()),
            editor_config: config.editor.clone(),
            theme: config.theme(),
            mode: Mode::Normal,
            last_search: SearchDialog::default(),
            viewports: HashMap::new(),
            screen: ScreenLayout::default(),
            should_quit: false,
        })
    }

    /// Open command-line files; failures end up on the status line.
    pub fn open_paths(&mut self, paths: Vec<PathBuf>) {
        for err in self.editor.open_paths(paths) {
            warn!(error = %err, "could not open file from command line");
        }
    }

    pub fn editor(&self) -> &Editor<PythonHighlightProcessor> {
        &self.editor
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn screen(&self) -> &ScreenLayout {
        &self.screen
    }

    pub fn viewport(&self, id: TabId) -> Viewport {
        self.viewports.get(&id).copied().unwrap_or_default()
    }

    fn viewport_mut(&mut self) -> &mut Viewport {
        self.viewports.entry(self.editor.active_id()).or_default()
    }

    pub fn render(&mut self, frame: &mut ratatui::Frame) {
        self.adjust_scroll_for(frame.area());
        let screen = ui::draw(frame, self);
        self.screen = screen;
    }

    fn execute(&mut self, command: Command) -> Option<CommandResult> {
        let result = self.editor.execute(command).ok();
        let tabs = self.editor.tabs();
        self.viewports.retain(|id, _| tabs.contains(*id));
        result
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            Event::Paste(text) => {
                if self.mode == Mode::Normal {
                    self.execute(Command::Edit(EditCommand::InsertText { text }));
                    self.adjust_scroll();
                }
            }
            _ => {}
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match std::mem::take(&mut self.mode) {
            Mode::Normal => self.handle_normal_key(key),
            Mode::PathPrompt(prompt) => self.mode = self.handle_path_prompt_key(prompt, key),
            Mode::SearchReplace(dialog) => self.mode = self.handle_search_key(dialog, key),
            Mode::ConfirmQuit => self.mode = self.handle_confirm_quit_key(key),
        }

        self.adjust_scroll();
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let save_as_mods = [
            KeyModifiers::ALT,
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        ];

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('n')) => self.trigger(SidebarAction::NewFile),
            (KeyModifiers::CONTROL, KeyCode::Char('o')) => self.trigger(SidebarAction::OpenFile),
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => self.trigger(SidebarAction::Save),
            (mods, KeyCode::Char('s' | 'S')) if save_as_mods.contains(&mods) => {
                self.trigger(SidebarAction::SaveAs)
            }
            (KeyModifiers::CONTROL, KeyCode::Char('f' | 'h')) => {
                self.trigger(SidebarAction::SearchReplace)
            }
            (KeyModifiers::CONTROL, KeyCode::Char('q')) => self.trigger(SidebarAction::Exit),

            (KeyModifiers::CONTROL, KeyCode::Char('w')) => {
                let id = self.editor.active_id();
                self.execute(Command::CloseTab { id });
            }
            (KeyModifiers::CONTROL, KeyCode::PageDown) => {
                self.execute(Command::NextTab);
            }
            (KeyModifiers::CONTROL, KeyCode::PageUp) => {
                self.execute(Command::PrevTab);
            }

            (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
                self.execute(Command::Cursor(CursorCommand::SelectAll));
            }
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => self.edit(EditCommand::Copy),
            (KeyModifiers::CONTROL, KeyCode::Char('x')) => self.edit(EditCommand::Cut),
            (KeyModifiers::CONTROL, KeyCode::Char('v')) => self.edit(EditCommand::Paste),
            (KeyModifiers::CONTROL, KeyCode::Char('z')) => self.edit(EditCommand::Undo),
            (KeyModifiers::CONTROL, KeyCode::Char('y')) => self.edit(EditCommand::Redo),
            (_, KeyCode::F(3)) => {
                let query = self.last_search.search.clone();
                self.find_next(query);
            }

            (_, KeyCode::BackTab) => self.edit(EditCommand::Unindent),
            (_, KeyCode::Tab) => self.edit(EditCommand::Indent),

            (_, KeyCode::Left) => self.cursor(CursorCommand::Left { extend: shift }),
            (_, KeyCode::Right) => self.cursor(CursorCommand::Right { extend: shift }),
            (_, KeyCode::Up) => self.cursor(CursorCommand::Up { extend: shift }),
            (_, KeyCode::Down) => self.cursor(CursorCommand::Down { extend: shift }),
            (_, KeyCode::Home) => self.cursor(CursorCommand::Home { extend: shift }),
            (_, KeyCode::End) => self.cursor(CursorCommand::End { extend: shift }),
            (_, KeyCode::PageUp) => {
                let lines = -(self.page_height() as isize);
                self.cursor(CursorCommand::ByLines {
                    lines,
                    extend: shift,
                });
            }
            (_, KeyCode::PageDown) => {
                let lines = self.page_height() as isize;
                self.cursor(CursorCommand::ByLines {
                    lines,
                    extend: shift,
                });
            }

            (_, KeyCode::Enter) => self.edit(EditCommand::InsertText {
                text: "\n".to_string(),
            }),
            (_, KeyCode::Backspace) => self.edit(EditCommand::Backspace),
            (_, KeyCode::Delete) => self.edit(EditCommand::DeleteForward),
            (mods, KeyCode::Char(c))
                if !mods.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.edit(EditCommand::InsertText {
                    text: c.to_string(),
                });
            }
            _ => {}
        }
    }

    fn edit(&mut self, command: EditCommand) {
        self.execute(Command::Edit(command));
    }

    fn cursor(&mut self, command: CursorCommand) {
        self.execute(Command::Cursor(command));
    }

    fn page_height(&self) -> usize {
        usize::from(self.screen.text_area.height).max(1)
    }

    /// Run a side panel action (also bound to keys).
    pub fn trigger(&mut self, action: SidebarAction) {
        debug!(?action, "sidebar action");
        match action {
            SidebarAction::NewFile => {
                self.execute(Command::NewFile);
            }
            SidebarAction::OpenFile => {
                self.mode = Mode::PathPrompt(PathPrompt {
                    purpose: PathPurpose::Open,
                    input: String::new(),
                });
            }
            SidebarAction::Save => {
                if self.execute(Command::Save) == Some(CommandResult::NeedsPath) {
                    self.start_save_as();
                }
            }
            SidebarAction::SaveAs => self.start_save_as(),
            SidebarAction::SearchReplace => {
                self.mode = Mode::SearchReplace(self.last_search.clone());
            }
            SidebarAction::Exit => {
                let unsaved = self.editor.tabs().modified_count();
                if unsaved > 0 {
                    self.mode = Mode::ConfirmQuit;
                } else {
                    self.should_quit = true;
                }
            }
        }
    }

    fn start_save_as(&mut self) {
        let input = self
            .editor
            .active()
            .path()
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        self.mode = Mode::PathPrompt(PathPrompt {
            purpose: PathPurpose::SaveAs,
            input,
        });
    }

    fn handle_path_prompt_key(&mut self, mut prompt: PathPrompt, key: KeyEvent) -> Mode {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => return Mode::Normal,
            (_, KeyCode::Enter) => {
                let input = prompt.input.trim();
                if input.is_empty() {
                    return Mode::Normal;
                }
                let path = expand_home(input);
                match prompt.purpose {
                    PathPurpose::Open => {
                        self.execute(Command::OpenFile { path });
                    }
                    PathPurpose::SaveAs => {
                        let path = self.editor_config.with_default_extension(path);
                        self.execute(Command::SaveAs { path });
                    }
                }
                return Mode::Normal;
            }
            (_, KeyCode::Backspace) => {
                prompt.input.pop();
            }
            (mods, KeyCode::Char(c))
                if !mods.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                prompt.input.push(c);
            }
            _ => {}
        }
        Mode::PathPrompt(prompt)
    }

    fn handle_search_key(&mut self, mut dialog: SearchDialog, key: KeyEvent) -> Mode {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => {
                self.last_search = dialog;
                return Mode::Normal;
            }
            (_, KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down) => {
                dialog.switch_focus();
            }
            (_, KeyCode::Enter) => {
                self.execute(Command::ReplaceAll {
                    search: dialog.search.clone(),
                    replace: dialog.replace.clone(),
                });
            }
            (KeyModifiers::CONTROL, KeyCode::Char('n')) | (_, KeyCode::F(3)) => {
                self.find_next(dialog.search.clone());
            }
            (_, KeyCode::Backspace) => {
                dialog.focused_mut().pop();
            }
            (mods, KeyCode::Char(c))
                if !mods.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                dialog.focused_mut().push(c);
            }
            _ => {}
        }
        self.last_search = dialog.clone();
        Mode::SearchReplace(dialog)
    }

    fn find_next(&mut self, query: String) {
        if query.is_empty() {
            self.editor.set_status("Nothing to find");
            return;
        }
        self.execute(Command::FindNext {
            query,
            options: SearchOptions::default(),
        });
    }

    fn handle_confirm_quit_key(&mut self, key: KeyEvent) -> Mode {
        match key.code {
            KeyCode::Char('y' | 'Y') => {
                self.should_quit = true;
                Mode::Normal
            }
            KeyCode::Char('n' | 'N') | KeyCode::Esc => Mode::Normal,
            _ => Mode::ConfirmQuit,
        }
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if self.mode != Mode::Normal {
            return;
        }
        let point = ScreenPosition::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(action) = self
                    .screen
                    .sidebar_buttons
                    .iter()
                    .find(|(rect, _)| rect.contains(point))
                    .map(|(_, action)| *action)
                {
                    self.trigger(action);
                    return;
                }

                if self.screen.tab_strip_area.contains(point) {
                    let column = usize::from(mouse.column - self.screen.tab_strip_area.x);
                    match self.screen.tab_strip.hit_test(column) {
                        Some(TabHit::Select(id)) => {
                            self.execute(Command::SelectTab { id });
                        }
                        Some(TabHit::Close(id)) => {
                            self.execute(Command::CloseTab { id });
                        }
                        None => {}
                    }
                    return;
                }

                let extend = mouse.modifiers.contains(KeyModifiers::SHIFT);
                self.click_text(point, extend);
            }
            MouseEventKind::Drag(MouseButton::Left) => self.click_text(point, true),
            MouseEventKind::ScrollUp => {
                let viewport = self.viewport_mut();
                viewport.top = viewport.top.saturating_sub(WHEEL_LINES);
            }
            MouseEventKind::ScrollDown => {
                let last_line = self.editor.active().buffer().line_count().saturating_sub(1);
                let viewport = self.viewport_mut();
                viewport.top = (viewport.top + WHEEL_LINES).min(last_line);
            }
            _ => {}
        }
    }

    fn click_text(&mut self, point: ScreenPosition, extend: bool) {
        let area = self.screen.text_area;
        if !area.contains(point) {
            return;
        }

        let viewport = self.viewport(self.editor.active_id());
        let line = viewport.top + usize::from(point.y - area.y);
        let target_x = viewport.left + usize::from(point.x - area.x);
        let line_text = self
            .editor
            .active()
            .buffer()
            .line_text(line)
            .unwrap_or_default();
        let column = ui::column_at_display_x(&line_text, target_x);

        self.cursor(CursorCommand::MoveTo {
            position: Position::new(line, column),
            extend,
        });
    }

    fn adjust_scroll(&mut self) {
        let area = self.screen.text_area;
        self.adjust_scroll_to(usize::from(area.height), usize::from(area.width));
    }

    /// Keep the cursor visible before drawing into `frame_area`.
    fn adjust_scroll_for(&mut self, frame_area: Rect) {
        let text_area = ui::text_area(frame_area, self.editor.active());
        if text_area != self.screen.text_area {
            self.adjust_scroll_to(usize::from(text_area.height), usize::from(text_area.width));
        }
    }

    fn adjust_scroll_to(&mut self, height: usize, width: usize) {
        if height == 0 || width == 0 {
            return;
        }

        let session = self.editor.active();
        let cursor = session.cursor_position();
        let line_text = session.buffer().line_text(cursor.line).unwrap_or_default();
        let cursor_x = ui::display_width(line_text.chars().take(cursor.column));

        let viewport = self.viewport_mut();
        if cursor.line < viewport.top {
            viewport.top = cursor.line;
        }
        if cursor.line >= viewport.top + height {
            viewport.top = cursor.line + 1 - height;
        }
        if cursor_x < viewport.left {
            viewport.left = cursor_x;
        }
        if cursor_x >= viewport.left + width {
            viewport.left = cursor_x + 1 - width;
        }
    }
}

fn expand_home(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(input)
}
