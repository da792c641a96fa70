//! Drawing.
//!
//! ```text
//! ┌ lwedit ──────────┐ Untitled* ✖  main.py ✖
//! │ New File      ^N │  1 def f():
//! │ Open File     ^O │  2     pass
//! │ ...              │
//! └──────────────────┘ status                    Ln 2, Col 9  Untitled*
//! ```

use lwedit_core::{DocumentSession, SEARCH_MATCH_STYLE_ID, StyleId, TabStrip};
use lwedit_highlight_python::{STYLE_COMMENT, STYLE_FUNCTION, STYLE_KEYWORD, STYLE_STRING};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, Mode, PathPurpose, ScreenLayout, SearchField, SidebarAction};
use crate::config::Theme;

const SIDEBAR_WIDTH: u16 = 24;
/// Cells a tab character occupies.
const TAB_WIDTH: usize = 4;

const BUTTON_BG: Color = Color::Rgb(0x1c, 0x1c, 0x1c);
const SELECTION_BG: Color = Color::Rgb(0x3a, 0x3a, 0x3a);
const MATCH_BG: Color = Color::Rgb(0x5f, 0x5f, 0x00);

/// Cells taken by `ch` in the text area.
pub fn char_width(ch: char) -> usize {
    if ch == '\t' {
        TAB_WIDTH
    } else {
        ch.width().unwrap_or(0)
    }
}

pub fn display_width(chars: impl Iterator<Item = char>) -> usize {
    chars.map(char_width).sum()
}

/// Character column of `line` under display column `x`.
pub fn column_at_display_x(line: &str, x: usize) -> usize {
    let mut used = 0;
    for (column, ch) in line.chars().enumerate() {
        let width = char_width(ch);
        if x < used + width.max(1) {
            return column;
        }
        used += width;
    }
    line.chars().count()
}

struct Regions {
    sidebar: Rect,
    tab_strip: Rect,
    gutter: Rect,
    text: Rect,
    status: Rect,
}

fn regions(area: Rect, session: &DocumentSession) -> Regions {
    let [sidebar, main] =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)]).areas(area);
    let [tab_strip, body, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(main);
    let gutter_width = session.line_numbers().gutter_width() as u16 + 2;
    let [gutter, text] =
        Layout::horizontal([Constraint::Length(gutter_width), Constraint::Min(1)]).areas(body);

    Regions {
        sidebar,
        tab_strip,
        gutter,
        text,
        status,
    }
}

/// The text area `session` would get inside `frame_area`.
pub fn text_area(frame_area: Rect, session: &DocumentSession) -> Rect {
    regions(frame_area, session).text
}

pub fn draw(frame: &mut Frame, app: &App) -> ScreenLayout {
    let editor = app.editor();
    let session = editor.active();
    let theme = app.theme();
    let regions = regions(frame.area(), session);

    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background).fg(theme.foreground)),
        frame.area(),
    );

    let sidebar_buttons = render_sidebar(frame, regions.sidebar, theme);
    let tab_strip = render_tab_strip(frame, regions.tab_strip, app);
    render_gutter(frame, regions.gutter, app);
    render_text(frame, regions.text, app);
    render_status_line(frame, regions.status, app);

    match app.mode() {
        Mode::Normal => {}
        Mode::PathPrompt(prompt) => {
            let title = match prompt.purpose {
                PathPurpose::Open => " Open File ",
                PathPurpose::SaveAs => " Save As ",
            };
            render_input_dialog(frame, title, &[("Path: ", prompt.input.as_str(), true)], theme);
        }
        Mode::SearchReplace(dialog) => {
            render_input_dialog(
                frame,
                " Search & Replace ",
                &[
                    (
                        "Search:  ",
                        dialog.search.as_str(),
                        dialog.focus == SearchField::Search,
                    ),
                    (
                        "Replace: ",
                        dialog.replace.as_str(),
                        dialog.focus == SearchField::Replace,
                    ),
                ],
                theme,
            );
        }
        Mode::ConfirmQuit => {
            let unsaved = editor.tabs().modified_count();
            let message = format!("{unsaved} tab(s) have unsaved changes. Quit anyway? (y/n)");
            let area = centered(frame.area(), message.width() as u16 + 4, 3);
            frame.render_widget(Clear, area);
            frame.render_widget(
                Paragraph::new(message).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Exit ")
                        .style(Style::default().bg(theme.sidebar).fg(theme.foreground)),
                ),
                area,
            );
        }
    }

    ScreenLayout {
        sidebar_buttons,
        tab_strip_area: regions.tab_strip,
        tab_strip,
        text_area: regions.text,
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, theme: &Theme) -> Vec<(Rect, SidebarAction)> {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" lwedit ")
        .style(Style::default().bg(theme.sidebar).fg(theme.foreground));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut buttons = Vec::new();
    if inner.width < 3 {
        return buttons;
    }

    for (i, action) in SidebarAction::ALL.into_iter().enumerate() {
        let y = inner.y + 1 + 2 * i as u16;
        if y >= inner.bottom() {
            break;
        }
        let rect = Rect::new(inner.x + 1, y, inner.width - 2, 1);
        let label = action.label();
        let shortcut = action.shortcut();
        let pad = usize::from(rect.width).saturating_sub(label.width() + shortcut.width() + 2);
        let text = format!(" {label}{}{shortcut} ", " ".repeat(pad));

        frame.render_widget(
            Paragraph::new(text).style(Style::default().bg(BUTTON_BG).fg(theme.foreground)),
            rect,
        );
        buttons.push((rect, action));
    }
    buttons
}

fn render_tab_strip(frame: &mut Frame, area: Rect, app: &App) -> TabStrip {
    let theme = app.theme();
    let labels = app.editor().tabs().labels();
    let strip = TabStrip::layout(&labels, usize::from(area.width));

    let mut spans = Vec::new();
    let mut column = 0;
    for segment in strip.segments() {
        if segment.cells.start > column {
            spans.push(Span::raw(" ".repeat(segment.cells.start - column)));
        }
        let style = if segment.active {
            Style::default()
                .bg(BUTTON_BG)
                .fg(theme.keyword)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(theme.sidebar).fg(theme.gutter)
        };
        spans.push(Span::styled(segment.text.clone(), style));
        column = segment.cells.end;
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.background)),
        area,
    );
    strip
}

fn render_gutter(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.editor().active();
    let viewport = app.viewport(app.editor().active_id());
    let numbers = session.line_numbers();
    let width = numbers.gutter_width();

    let lines: Vec<Line> = (0..usize::from(area.height))
        .map(|row| match numbers.label(viewport.top + row) {
            Some(label) => Line::from(format!(" {label:>width$} ")),
            None => Line::from(""),
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines).style(
            Style::default()
                .bg(app.theme().sidebar)
                .fg(app.theme().gutter),
        ),
        area,
    );
}

fn style_for_style_ids(theme: &Theme, style_ids: &[StyleId]) -> Style {
    let mut style = Style::default().fg(theme.foreground);
    for &style_id in style_ids {
        style = match style_id {
            STYLE_KEYWORD => style.fg(theme.keyword).add_modifier(Modifier::BOLD),
            STYLE_STRING => style.fg(theme.string),
            STYLE_COMMENT => style.fg(theme.comment).add_modifier(Modifier::ITALIC),
            STYLE_FUNCTION => style.fg(theme.function).add_modifier(Modifier::UNDERLINED),
            SEARCH_MATCH_STYLE_ID => style.bg(MATCH_BG),
            _ => style,
        };
    }
    style
}

fn render_text(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.editor().active();
    let buffer = session.buffer();
    let styles = session.styles();
    let selection = session.selection();
    let viewport = app.viewport(app.editor().active_id());
    let width = usize::from(area.width);

    let mut display_lines = Vec::with_capacity(usize::from(area.height));
    for row in 0..usize::from(area.height) {
        let line = viewport.top + row;
        let Some(line_text) = buffer.line_text(line) else {
            display_lines.push(Line::from(""));
            continue;
        };
        let line_start = buffer.line_start(line);

        let mut spans: Vec<Span> = Vec::new();
        let mut current_style: Option<Style> = None;
        let mut text = String::new();
        let mut x = 0;

        for (column, ch) in line_text.chars().enumerate() {
            let cell_width = char_width(ch);
            let cell_x = x;
            x += cell_width;
            if cell_x < viewport.left {
                continue;
            }
            if cell_x + cell_width > viewport.left + width {
                break;
            }

            let offset = line_start + column;
            let mut style = style_for_style_ids(app.theme(), &styles.styles_at(offset));
            if selection.as_ref().is_some_and(|range| range.contains(&offset)) {
                style = style.bg(SELECTION_BG);
            }

            if current_style.is_some_and(|current| current != style) {
                spans.push(Span::styled(
                    std::mem::take(&mut text),
                    current_style.unwrap_or_default(),
                ));
            }
            current_style = Some(style);

            if ch == '\t' {
                text.push_str(&" ".repeat(TAB_WIDTH));
            } else {
                text.push(ch);
            }
        }

        if !text.is_empty() {
            spans.push(Span::styled(text, current_style.unwrap_or_default()));
        }
        display_lines.push(Line::from(spans));
    }

    frame.render_widget(
        Paragraph::new(display_lines).style(Style::default().bg(app.theme().background)),
        area,
    );

    if app.mode() != &Mode::Normal || area.width == 0 || area.height == 0 {
        return;
    }

    let cursor = session.cursor_position();
    let Some(row) = cursor.line.checked_sub(viewport.top) else {
        return;
    };
    let line_text = buffer.line_text(cursor.line).unwrap_or_default();
    let cursor_x = display_width(line_text.chars().take(cursor.column));
    let Some(col) = cursor_x.checked_sub(viewport.left) else {
        return;
    };
    if row < usize::from(area.height) && col < width {
        frame.set_cursor_position((area.x + col as u16, area.y + row as u16));
    }
}

fn render_status_line(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.editor().active();
    let cursor = session.cursor_position();
    let marker = if session.is_modified() { "*" } else { "" };
    let info = format!(
        " Ln {}, Col {}  {}{} ",
        cursor.line + 1,
        cursor.column + 1,
        session.display_name(),
        marker
    );

    let [left, right] =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(info.width() as u16)])
            .areas(area);
    let style = Style::default().bg(app.theme().sidebar).fg(app.theme().foreground);
    frame.render_widget(
        Paragraph::new(format!(" {}", app.editor().status())).style(style),
        left,
    );
    frame.render_widget(Paragraph::new(info).style(style), right);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// A bordered dialog with one labelled input per row. The cursor goes to the focused row.
fn render_input_dialog(
    frame: &mut Frame,
    title: &str,
    fields: &[(&str, &str, bool)],
    theme: &Theme,
) {
    let width = (frame.area().width * 2 / 3).max(30);
    let area = centered(frame.area(), width, fields.len() as u16 + 3);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_bottom(" Enter: apply  Esc: close ")
        .style(Style::default().bg(theme.sidebar).fg(theme.foreground));
    let inner = block.inner(area);

    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    for (i, (label, value, focused)) in fields.iter().enumerate() {
        let y = inner.y + i as u16;
        if y >= inner.bottom() {
            break;
        }
        let row = Rect::new(inner.x, y, inner.width, 1);
        let value_style = if *focused {
            Style::default().bg(BUTTON_BG).fg(theme.keyword)
        } else {
            Style::default().fg(theme.foreground)
        };
        let line = Line::from(vec![
            Span::styled(*label, Style::default().fg(theme.gutter)),
            Span::styled(*value, value_style),
        ]);
        frame.render_widget(Paragraph::new(line), row);

        if *focused {
            let x = inner.x + (label.width() + value.width()) as u16;
            frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), y));
        }
    }
}
