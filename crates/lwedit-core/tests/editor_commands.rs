use lwedit_core::{
    Command, CommandResult, CursorCommand, EditCommand, Editor, EditorOptions, NoopProcessor,
    Position, SessionState,
};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

fn edit(editor: &mut Editor<NoopProcessor>, command: EditCommand) -> CommandResult {
    editor.execute(Command::Edit(command)).unwrap()
}

fn cursor(editor: &mut Editor<NoopProcessor>, command: CursorCommand) {
    editor.execute(Command::Cursor(command)).unwrap();
}

fn type_chars(editor: &mut Editor<NoopProcessor>, text: &str) {
    for ch in text.chars() {
        edit(
            editor,
            EditCommand::InsertText {
                text: ch.to_string(),
            },
        );
    }
}

#[test]
fn test_save_on_untitled_needs_path_then_save_as_binds() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("script.py");
    let mut editor = Editor::new(NoopProcessor);
    type_chars(&mut editor, "x = 1");

    assert_eq!(editor.execute(Command::Save).unwrap(), CommandResult::NeedsPath);
    assert_eq!(editor.active().state(), SessionState::Untitled);

    let result = editor
        .execute(Command::SaveAs { path: path.clone() })
        .unwrap();
    assert_eq!(result, CommandResult::Saved { path: path.clone() });
    assert_eq!(editor.active().state(), SessionState::Named);
    assert_eq!(editor.active().path(), Some(path.as_path()));
    assert_eq!(editor.active().display_name(), "script.py");
    assert!(!editor.active().is_modified());
    assert_eq!(fs::read_to_string(&path).unwrap(), "x = 1");
    assert_eq!(editor.status(), format!("Saved as: {}", path.display()));

    type_chars(&mut editor, "0");
    assert!(editor.active().is_modified());
    let result = editor.execute(Command::Save).unwrap();
    assert_eq!(result, CommandResult::Saved { path: path.clone() });
    assert_eq!(fs::read_to_string(&path).unwrap(), "x = 10");
    assert_eq!(editor.status(), format!("Saved: {}", path.display()));
}

#[test]
fn test_undo_back_to_saved_state_is_clean() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    let mut editor = Editor::new(NoopProcessor);
    type_chars(&mut editor, "ab");
    editor.execute(Command::SaveAs { path }).unwrap();

    edit(&mut editor, EditCommand::Backspace);
    assert!(editor.active().is_modified());
    edit(&mut editor, EditCommand::Undo);
    assert!(!editor.active().is_modified());
    assert_eq!(editor.active().text(), "ab");
}

#[test]
fn test_typing_coalesces_into_one_undo_group() {
    let mut editor = Editor::new(NoopProcessor);
    type_chars(&mut editor, "hello");
    edit(
        &mut editor,
        EditCommand::InsertText {
            text: "\n".to_string(),
        },
    );
    type_chars(&mut editor, "world");
    assert_eq!(editor.active().text(), "hello\nworld");

    edit(&mut editor, EditCommand::Undo);
    assert_eq!(editor.active().text(), "hello\n");
    edit(&mut editor, EditCommand::Undo);
    assert_eq!(editor.active().text(), "hello");
    edit(&mut editor, EditCommand::Undo);
    assert_eq!(editor.active().text(), "");
    assert_eq!(edit(&mut editor, EditCommand::Undo), CommandResult::Unchanged);

    edit(&mut editor, EditCommand::Redo);
    assert_eq!(editor.active().text(), "hello");
}

#[test]
fn test_cursor_movement_breaks_undo_group() {
    let mut editor = Editor::new(NoopProcessor);
    type_chars(&mut editor, "ac");
    cursor(&mut editor, CursorCommand::Left { extend: false });
    type_chars(&mut editor, "b");
    assert_eq!(editor.active().text(), "abc");

    edit(&mut editor, EditCommand::Undo);
    assert_eq!(editor.active().text(), "ac");
}

#[test]
fn test_copy_cut_paste() {
    let mut editor = Editor::new(NoopProcessor);
    edit(
        &mut editor,
        EditCommand::InsertText {
            text: "one two".to_string(),
        },
    );

    assert_eq!(edit(&mut editor, EditCommand::Copy), CommandResult::Unchanged);

    cursor(&mut editor, CursorCommand::Home { extend: false });
    for _ in 0..3 {
        cursor(&mut editor, CursorCommand::Right { extend: true });
    }
    assert_eq!(edit(&mut editor, EditCommand::Copy), CommandResult::Copied { chars: 3 });
    assert_eq!(editor.clipboard(), "one");

    assert_eq!(edit(&mut editor, EditCommand::Cut), CommandResult::Copied { chars: 3 });
    assert_eq!(editor.active().text(), " two");

    cursor(&mut editor, CursorCommand::End { extend: false });
    edit(&mut editor, EditCommand::Paste);
    assert_eq!(editor.active().text(), " twoone");
}

#[test]
fn test_typing_replaces_selection() {
    let mut editor = Editor::new(NoopProcessor);
    type_chars(&mut editor, "abc");
    cursor(&mut editor, CursorCommand::SelectAll);
    type_chars(&mut editor, "z");
    assert_eq!(editor.active().text(), "z");
}

#[test]
fn test_indent_and_unindent() {
    let mut editor = Editor::with_options(NoopProcessor, EditorOptions { indent_width: 4 });
    type_chars(&mut editor, "pass");
    cursor(&mut editor, CursorCommand::Home { extend: false });

    edit(&mut editor, EditCommand::Indent);
    assert_eq!(editor.active().text(), "    pass");
    assert_eq!(editor.active().cursor_position(), Position::new(0, 4));

    edit(&mut editor, EditCommand::Indent);
    edit(&mut editor, EditCommand::Unindent);
    assert_eq!(editor.active().text(), "    pass");
    edit(&mut editor, EditCommand::Unindent);
    assert_eq!(editor.active().text(), "pass");
    assert_eq!(edit(&mut editor, EditCommand::Unindent), CommandResult::Unchanged);
}

#[test]
fn test_vertical_movement_keeps_preferred_column() {
    let mut editor = Editor::new(NoopProcessor);
    edit(
        &mut editor,
        EditCommand::InsertText {
            text: "long line\nab\nanother line".to_string(),
        },
    );
    cursor(
        &mut editor,
        CursorCommand::MoveTo {
            position: Position::new(0, 7),
            extend: false,
        },
    );

    cursor(&mut editor, CursorCommand::Down { extend: false });
    assert_eq!(editor.active().cursor_position(), Position::new(1, 2));
    cursor(&mut editor, CursorCommand::Down { extend: false });
    assert_eq!(editor.active().cursor_position(), Position::new(2, 7));
}

#[test]
fn test_open_paths_replaces_pristine_untitled_tab() {
    let dir = tempdir().unwrap();
    let existing = dir.path().join("exists.txt");
    fs::write(&existing, "content").unwrap();
    let missing = dir.path().join("new.txt");

    let mut editor = Editor::new(NoopProcessor);
    let errors = editor.open_paths([existing.clone(), missing.clone()]);
    assert!(errors.is_empty());

    let names: Vec<String> = editor
        .tabs()
        .labels()
        .into_iter()
        .map(|label| label.name)
        .collect();
    assert_eq!(names, vec!["exists.txt".to_string(), "new.txt".to_string()]);
    assert_eq!(editor.active().path(), Some(missing.as_path()));
    assert_eq!(editor.active().state(), SessionState::Named);
    assert_eq!(editor.active().text(), "");
    assert!(!missing.exists());
}

#[test]
fn test_new_file_and_tab_switching() {
    let mut editor = Editor::new(NoopProcessor);
    let first = editor.active_id();
    let CommandResult::Opened { id: second } = editor.execute(Command::NewFile).unwrap() else {
        panic!("expected CommandResult::Opened");
    };
    assert_eq!(editor.status(), "New file created");
    assert_eq!(editor.active_id(), second);

    editor.execute(Command::PrevTab).unwrap();
    assert_eq!(editor.active_id(), first);
    editor.execute(Command::SelectTab { id: second }).unwrap();
    assert_eq!(editor.active_id(), second);
}
