use lwedit_core::{
    Command, CommandError, CommandResult, EditCommand, Editor, FileError, NoopProcessor,
    SessionState, open_file, save_file,
};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_save_then_open_preserves_bytes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("crlf.txt");
    let content = "first\r\nsecond\n\nno newline at end";

    save_file(&path, content).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), content);
    assert_eq!(open_file(&path).unwrap(), content);
}

#[test]
fn test_open_missing_file_is_read_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.txt");

    let err = open_file(&path).unwrap_err();
    assert!(matches!(err, FileError::Read { .. }));
    assert_eq!(err.path(), path.as_path());
}

#[test]
fn test_open_non_utf8_file_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("latin1.txt");
    fs::write(&path, [0x63, 0x61, 0x66, 0xe9]).unwrap();

    let err = open_file(&path).unwrap_err();
    assert!(matches!(err, FileError::InvalidUtf8 { .. }));
}

#[test]
fn test_save_into_missing_directory_is_write_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no").join("such").join("dir.txt");

    let err = save_file(&path, "x").unwrap_err();
    assert!(matches!(err, FileError::Write { .. }));
    assert!(err.to_string().starts_with("cannot write"));
}

#[test]
fn test_failed_open_leaves_tabs_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.txt");
    let mut editor = Editor::new(NoopProcessor);

    let err = editor
        .execute(Command::OpenFile { path: path.clone() })
        .unwrap_err();
    assert!(matches!(err, CommandError::File(FileError::Read { .. })));
    assert_eq!(editor.tabs().len(), 1);
    assert!(editor.status().starts_with("cannot read"));
}

#[test]
fn test_failed_save_keeps_session_modified() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gone").join("out.txt");
    let mut editor = Editor::new(NoopProcessor);
    editor
        .execute(Command::Edit(EditCommand::InsertText {
            text: "data".to_string(),
        }))
        .unwrap();

    assert!(editor.execute(Command::SaveAs { path }).is_err());
    assert_eq!(editor.active().state(), SessionState::Untitled);
    assert!(editor.active().is_modified());
}

#[test]
fn test_open_file_command_loads_content_clean() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hello.py");
    fs::write(&path, "print('hi')\n").unwrap();
    let mut editor = Editor::new(NoopProcessor);

    let result = editor
        .execute(Command::OpenFile { path: path.clone() })
        .unwrap();
    assert!(matches!(result, CommandResult::Opened { .. }));
    assert_eq!(editor.tabs().len(), 2);
    assert_eq!(editor.active().text(), "print('hi')\n");
    assert_eq!(editor.active().display_name(), "hello.py");
    assert!(!editor.active().is_modified());
    assert_eq!(editor.status(), format!("Opened: {}", path.display()));
}
