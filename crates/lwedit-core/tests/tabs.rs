use lwedit_core::{
    Command, CommandError, CommandResult, EditCommand, Editor, NoopProcessor, SessionState, TabError,
    TabManager, UNTITLED_NAME,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_closing_last_tab_opens_fresh_untitled() {
    let mut tabs = TabManager::new();
    let only = tabs.active_id();
    tabs.active_mut().insert_text("scratch");

    let closed = tabs.close(only).unwrap();
    assert_eq!(closed.text(), "scratch");

    assert_eq!(tabs.len(), 1);
    assert!(!tabs.contains(only));
    let fresh = tabs.active();
    assert_eq!(fresh.state(), SessionState::Untitled);
    assert_eq!(fresh.text(), "");
    assert_eq!(fresh.display_name(), UNTITLED_NAME);
    assert!(!fresh.is_modified());
}

#[test]
fn test_closing_active_tab_activates_neighbour() {
    let mut tabs = TabManager::new();
    let first = tabs.active_id();
    let second = tabs.new_untitled();
    let third = tabs.new_untitled();

    tabs.select(second).unwrap();
    tabs.close(second).unwrap();
    assert_eq!(tabs.active_id(), third);

    tabs.close(third).unwrap();
    assert_eq!(tabs.active_id(), first);
    assert_eq!(tabs.ids(), vec![first]);
}

#[test]
fn test_closing_inactive_tab_keeps_selection() {
    let mut tabs = TabManager::new();
    let first = tabs.active_id();
    let second = tabs.new_untitled();

    tabs.close(first).unwrap();
    assert_eq!(tabs.active_id(), second);
    assert_eq!(tabs.len(), 1);
}

#[test]
fn test_unknown_tab_is_an_error() {
    let mut tabs = TabManager::new();
    let first = tabs.active_id();
    tabs.new_untitled();
    tabs.close(first).unwrap();

    assert_eq!(tabs.close(first).unwrap_err(), TabError::TabNotFound(first));
    assert_eq!(tabs.select(first), Err(TabError::TabNotFound(first)));
}

#[test]
fn test_select_next_and_prev_wrap() {
    let mut tabs = TabManager::new();
    let first = tabs.active_id();
    let second = tabs.new_untitled();

    tabs.select_next();
    assert_eq!(tabs.active_id(), first);
    tabs.select_prev();
    assert_eq!(tabs.active_id(), second);
}

#[test]
fn test_opening_same_path_selects_existing_tab() {
    let mut tabs = TabManager::new();
    let path = PathBuf::from("/tmp/lwedit-demo/notes.txt");
    let id = tabs.open(path.clone(), "first");
    tabs.new_untitled();

    let again = tabs.open(path, "second");
    assert_eq!(again, id);
    assert_eq!(tabs.active_id(), id);
    assert_eq!(tabs.active().text(), "first");
    assert_eq!(tabs.len(), 3);
}

#[test]
fn test_labels_report_name_and_modified_state() {
    let mut tabs = TabManager::new();
    tabs.open(PathBuf::from("/tmp/lwedit-demo/main.py"), "print(1)\n");
    tabs.active_mut().insert_text("#");

    let labels = tabs.labels();
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[0].name, UNTITLED_NAME);
    assert!(!labels[0].modified);
    assert!(!labels[0].active);
    assert_eq!(labels[1].name, "main.py");
    assert!(labels[1].modified);
    assert!(labels[1].active);
    assert!(labels.iter().all(|label| label.closable));
    assert_eq!(tabs.modified_count(), 1);
}

#[test]
fn test_close_command_reports_replacement() {
    let mut editor = Editor::new(NoopProcessor);
    editor
        .execute(Command::Edit(EditCommand::InsertText {
            text: "x".to_string(),
        }))
        .unwrap();
    let id = editor.active_id();

    let result = editor.execute(Command::CloseTab { id }).unwrap();
    assert_eq!(
        result,
        CommandResult::Closed {
            id,
            replaced_with_untitled: true,
        }
    );
    assert_eq!(editor.tabs().len(), 1);
    assert_eq!(editor.active().text(), "");
    assert_eq!(editor.status(), "Closed: Untitled");
}

#[test]
fn test_save_as_onto_path_owned_by_another_tab_is_refused() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.py");
    fs::write(&path, "original").unwrap();

    let mut editor = Editor::new(NoopProcessor);
    editor
        .execute(Command::OpenFile { path: path.clone() })
        .unwrap();
    let owner = editor.active_id();
    editor.execute(Command::NewFile).unwrap();
    editor
        .execute(Command::Edit(EditCommand::InsertText {
            text: "other".to_string(),
        }))
        .unwrap();
    let other = editor.active_id();

    let err = editor
        .execute(Command::SaveAs { path: path.clone() })
        .unwrap_err();
    assert!(matches!(
        err,
        CommandError::Tab(TabError::PathAlreadyOpen(ref p)) if *p == path
    ));
    assert!(editor.status().contains("already open in another tab"));

    // Nothing was written and the second tab is still unbound.
    assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    let session = editor.tabs().get(other).unwrap();
    assert_eq!(session.state(), SessionState::Untitled);
    assert!(session.is_modified());
    assert_eq!(editor.tabs().find_by_path(&path), Some(owner));
}

#[test]
fn test_save_as_onto_own_path_is_allowed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("b.py");

    let mut editor = Editor::new(NoopProcessor);
    editor
        .execute(Command::SaveAs { path: path.clone() })
        .unwrap();
    editor
        .execute(Command::Edit(EditCommand::InsertText {
            text: "x".to_string(),
        }))
        .unwrap();

    let result = editor
        .execute(Command::SaveAs { path: path.clone() })
        .unwrap();
    assert_eq!(result, CommandResult::Saved { path: path.clone() });
    assert_eq!(fs::read_to_string(&path).unwrap(), "x");
}
