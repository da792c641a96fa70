use lwedit_core::search::{find_all, find_next, find_next_wrapping};
use lwedit_core::{
    Command, CommandError, CommandResult, EditCommand, Editor, NoopProcessor, SearchError,
    SearchMatch, SearchOptions, replace_all,
};

fn opts(case_sensitive: bool, whole_word: bool, regex: bool) -> SearchOptions {
    SearchOptions {
        case_sensitive,
        whole_word,
        regex,
    }
}

fn type_text(editor: &mut Editor<NoopProcessor>, text: &str) {
    editor
        .execute(Command::Edit(EditCommand::InsertText {
            text: text.to_string(),
        }))
        .unwrap();
}

#[test]
fn test_replace_all_absent_query_is_identity() {
    let replaced = replace_all("alpha beta", "gamma", "delta").unwrap();
    assert_eq!(replaced.text, "alpha beta");
    assert_eq!(replaced.count, 0);
}

#[test]
fn test_replace_all_is_literal_and_non_overlapping() {
    let replaced = replace_all("aaaa", "aa", "b").unwrap();
    assert_eq!(replaced.text, "bb");
    assert_eq!(replaced.count, 2);

    // Pattern metacharacters are plain text.
    let replaced = replace_all("a.b a*b", ".", "$1").unwrap();
    assert_eq!(replaced.text, "a$1b a*b");
    assert_eq!(replaced.count, 1);
}

#[test]
fn test_replace_all_second_run_is_noop() {
    let first = replace_all("x = foo(foo)", "foo", "bar").unwrap();
    assert_eq!(first.count, 2);
    let second = replace_all(&first.text, "foo", "bar").unwrap();
    assert_eq!(second.count, 0);
    assert_eq!(second.text, first.text);
}

#[test]
fn test_replace_all_rejects_empty_query() {
    assert_eq!(replace_all("abc", "", "x"), Err(SearchError::EmptyQuery));

    let mut editor = Editor::new(NoopProcessor);
    type_text(&mut editor, "abc");
    let err = editor
        .execute(Command::ReplaceAll {
            search: String::new(),
            replace: "x".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, CommandError::Search(SearchError::EmptyQuery)));
    assert_eq!(editor.active().text(), "abc");
    assert_eq!(editor.status(), "search text must not be empty");
}

#[test]
fn test_hello_becomes_bye_in_one_undo_step() {
    let mut editor = Editor::new(NoopProcessor);
    type_text(&mut editor, "hello hello");

    let result = editor
        .execute(Command::ReplaceAll {
            search: "hello".to_string(),
            replace: "bye".to_string(),
        })
        .unwrap();
    assert_eq!(result, CommandResult::Replaced { count: 2 });
    assert_eq!(editor.active().text(), "bye bye");
    assert_eq!(editor.status(), "Replaced 2 occurrences");

    editor.execute(Command::Edit(EditCommand::Undo)).unwrap();
    assert_eq!(editor.active().text(), "hello hello");
    editor.execute(Command::Edit(EditCommand::Redo)).unwrap();
    assert_eq!(editor.active().text(), "bye bye");
}

#[test]
fn test_replace_with_no_match_leaves_history_untouched() {
    let mut editor = Editor::new(NoopProcessor);
    type_text(&mut editor, "hello");
    let depth = editor.active().undo_depth();

    let result = editor
        .execute(Command::ReplaceAll {
            search: "zzz".to_string(),
            replace: "y".to_string(),
        })
        .unwrap();
    assert_eq!(result, CommandResult::Replaced { count: 0 });
    assert_eq!(editor.active().undo_depth(), depth);
}

#[test]
fn test_replace_with_itself_records_nothing() {
    let mut editor = Editor::new(NoopProcessor);
    type_text(&mut editor, "hello hello");
    let depth = editor.active().undo_depth();
    let version = editor.active().version();

    let result = editor
        .execute(Command::ReplaceAll {
            search: "hello".to_string(),
            replace: "hello".to_string(),
        })
        .unwrap();
    assert_eq!(result, CommandResult::Replaced { count: 2 });
    assert_eq!(editor.active().text(), "hello hello");
    assert_eq!(editor.active().undo_depth(), depth);
    assert_eq!(editor.active().version(), version);
}

#[test]
fn test_find_uses_char_offsets() {
    let text = "héllo wörld wörld";
    let found = find_next(text, "wörld", SearchOptions::default(), 0)
        .unwrap()
        .unwrap();
    assert_eq!(found, SearchMatch { start: 6, end: 11 });

    let all = find_all(text, "WÖRLD", opts(false, false, false)).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1], SearchMatch { start: 12, end: 17 });
}

#[test]
fn test_find_whole_word_and_wrap() {
    let text = "foobar foo barfoo foo";
    let found = find_next(text, "foo", opts(true, true, false), 0)
        .unwrap()
        .unwrap();
    assert_eq!((found.start, found.end), (7, 10));

    let wrapped = find_next_wrapping(text, "foobar", SearchOptions::default(), 5)
        .unwrap()
        .unwrap();
    assert_eq!((wrapped.start, wrapped.end), (0, 6));
}

#[test]
fn test_find_next_command_selects_matches_in_turn() {
    let mut editor = Editor::new(NoopProcessor);
    type_text(&mut editor, "ab ab ab");

    let mut starts = Vec::new();
    for _ in 0..4 {
        let result = editor
            .execute(Command::FindNext {
                query: "ab".to_string(),
                options: SearchOptions::default(),
            })
            .unwrap();
        let CommandResult::SearchMatch { start, end } = result else {
            panic!("expected CommandResult::SearchMatch");
        };
        assert_eq!(editor.active().selection(), Some(start..end));
        starts.push(start);
    }
    // The cursor starts at the end of the typed text, so the search wraps first.
    assert_eq!(starts, vec![0, 3, 6, 0]);

    let result = editor
        .execute(Command::FindNext {
            query: "zz".to_string(),
            options: SearchOptions::default(),
        })
        .unwrap();
    assert_eq!(result, CommandResult::SearchNotFound);
}

#[test]
fn test_invalid_regex_is_reported() {
    let err = find_all("abc", "(", opts(true, false, true)).unwrap_err();
    assert!(matches!(err, SearchError::InvalidRegex(_)));
}
