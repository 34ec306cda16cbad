mod common;
use common::*;

use core_actions::{NEWEST_CHANGE, OLDEST_CHANGE, READONLY_MESSAGE};
use core_config::EditorOptions;
use core_state::Mode;
use core_text::Position;
use pretty_assertions::assert_eq;

#[test]
fn insert_and_escape_steps_cursor_back() {
    let mut s = Session::new(&[""]);
    s.keys("ihello<Esc>");
    assert_eq!(s.lines(), lines(&["hello"]));
    assert_eq!(s.cursor, Position::new(0, 4));
    assert_eq!(s.mode(), Mode::Normal);
}

#[test]
fn insert_session_is_one_undo_step() {
    let mut s = Session::new(&[""]);
    s.keys("ihello<CR>world<Esc>");
    assert_eq!(s.lines(), lines(&["hello", "world"]));
    s.keys("u");
    assert_eq!(s.lines(), lines(&[""]));
}

#[test]
fn append_variants() {
    let mut s = Session::new(&["  mid"]).at(0, 3);
    s.keys("ax<Esc>");
    assert_eq!(s.lines(), lines(&["  mixd"]));
    s.keys("Ay<Esc>");
    assert_eq!(s.lines(), lines(&["  mixdy"]));
    s.keys("Iz<Esc>");
    assert_eq!(s.lines(), lines(&["  zmixdy"]));
}

#[test]
fn backspace_at_column_zero_joins_lines() {
    let mut s = Session::new(&["ab", "cd"]).at(1, 0);
    s.keys("i<BS><Esc>");
    assert_eq!(s.lines(), lines(&["abcd"]));
    assert_eq!(s.cursor, Position::new(0, 1));
}

#[test]
fn backspace_at_document_start_is_noop() {
    let mut s = Session::new(&["ab"]);
    s.keys("i<BS><Esc>");
    assert_eq!(s.lines(), lines(&["ab"]));
    assert_eq!(s.orch.undo_depth(), 0);
}

#[test]
fn enter_splits_line() {
    let mut s = Session::new(&["abcd"]).at(0, 2);
    s.keys("i<CR><Esc>");
    assert_eq!(s.lines(), lines(&["ab", "cd"]));
    assert_eq!(s.cursor, Position::new(1, 0));
}

#[test]
fn delete_key_in_insert() {
    let mut s = Session::new(&["ab", "cd"]).at(0, 1);
    s.keys("i<Del><Del><Esc>");
    assert_eq!(s.lines(), lines(&["acd"]));
}

#[test]
fn tab_expands_to_next_tabstop() {
    let opts = EditorOptions {
        tabstop: 4,
        ..EditorOptions::default()
    };
    let mut s = Session::with_options(&["ab"], opts);
    s.keys("A<Tab>x<Esc>");
    assert_eq!(s.lines(), lines(&["ab  x"]));

    let opts = EditorOptions {
        expandtab: false,
        ..EditorOptions::default()
    };
    let mut s = Session::with_options(&[""], opts);
    s.keys("i<Tab><Esc>");
    assert_eq!(s.lines(), lines(&["\t"]));
}

#[test]
fn undo_and_redo_exhaustion_messages() {
    let mut s = Session::new(&["a"]);
    let res = s.keys("u");
    assert_eq!(res.message.as_deref(), Some(OLDEST_CHANGE));
    let res = s.keys("<C-r>");
    assert_eq!(res.message.as_deref(), Some(NEWEST_CHANGE));
}

#[test]
fn readonly_buffer_rejects_mutation() {
    let mut s = Session::new(&["abc"]);
    s.orch.buffer_mut().set_readonly(true);
    for script in ["x", "dd", "i", "o", "p", "J"] {
        let res = s.keys(script);
        assert_eq!(res.message.as_deref(), Some(READONLY_MESSAGE), "{script}");
        assert_eq!(s.mode(), Mode::Normal);
    }
    assert_eq!(s.lines(), lines(&["abc"]));
    // Yanking is still allowed.
    s.keys("yy");
    assert_eq!(s.unnamed().as_deref(), Some("abc\n"));
}

#[test]
fn command_line_is_handed_back() {
    let mut s = Session::new(&["abc"]);
    s.keys(":wq");
    assert_eq!(s.mode(), Mode::Command);
    assert_eq!(s.orch.pending_keys(), ":wq");
    let res = s.keys("<CR>");
    assert_eq!(res.command.as_deref(), Some("wq"));
    assert_eq!(res.mode, Mode::Normal);
}

#[test]
fn command_line_cancel() {
    let mut s = Session::new(&["abc"]);
    let res = s.keys(":<BS>");
    assert_eq!(res.mode, Mode::Normal);
    assert_eq!(res.command, None);
    let res = s.keys(":set<Esc>");
    assert_eq!(res.mode, Mode::Normal);
    assert_eq!(res.command, None);
}

#[test]
fn motions_keep_sticky_column() {
    let mut s = Session::new(&["abcdef", "ab", "abcdef"]).at(0, 4);
    s.keys("j");
    assert_eq!(s.cursor, Position::new(1, 1));
    s.keys("j");
    assert_eq!(s.cursor, Position::new(2, 4));
    s.keys("$k");
    assert_eq!(s.cursor, Position::new(1, 1));
}

#[test]
fn every_key_reports_dirty_when_state_changes() {
    let mut s = Session::new(&["abc"]);
    assert!(s.keys("l").dirty);
    assert!(!s.keys("<C-x>").dirty);
    assert!(s.keys("v").dirty);
    assert!(s.keys("<Esc>").dirty);
}
