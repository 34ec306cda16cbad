mod common;
use common::*;

use core_state::Mode;
use core_text::Position;
use pretty_assertions::assert_eq;

#[test]
fn dw_is_exclusive_of_next_word() {
    let mut s = Session::new(&["hello world"]);
    s.keys("dw");
    assert_eq!(s.lines(), lines(&["world"]));
    assert_eq!(s.unnamed().as_deref(), Some("hello "));
    assert_eq!(s.mode(), Mode::Normal);
}

#[test]
fn de_includes_word_end() {
    let mut s = Session::new(&["hello world"]);
    s.keys("de");
    assert_eq!(s.lines(), lines(&[" world"]));
}

#[test]
fn cw_behaves_like_ce_and_enters_insert() {
    let mut s = Session::new(&["hello world"]);
    let res = s.keys("cw");
    assert_eq!(res.mode, Mode::Insert);
    assert_eq!(s.lines(), lines(&[" world"]));
    s.keys("bye<Esc>");
    assert_eq!(s.lines(), lines(&["bye world"]));
}

#[test]
fn change_and_insert_undo_as_one_step() {
    let mut s = Session::new(&["hello world"]);
    s.keys("cwbye<Esc>");
    assert_eq!(s.orch.undo_depth(), 1);
    s.keys("u");
    assert_eq!(s.lines(), lines(&["hello world"]));
}

#[test]
fn dw_on_last_word_stops_at_line_end() {
    let mut s = Session::new(&["foo bar", "baz"]).at(0, 4);
    s.keys("dw");
    assert_eq!(s.lines(), lines(&["foo ", "baz"]));
    assert_eq!(s.cursor, Position::new(0, 3));
}

#[test]
fn dd_then_undo_restores_line_and_row() {
    let mut s = Session::new(&["a", "b", "c"]).at(1, 0);
    s.keys("dd");
    assert_eq!(s.lines(), lines(&["a", "c"]));
    assert_eq!(s.unnamed().as_deref(), Some("b\n"));
    s.keys("u");
    assert_eq!(s.lines(), lines(&["a", "b", "c"]));
    assert_eq!(s.cursor.line, 1);
}

#[test]
fn dd_on_sole_line_leaves_one_empty_line() {
    let mut s = Session::new(&["only"]);
    s.keys("dd");
    assert_eq!(s.lines(), lines(&[""]));
}

#[test]
fn line_end_and_shorthands() {
    let mut s = Session::new(&["hello world"]).at(0, 5);
    s.keys("d$");
    assert_eq!(s.lines(), lines(&["hello"]));

    let mut s = Session::new(&["hello world"]).at(0, 5);
    s.keys("D");
    assert_eq!(s.lines(), lines(&["hello"]));

    let mut s = Session::new(&["hello world"]).at(0, 6);
    s.keys("d0");
    assert_eq!(s.lines(), lines(&["world"]));
}

#[test]
fn file_jumps_are_linewise() {
    let mut s = Session::new(&["a", "b", "c"]).at(1, 0);
    s.keys("dG");
    assert_eq!(s.lines(), lines(&["a"]));

    let mut s = Session::new(&["a", "b", "c"]).at(1, 0);
    s.keys("dgg");
    assert_eq!(s.lines(), lines(&["c"]));
    assert_eq!(s.unnamed().as_deref(), Some("a\nb\n"));
}

#[test]
fn find_and_till_inclusivity() {
    let mut s = Session::new(&["a,b,c"]);
    s.keys("df,");
    assert_eq!(s.lines(), lines(&["b,c"]));

    let mut s = Session::new(&["a,b,c"]);
    s.keys("dt,");
    assert_eq!(s.lines(), lines(&[",b,c"]));

    let mut s = Session::new(&["a,b,c"]).at(0, 4);
    s.keys("dF,");
    assert_eq!(s.lines(), lines(&["a,bc"]));

    let mut s = Session::new(&["a,bxc"]).at(0, 4);
    s.keys("dT,");
    assert_eq!(s.lines(), lines(&["a,c"]));
}

#[test]
fn unknown_motion_cancels_without_touching_anything() {
    let mut s = Session::new(&["hello"]);
    s.keys("dz");
    assert_eq!(s.lines(), lines(&["hello"]));
    assert_eq!(s.unnamed(), None);
    assert_eq!(s.orch.pending_keys(), "");
}

#[test]
fn operator_pending_keys_are_reported() {
    let mut s = Session::new(&["hello"]);
    s.keys("d");
    assert_eq!(s.orch.pending_keys(), "d");
    s.keys("t");
    assert_eq!(s.orch.pending_keys(), "dt");
    s.keys("<Esc>");
    assert_eq!(s.orch.pending_keys(), "");
}

#[test]
fn cc_empties_line_and_keeps_it() {
    let mut s = Session::new(&["  foo", "bar"]);
    let res = s.keys("cc");
    assert_eq!(res.mode, Mode::Insert);
    assert_eq!(s.lines(), lines(&["", "bar"]));
}

#[test]
fn yy_p_duplicates_line() {
    let mut s = Session::new(&["hello"]);
    s.keys("yyp");
    assert_eq!(s.lines(), lines(&["hello", "hello"]));
    assert_eq!(s.cursor, Position::new(1, 0));
    assert!(s.orch.buffer().is_modified());
}

#[test]
fn yank_does_not_modify_buffer() {
    let mut s = Session::new(&["hello world"]);
    let tick = s.orch.buffer().change_tick();
    s.keys("yw");
    assert_eq!(s.orch.buffer().change_tick(), tick);
    assert_eq!(s.unnamed().as_deref(), Some("hello "));
}

#[test]
fn charwise_paste_after_and_before() {
    let mut s = Session::new(&["abc"]);
    s.keys("xp");
    assert_eq!(s.lines(), lines(&["bac"]));
    assert_eq!(s.cursor, Position::new(0, 1));

    let mut s = Session::new(&["abc"]).at(0, 2);
    s.keys("xP");
    assert_eq!(s.lines(), lines(&["acb"]));
}

#[test]
fn multi_line_charwise_paste_splits_line() {
    let mut s = Session::new(&["ab", "cd"]).at(0, 1);
    // "b\nc" deleted charwise, then pasted back in the middle of "ad".
    s.keys("vjhd");
    assert_eq!(s.lines(), lines(&["ad"]));
    s.keys("P");
    assert_eq!(s.lines(), lines(&["ab", "cd"]));
}

#[test]
fn paste_from_empty_register_is_noop() {
    let mut s = Session::new(&["abc"]);
    let res = s.keys("p");
    assert_eq!(s.lines(), lines(&["abc"]));
    assert!(!res.dirty);
}

#[test]
fn open_line_insert_undoes_in_one_step() {
    let mut s = Session::new(&["x"]);
    s.keys("oabc<Esc>");
    assert_eq!(s.lines(), lines(&["x", "abc"]));
    assert_eq!(s.orch.undo_depth(), 1);
    s.keys("u");
    assert_eq!(s.lines(), lines(&["x"]));
    s.keys("<C-r>");
    assert_eq!(s.lines(), lines(&["x", "abc"]));
}

#[test]
fn open_above_places_cursor_on_new_line() {
    let mut s = Session::new(&["x"]);
    s.keys("Oy<Esc>");
    assert_eq!(s.lines(), lines(&["y", "x"]));
    assert_eq!(s.cursor, Position::new(0, 0));
}

#[test]
fn x_and_big_x() {
    let mut s = Session::new(&["abc"]).at(0, 1);
    s.keys("x");
    assert_eq!(s.lines(), lines(&["ac"]));
    s.keys("X");
    assert_eq!(s.lines(), lines(&["c"]));
}

#[test]
fn join_with_next_line() {
    let mut s = Session::new(&["foo", "  bar"]);
    s.keys("J");
    assert_eq!(s.lines(), lines(&["foo bar"]));
    assert_eq!(s.cursor, Position::new(0, 3));
}
