mod common;
use common::*;

use core_config::EditorOptions;
use core_state::Mode;
use core_text::Position;
use pretty_assertions::assert_eq;

#[test]
fn charwise_delete_is_inclusive() {
    let mut s = Session::new(&["hello world"]).at(0, 2);
    s.keys("vllll");
    assert_eq!(s.mode(), Mode::Visual);
    let res = s.keys("d");
    assert_eq!(s.lines(), lines(&["heorld"]));
    assert_eq!(res.mode, Mode::Normal);
    assert!(s.orch.selection().is_none());
}

#[test]
fn linewise_delete_covers_whole_lines() {
    let mut s = Session::new(&["a", "b", "c", "d"]).at(1, 0);
    s.keys("Vjd");
    assert_eq!(s.lines(), lines(&["a", "d"]));
    assert_eq!(s.unnamed().as_deref(), Some("b\nc\n"));
}

#[test]
fn yank_returns_cursor_to_start() {
    let mut s = Session::new(&["hello world"]);
    s.keys("vey");
    assert_eq!(s.unnamed().as_deref(), Some("hello"));
    assert_eq!(s.cursor, Position::new(0, 0));
    assert_eq!(s.mode(), Mode::Normal);
}

#[test]
fn change_enters_insert_in_one_undo_step() {
    let mut s = Session::new(&["hello world"]);
    let res = s.keys("vec");
    assert_eq!(res.mode, Mode::Insert);
    s.keys("bye<Esc>");
    assert_eq!(s.lines(), lines(&["bye world"]));
    s.keys("u");
    assert_eq!(s.lines(), lines(&["hello world"]));
}

#[test]
fn o_swaps_anchor_and_live_end() {
    let mut s = Session::new(&["hello world"]).at(0, 2);
    s.keys("vllo");
    assert_eq!(s.cursor, Position::new(0, 2));
    let sel = s.orch.selection().copied().expect("selection");
    assert_eq!(sel.start, Position::new(0, 4));
    assert_eq!(sel.end, Position::new(0, 2));
    s.keys("hd");
    assert_eq!(s.lines(), lines(&["h world"]));
}

#[test]
fn v_and_shift_v_toggle() {
    let mut s = Session::new(&["abc"]);
    s.keys("vV");
    assert_eq!(s.mode(), Mode::VisualLine);
    s.keys("v");
    assert_eq!(s.mode(), Mode::Visual);
    s.keys("v");
    assert_eq!(s.mode(), Mode::Normal);
    assert!(s.orch.selection().is_none());
}

#[test]
fn indent_is_one_undo_group_and_exits() {
    let mut s = Session::new(&["a", "", "b"]);
    s.keys("Vjj>");
    assert_eq!(s.lines(), lines(&["    a", "", "    b"]));
    assert_eq!(s.mode(), Mode::Normal);
    assert_eq!(s.cursor, Position::new(0, 4));
    s.keys("u");
    assert_eq!(s.lines(), lines(&["a", "", "b"]));
}

#[test]
fn indent_can_keep_selection() {
    let opts = EditorOptions {
        keep_visual_on_indent: true,
        ..EditorOptions::default()
    };
    let mut s = Session::with_options(&["a", "b"], opts);
    s.keys("Vj>>");
    assert_eq!(s.lines(), lines(&["        a", "        b"]));
    assert_eq!(s.mode(), Mode::VisualLine);
    s.keys("<lt>");
    assert_eq!(s.lines(), lines(&["    a", "    b"]));
}

#[test]
fn outdent_removes_one_shiftwidth() {
    let mut s = Session::new(&["        a", "  b"]);
    s.keys("Vj<lt>");
    assert_eq!(s.lines(), lines(&["    a", "b"]));
}

#[test]
fn join_selected_lines() {
    let mut s = Session::new(&["a", "b", "c"]);
    s.keys("VjjJ");
    assert_eq!(s.lines(), lines(&["a b c"]));
    assert_eq!(s.mode(), Mode::Normal);
}

#[test]
fn linewise_put_replaces_selection() {
    let mut s = Session::new(&["one", "two"]);
    s.keys("yyjVp");
    assert_eq!(s.lines(), lines(&["one", "one"]));
    assert_eq!(s.unnamed().as_deref(), Some("two\n"));
}

#[test]
fn linewise_put_over_whole_buffer() {
    let mut s = Session::new(&["one", "two"]);
    s.keys("yyVjp");
    assert_eq!(s.lines(), lines(&["one"]));
}

#[test]
fn charwise_put_replaces_selection() {
    let mut s = Session::new(&["foo bar"]);
    s.keys("ywwvep");
    assert_eq!(s.lines(), lines(&["foo foo "]));
}

#[test]
fn gv_reselects_after_escape() {
    let mut s = Session::new(&["hello"]);
    s.keys("vl<Esc>");
    assert_eq!(s.mode(), Mode::Normal);
    s.keys("gvd");
    assert_eq!(s.lines(), lines(&["llo"]));
}

#[test]
fn readonly_buffer_rejects_visual_delete() {
    let mut s = Session::new(&["hello"]);
    s.orch.buffer_mut().set_readonly(true);
    let res = s.keys("vld");
    assert_eq!(
        res.message.as_deref(),
        Some(core_actions::READONLY_MESSAGE)
    );
    assert_eq!(s.lines(), lines(&["hello"]));
    s.keys("y");
    assert_eq!(s.unnamed().as_deref(), Some("he"));
}

#[test]
fn selection_ending_on_empty_line_takes_line_break() {
    let mut s = Session::new(&["ab", "", "cd"]).at(0, 1);
    s.keys("vjd");
    assert_eq!(s.lines(), lines(&["acd"]));
}
