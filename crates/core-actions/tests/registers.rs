mod common;
use common::*;

use pretty_assertions::assert_eq;

#[test]
fn named_register_round_trip() {
    let mut s = Session::new(&["one", "two"]);
    s.keys("\"ayyj\"ap");
    assert_eq!(s.lines(), lines(&["one", "two", "one"]));
    assert_eq!(s.register('a').as_deref(), Some("one\n"));
    // An explicit name leaves the unnamed register alone.
    assert_eq!(s.unnamed(), None);
}

#[test]
fn uppercase_name_appends() {
    let mut s = Session::new(&["foo bar"]);
    s.keys("\"aywW\"Aye");
    assert_eq!(s.register('a').as_deref(), Some("foo bar"));
}

#[test]
fn black_hole_discards_and_preserves_unnamed() {
    let mut s = Session::new(&["one", "two", "three"]);
    s.keys("yyj\"_dd");
    assert_eq!(s.lines(), lines(&["one", "three"]));
    assert_eq!(s.unnamed().as_deref(), Some("one\n"));
    assert_eq!(s.register('1'), None);
    s.keys("p");
    assert_eq!(s.lines(), lines(&["one", "three", "one"]));
}

#[test]
fn delete_shifts_history_but_not_yank_register() {
    let mut s = Session::new(&["one", "two", "three"]);
    s.keys("yyjdd");
    assert_eq!(s.register('0').as_deref(), Some("one\n"));
    assert_eq!(s.register('1').as_deref(), Some("two\n"));
    s.keys("dd");
    assert_eq!(s.register('1').as_deref(), Some("three\n"));
    assert_eq!(s.register('2').as_deref(), Some("two\n"));
    s.keys("\"0p");
    assert_eq!(s.lines(), lines(&["one", "one"]));
}

#[test]
fn invalid_register_name_clears_prefix() {
    let mut s = Session::new(&["abc"]);
    s.keys("\"!");
    assert_eq!(s.orch.pending_keys(), "");
    s.keys("x");
    assert_eq!(s.unnamed().as_deref(), Some("a"));
}

#[test]
fn register_prefix_is_shown_as_pending() {
    let mut s = Session::new(&["abc"]);
    s.keys("\"b");
    assert_eq!(s.orch.pending_keys(), "\"b");
    s.keys("x");
    assert_eq!(s.register('b').as_deref(), Some("a"));
    assert_eq!(s.orch.pending_keys(), "");
}
