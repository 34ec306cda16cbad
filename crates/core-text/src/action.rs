//! Reversible edit records.
//!
//! Each variant captures exactly what is needed to invert itself against a
//! `LineBuffer`: `execute` re-applies the change through the raw (unrecorded)
//! primitives and `undo` reverts it. For every variant
//! `undo(execute(state)) == state` holds for line content and line count.
//! `Group` replays children forward in order and undoes them in reverse.

use crate::{LineBuffer, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoableAction {
    InsertChar {
        at: Position,
        ch: char,
    },
    DeleteChar {
        at: Position,
        ch: char,
    },
    InsertLine {
        line: usize,
        text: String,
    },
    /// `sole` marks removal of the buffer's only line, which empties it instead.
    DeleteLine {
        line: usize,
        text: String,
        sole: bool,
    },
    SplitLine {
        at: Position,
    },
    /// `at.col` is the join column: the length of `at.line` before the join.
    JoinLines {
        at: Position,
    },
    DeleteRange {
        start: Position,
        end: Position,
        text: String,
    },
    ReplaceLine {
        line: usize,
        old: String,
        new: String,
    },
    Group(Vec<UndoableAction>),
}

impl UndoableAction {
    pub fn execute(&self, buf: &mut LineBuffer) {
        match self {
            Self::InsertChar { at, ch } => {
                buf.insert_char_raw(*at, *ch);
            }
            Self::DeleteChar { at, .. } => {
                buf.delete_char_raw(*at);
            }
            Self::InsertLine { line, text } => {
                buf.insert_line_raw(*line, text);
            }
            Self::DeleteLine { line, .. } => {
                buf.delete_line_raw(*line);
            }
            Self::SplitLine { at } => {
                buf.split_line_raw(*at);
            }
            Self::JoinLines { at } => {
                buf.join_lines_raw(at.line);
            }
            Self::DeleteRange { start, end, .. } => {
                buf.delete_range_raw(*start, *end);
            }
            Self::ReplaceLine { line, new, .. } => {
                buf.replace_line_raw(*line, new);
            }
            Self::Group(children) => {
                for child in children {
                    child.execute(buf);
                }
            }
        }
    }

    pub fn undo(&self, buf: &mut LineBuffer) {
        match self {
            Self::InsertChar { at, .. } => {
                buf.delete_char_raw(*at);
            }
            Self::DeleteChar { at, ch } => {
                buf.insert_char_raw(*at, *ch);
            }
            Self::InsertLine { line, .. } => {
                buf.delete_line_raw(*line);
            }
            Self::DeleteLine { line, text, sole } => {
                if *sole {
                    buf.replace_line_raw(0, text);
                } else {
                    buf.insert_line_raw(*line, text);
                }
            }
            Self::SplitLine { at } => {
                buf.join_lines_raw(at.line);
            }
            Self::JoinLines { at } => {
                buf.split_line_raw(*at);
            }
            Self::DeleteRange { start, text, .. } => {
                buf.restore_range_raw(*start, text);
            }
            Self::ReplaceLine { line, old, .. } => {
                buf.replace_line_raw(*line, old);
            }
            Self::Group(children) => {
                for child in children.iter().rev() {
                    child.undo(buf);
                }
            }
        }
    }

    /// Where the cursor should land after this change is undone or redone.
    pub fn cursor_hint(&self) -> Position {
        match self {
            Self::InsertChar { at, .. } | Self::DeleteChar { at, .. } => *at,
            Self::SplitLine { at } | Self::JoinLines { at } => *at,
            Self::InsertLine { line, .. }
            | Self::DeleteLine { line, .. }
            | Self::ReplaceLine { line, .. } => Position::new(*line, 0),
            Self::DeleteRange { start, .. } => *start,
            Self::Group(children) => children
                .first()
                .map(UndoableAction::cursor_hint)
                .unwrap_or_default(),
        }
    }

    /// Number of primitive (non-group) actions contained.
    pub fn len(&self) -> usize {
        match self {
            Self::Group(children) => children.iter().map(UndoableAction::len).sum(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Receiver for actions produced by the recording buffer primitives.
pub trait UndoSink {
    fn record(&mut self, action: UndoableAction);
}

impl UndoSink for Vec<UndoableAction> {
    fn record(&mut self, action: UndoableAction) {
        self.push(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn snapshot(b: &LineBuffer) -> Vec<String> {
        b.lines().to_vec()
    }

    fn check_inverse(initial: &[&str], action: UndoableAction) {
        let mut b = LineBuffer::from_lines("t", initial.iter().copied());
        let before = snapshot(&b);
        action.execute(&mut b);
        action.undo(&mut b);
        assert_eq!(snapshot(&b), before, "inverse law broken for {action:?}");
    }

    #[test]
    fn every_variant_is_its_own_inverse() {
        let base = ["alpha", "beta", "gamma"];
        check_inverse(
            &base,
            UndoableAction::InsertChar {
                at: Position::new(1, 2),
                ch: 'Z',
            },
        );
        check_inverse(
            &base,
            UndoableAction::DeleteChar {
                at: Position::new(0, 0),
                ch: 'a',
            },
        );
        check_inverse(
            &base,
            UndoableAction::InsertLine {
                line: 3,
                text: "delta".into(),
            },
        );
        check_inverse(
            &base,
            UndoableAction::DeleteLine {
                line: 1,
                text: "beta".into(),
                sole: false,
            },
        );
        check_inverse(
            &["solo"],
            UndoableAction::DeleteLine {
                line: 0,
                text: "solo".into(),
                sole: true,
            },
        );
        check_inverse(
            &base,
            UndoableAction::SplitLine {
                at: Position::new(2, 3),
            },
        );
        check_inverse(
            &base,
            UndoableAction::JoinLines {
                at: Position::new(0, 5),
            },
        );
        check_inverse(
            &base,
            UndoableAction::DeleteRange {
                start: Position::new(0, 3),
                end: Position::new(2, 1),
                text: "ha\nbeta\ng".into(),
            },
        );
        check_inverse(
            &base,
            UndoableAction::ReplaceLine {
                line: 2,
                old: "gamma".into(),
                new: "GAMMA".into(),
            },
        );
    }

    #[test]
    fn group_undoes_in_reverse_order() {
        let mut b = LineBuffer::from_str("t", "ab");
        let group = UndoableAction::Group(vec![
            UndoableAction::SplitLine {
                at: Position::new(0, 1),
            },
            UndoableAction::InsertChar {
                at: Position::new(1, 0),
                ch: 'x',
            },
            UndoableAction::InsertLine {
                line: 2,
                text: "tail".into(),
            },
        ]);
        group.execute(&mut b);
        assert_eq!(snapshot(&b), vec!["a", "xb", "tail"]);
        group.undo(&mut b);
        assert_eq!(snapshot(&b), vec!["ab"]);
        assert_eq!(group.len(), 3);
        assert_eq!(group.cursor_hint(), Position::new(0, 1));
    }

    #[derive(Debug, Clone)]
    enum Op {
        InsertChar(usize, usize, char),
        DeleteChar(usize, usize),
        InsertLine(usize, String),
        DeleteLine(usize),
        Split(usize, usize),
        Join(usize),
        DeleteRange(usize, usize, usize, usize),
        Replace(usize, String),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..6, 0usize..10, prop::char::range('a', 'z'))
                .prop_map(|(l, c, ch)| Op::InsertChar(l, c, ch)),
            (0usize..6, 0usize..10).prop_map(|(l, c)| Op::DeleteChar(l, c)),
            (0usize..7, "[a-z ]{0,6}").prop_map(|(l, s)| Op::InsertLine(l, s)),
            (0usize..6).prop_map(Op::DeleteLine),
            (0usize..6, 0usize..10).prop_map(|(l, c)| Op::Split(l, c)),
            (0usize..6).prop_map(Op::Join),
            (0usize..6, 0usize..10, 0usize..6, 0usize..10)
                .prop_map(|(a, b, c, d)| Op::DeleteRange(a, b, c, d)),
            (0usize..6, "[a-z]{0,6}").prop_map(|(l, s)| Op::Replace(l, s)),
        ]
    }

    fn apply(b: &mut LineBuffer, log: &mut Vec<UndoableAction>, op: &Op) {
        match op {
            Op::InsertChar(l, c, ch) => {
                b.insert_char(log, Position::new(*l, *c), *ch);
            }
            Op::DeleteChar(l, c) => {
                b.delete_char(log, Position::new(*l, *c));
            }
            Op::InsertLine(l, s) => {
                b.insert_line(log, *l, s);
            }
            Op::DeleteLine(l) => {
                b.delete_line(log, *l);
            }
            Op::Split(l, c) => {
                b.split_line(log, Position::new(*l, *c));
            }
            Op::Join(l) => {
                b.join_lines(log, *l);
            }
            Op::DeleteRange(a, c1, d, c2) => {
                b.delete_range(log, Position::new(*a, *c1), Position::new(*d, *c2));
            }
            Op::Replace(l, s) => {
                b.replace_line(log, *l, s);
            }
        }
    }

    proptest! {
        #[test]
        fn recorded_sequences_undo_to_original(
            initial in prop::collection::vec("[a-z ]{0,8}", 1..5),
            ops in prop::collection::vec(op_strategy(), 0..24),
        ) {
            let mut b = LineBuffer::from_lines("t", initial.clone());
            let mut log = Vec::new();
            for op in &ops {
                apply(&mut b, &mut log, op);
            }
            let after = snapshot(&b);
            let group = UndoableAction::Group(log);
            group.undo(&mut b);
            prop_assert_eq!(snapshot(&b), initial);
            group.execute(&mut b);
            prop_assert_eq!(snapshot(&b), after);
        }
    }
}
