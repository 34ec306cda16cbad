//! Shift (`>` / `<`) and join (`J`) line operations.

use core_config::EditorOptions;
use core_state::UndoLog;
use core_text::{LineBuffer, Position};
use tracing::trace;

fn leading_width(line: &str, tabstop: usize) -> (usize, usize) {
    let mut width = 0;
    let mut bytes = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += tabstop - width % tabstop,
            _ => break,
        }
        bytes += c.len_utf8();
    }
    (width, bytes)
}

/// Re-indent `first..=last` by one `shiftwidth` (`outdent` removes one).
/// Empty lines are left alone. All changes form one undo step. Returns the
/// number of lines changed.
pub fn shift_lines(
    buf: &mut LineBuffer,
    undo: &mut UndoLog,
    first: usize,
    last: usize,
    opts: &EditorOptions,
    outdent: bool,
) -> usize {
    let last = last.min(buf.last_line());
    let opened = undo.begin_group();
    let mut changed = 0;
    for idx in first..=last {
        let Some(line) = buf.line(idx) else { continue };
        if line.is_empty() {
            continue;
        }
        let (width, bytes) = leading_width(line, opts.tabstop.max(1));
        let target = if outdent {
            width.saturating_sub(opts.shiftwidth)
        } else {
            width + opts.shiftwidth
        };
        let new_line = format!("{}{}", opts.indent_for(target), &line[bytes..]);
        if new_line != line {
            buf.replace_line(undo, idx, &new_line);
            changed += 1;
        }
    }
    if opened {
        undo.end_group();
    }
    trace!(target: "actions.operator", first, last, outdent, changed, "shift_lines");
    changed
}

/// `J`: append line `idx + 1` to `idx`, dropping the next line's leading
/// whitespace and separating the two with one space (none when the current
/// line is empty or already ends in a blank, or the next line is empty or
/// starts with `)`). Returns the column of the join point.
pub fn join_below(buf: &mut LineBuffer, undo: &mut UndoLog, idx: usize) -> Option<Position> {
    if idx + 1 >= buf.line_count() {
        return None;
    }
    let opened = undo.begin_group();
    let next = buf.line(idx + 1).unwrap_or_default().to_string();
    let trimmed = next.trim_start();
    if trimmed.len() != next.len() {
        buf.replace_line(undo, idx + 1, trimmed);
    }
    let current = buf.line(idx).unwrap_or_default();
    let needs_space = !current.is_empty()
        && !current.ends_with([' ', '\t'])
        && !trimmed.is_empty()
        && !trimmed.starts_with(')');
    let Some(col) = buf.join_lines(undo, idx) else {
        if opened {
            undo.end_group();
        }
        return None;
    };
    let at = Position::new(idx, col);
    if needs_space {
        buf.insert_char(undo, at, ' ');
    }
    if opened {
        undo.end_group();
    }
    Some(if needs_space || col == 0 {
        at
    } else {
        Position::new(idx, col.saturating_sub(1))
    })
}

/// Join every line in `first..last` with its successor (Visual `J`).
pub fn join_range(
    buf: &mut LineBuffer,
    undo: &mut UndoLog,
    first: usize,
    last: usize,
) -> Option<Position> {
    let count = last.max(first + 1) - first;
    let opened = undo.begin_group();
    let mut at = None;
    for _ in 0..count {
        match join_below(buf, undo, first) {
            Some(pos) => at = Some(pos),
            None => break,
        }
    }
    if opened {
        undo.end_group();
    }
    at
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(b: &LineBuffer) -> Vec<&str> {
        b.lines().iter().map(String::as_str).collect()
    }

    #[test]
    fn shift_right_skips_empty_lines() {
        let mut b = LineBuffer::from_str("t", "a\n\n  b");
        let mut u = UndoLog::new();
        let n = shift_lines(&mut b, &mut u, 0, 2, &EditorOptions::default(), false);
        assert_eq!(n, 2);
        assert_eq!(lines(&b), vec!["    a", "", "      b"]);
        assert_eq!(u.undo_depth(), 1);
        u.undo(&mut b);
        assert_eq!(lines(&b), vec!["a", "", "  b"]);
    }

    #[test]
    fn shift_left_clamps_at_zero() {
        let mut b = LineBuffer::from_str("t", "      a\n  b\nc");
        let mut u = UndoLog::new();
        shift_lines(&mut b, &mut u, 0, 2, &EditorOptions::default(), true);
        assert_eq!(lines(&b), vec!["  a", "b", "c"]);
    }

    #[test]
    fn shift_uses_tabs_without_expandtab() {
        let opts = EditorOptions {
            expandtab: false,
            shiftwidth: 4,
            tabstop: 4,
            ..EditorOptions::default()
        };
        let mut b = LineBuffer::from_str("t", "\tx");
        let mut u = UndoLog::new();
        shift_lines(&mut b, &mut u, 0, 0, &opts, false);
        assert_eq!(lines(&b), vec!["\t\tx"]);

        let odd = EditorOptions {
            shiftwidth: 3,
            ..opts
        };
        let mut b = LineBuffer::from_str("t", "\tx");
        shift_lines(&mut b, &mut u, 0, 0, &odd, false);
        assert_eq!(lines(&b), vec!["\t   x"]);
    }

    #[test]
    fn join_inserts_single_space() {
        let mut b = LineBuffer::from_str("t", "foo\n    bar\nbaz");
        let mut u = UndoLog::new();
        assert_eq!(join_below(&mut b, &mut u, 0), Some(Position::new(0, 3)));
        assert_eq!(lines(&b), vec!["foo bar", "baz"]);
        assert_eq!(u.undo_depth(), 1);
        u.undo(&mut b);
        assert_eq!(lines(&b), vec!["foo", "    bar", "baz"]);
        assert_eq!(join_below(&mut b, &mut u, 2), None);
    }

    #[test]
    fn join_range_collapses_lines() {
        let mut b = LineBuffer::from_str("t", "a\nb\nc\nd");
        let mut u = UndoLog::new();
        join_range(&mut b, &mut u, 0, 2);
        assert_eq!(lines(&b), vec!["a b c", "d"]);
        assert_eq!(u.undo_depth(), 1);
    }
}
