//! Cursor motion helpers.
//!
//! Stateless functions over `(buffer, position[, char])`. Each returns the
//! target `Position`, or `None` when the motion has nowhere to go (search
//! miss, already at a boundary). Motions never mutate the buffer and never
//! depend on editor mode; callers decide how a target is used (cursor move,
//! operator range end, selection extension).
//!
//! Word motions use three character classes: blanks, word characters
//! (`[A-Za-z0-9_]`), and everything else (punctuation runs count as words of
//! their own, as in Vim).

use crate::{LineBuffer, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Blank,
    Word,
    Punct,
}

pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub fn class_of(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Blank
    } else if is_word_char(c) {
        CharClass::Word
    } else {
        CharClass::Punct
    }
}

fn moved(from: Position, to: Position) -> Option<Position> {
    (from != to).then_some(to)
}

/// Next position that holds a character, crossing line ends and skipping empty lines.
fn next_char_pos(buf: &LineBuffer, pos: Position) -> Option<Position> {
    if pos.col + 1 < buf.line_len(pos.line) {
        return Some(Position::new(pos.line, pos.col + 1));
    }
    (pos.line + 1..buf.line_count())
        .find(|&l| buf.line_len(l) > 0)
        .map(|l| Position::new(l, 0))
}

/// Previous position that holds a character, crossing line starts and skipping empty lines.
fn prev_char_pos(buf: &LineBuffer, pos: Position) -> Option<Position> {
    let len = buf.line_len(pos.line);
    if pos.col > 0 && len > 0 {
        return Some(Position::new(pos.line, pos.col.min(len) - 1));
    }
    (0..pos.line)
        .rev()
        .find(|&l| buf.line_len(l) > 0)
        .map(|l| Position::new(l, buf.line_len(l) - 1))
}

fn class_at(buf: &LineBuffer, pos: Position, classify: Classifier) -> CharClass {
    buf.char_at(pos).map(classify).unwrap_or(CharClass::Blank)
}

/// `W`/`B`/`E` classification: any run of non-blanks is one WORD.
pub fn big_class_of(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Blank
    } else {
        CharClass::Word
    }
}

type Classifier = fn(char) -> CharClass;

/// `w`: skip the rest of the current word (or punctuation run), then blanks.
/// Reaching end of line continues on the first non-blank of the next line;
/// on the last line the target is one past the final character.
pub fn word_forward(buf: &LineBuffer, pos: Position) -> Option<Position> {
    word_forward_by(buf, pos, class_of)
}

/// `W`
pub fn big_word_forward(buf: &LineBuffer, pos: Position) -> Option<Position> {
    word_forward_by(buf, pos, big_class_of)
}

fn word_forward_by(buf: &LineBuffer, pos: Position, classify: Classifier) -> Option<Position> {
    let chars = buf.line_chars(pos.line);
    let len = chars.len();
    let mut col = pos.col.min(len);
    if col < len {
        let cls = classify(chars[col]);
        if cls != CharClass::Blank {
            while col < len && classify(chars[col]) == cls {
                col += 1;
            }
        }
        while col < len && classify(chars[col]) == CharClass::Blank {
            col += 1;
        }
        if col < len {
            return Some(Position::new(pos.line, col));
        }
    }
    if pos.line + 1 < buf.line_count() {
        let next = pos.line + 1;
        return Some(first_non_blank(buf, next));
    }
    moved(pos, Position::new(pos.line, len))
}

/// `b`: back to the start of the previous word, crossing line starts.
pub fn word_backward(buf: &LineBuffer, pos: Position) -> Option<Position> {
    word_backward_by(buf, pos, class_of)
}

/// `B`
pub fn big_word_backward(buf: &LineBuffer, pos: Position) -> Option<Position> {
    word_backward_by(buf, pos, big_class_of)
}

fn word_backward_by(buf: &LineBuffer, pos: Position, classify: Classifier) -> Option<Position> {
    let mut cur = prev_char_pos(buf, pos)?;
    while class_at(buf, cur, classify) == CharClass::Blank {
        cur = prev_char_pos(buf, cur)?;
    }
    let cls = class_at(buf, cur, classify);
    let chars = buf.line_chars(cur.line);
    let mut col = cur.col;
    while col > 0 && classify(chars[col - 1]) == cls {
        col -= 1;
    }
    Some(Position::new(cur.line, col))
}

/// `e`: forward to the last character of the next word end (always moves at least one cell).
pub fn word_end(buf: &LineBuffer, pos: Position) -> Option<Position> {
    word_end_by(buf, pos, class_of)
}

/// `E`
pub fn big_word_end(buf: &LineBuffer, pos: Position) -> Option<Position> {
    word_end_by(buf, pos, big_class_of)
}

fn word_end_by(buf: &LineBuffer, pos: Position, classify: Classifier) -> Option<Position> {
    let mut cur = next_char_pos(buf, pos)?;
    while class_at(buf, cur, classify) == CharClass::Blank {
        cur = next_char_pos(buf, cur)?;
    }
    Some(run_end(buf, cur, classify))
}

/// End of the word under the cursor; falls back to `word_end` on blanks.
/// Used by `cw`, which changes to the end of the current word rather than to
/// the start of the next one.
pub fn current_word_end(buf: &LineBuffer, pos: Position) -> Option<Position> {
    current_word_end_by(buf, pos, class_of)
}

/// `cW` counterpart of `current_word_end`.
pub fn current_big_word_end(buf: &LineBuffer, pos: Position) -> Option<Position> {
    current_word_end_by(buf, pos, big_class_of)
}

fn current_word_end_by(buf: &LineBuffer, pos: Position, classify: Classifier) -> Option<Position> {
    match buf.char_at(pos) {
        Some(c) if classify(c) != CharClass::Blank => Some(run_end(buf, pos, classify)),
        _ => word_end_by(buf, pos, classify),
    }
}

fn run_end(buf: &LineBuffer, pos: Position, classify: Classifier) -> Position {
    let chars = buf.line_chars(pos.line);
    let cls = classify(chars[pos.col]);
    let mut col = pos.col;
    while col + 1 < chars.len() && classify(chars[col + 1]) == cls {
        col += 1;
    }
    Position::new(pos.line, col)
}

/// `0`
pub fn line_start(_buf: &LineBuffer, pos: Position) -> Position {
    Position::new(pos.line, 0)
}

/// `^`: first non-blank column, or 0 for blank lines.
pub fn first_non_blank(buf: &LineBuffer, line: usize) -> Position {
    let col = buf
        .line_chars(line)
        .iter()
        .position(|c| !c.is_whitespace())
        .unwrap_or(0);
    Position::new(line, col)
}

/// `$`: last character column (0 on empty lines).
pub fn line_end(buf: &LineBuffer, pos: Position) -> Position {
    Position::new(pos.line, buf.line_len(pos.line).saturating_sub(1))
}

/// `gg`
pub fn file_start(_buf: &LineBuffer) -> Position {
    Position::origin()
}

/// `G`
pub fn file_end(buf: &LineBuffer) -> Position {
    Position::new(buf.last_line(), 0)
}

/// `f<c>`: next occurrence of `target` to the right on the current line.
pub fn find_char_forward(buf: &LineBuffer, pos: Position, target: char) -> Option<Position> {
    buf.line_chars(pos.line)
        .iter()
        .enumerate()
        .skip(pos.col + 1)
        .find(|(_, c)| **c == target)
        .map(|(i, _)| Position::new(pos.line, i))
}

/// `F<c>`: previous occurrence of `target` to the left on the current line.
pub fn find_char_backward(buf: &LineBuffer, pos: Position, target: char) -> Option<Position> {
    let chars = buf.line_chars(pos.line);
    let end = pos.col.min(chars.len());
    chars[..end]
        .iter()
        .rposition(|c| *c == target)
        .map(|i| Position::new(pos.line, i))
}

/// `t<c>`: one column before the next `target`.
pub fn till_char_forward(buf: &LineBuffer, pos: Position, target: char) -> Option<Position> {
    find_char_forward(buf, pos, target).map(|p| Position::new(p.line, p.col - 1))
}

/// `T<c>`: one column after the previous `target`.
pub fn till_char_backward(buf: &LineBuffer, pos: Position, target: char) -> Option<Position> {
    find_char_backward(buf, pos, target).map(|p| Position::new(p.line, p.col + 1))
}

/// `h`
pub fn left(_buf: &LineBuffer, pos: Position) -> Option<Position> {
    (pos.col > 0).then(|| Position::new(pos.line, pos.col - 1))
}

/// `l`. `past_end` allows landing one past the last character (Insert mode).
pub fn right(buf: &LineBuffer, pos: Position, past_end: bool) -> Option<Position> {
    let len = buf.line_len(pos.line);
    let max = if past_end { len } else { len.saturating_sub(1) };
    (pos.col < max).then(|| Position::new(pos.line, pos.col + 1))
}

/// `k`: previous line at `want_col` (clamped to that line's length).
pub fn up(buf: &LineBuffer, pos: Position, want_col: usize) -> Option<Position> {
    if pos.line == 0 {
        return None;
    }
    let line = pos.line - 1;
    Some(Position::new(line, want_col.min(buf.line_len(line))))
}

/// `j`: next line at `want_col` (clamped to that line's length).
pub fn down(buf: &LineBuffer, pos: Position, want_col: usize) -> Option<Position> {
    if pos.line + 1 >= buf.line_count() {
        return None;
    }
    let line = pos.line + 1;
    Some(Position::new(line, want_col.min(buf.line_len(line))))
}

/// Word (`[A-Za-z0-9_]+`) under or right of the cursor on the current line,
/// with the column it starts at.
pub fn word_at(buf: &LineBuffer, pos: Position) -> Option<(String, usize)> {
    let chars = buf.line_chars(pos.line);
    let mut start = pos.col.min(chars.len());
    while start < chars.len() && !is_word_char(chars[start]) {
        start += 1;
    }
    if start >= chars.len() {
        return None;
    }
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let end = (start..chars.len())
        .find(|&i| !is_word_char(chars[i]))
        .unwrap_or(chars.len());
    Some((chars[start..end].iter().collect(), start))
}
