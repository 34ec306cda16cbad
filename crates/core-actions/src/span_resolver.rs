//! Operator range resolution.
//!
//! Given the cursor and the motion that followed an operator key, compute the
//! `TextRange` the operator acts on. Delete, Change and Yank all resolve here
//! so they agree on inclusivity:
//!
//! | motion | range |
//! |---|---|
//! | `dd`-style repeat | current line, linewise |
//! | `w` / `W` | cursor up to the next word start (exclusive), never past end of line |
//! | `e` / `E` | cursor through the word end (inclusive) |
//! | `b` / `B` | previous word start up to the cursor (exclusive) |
//! | `0` | line start up to the cursor (exclusive) |
//! | `$` | cursor through end of line |
//! | `gg` / `G` | cursor line to first / last line, linewise |
//! | `f` `t` | cursor through the found / till column (inclusive) |
//! | `F` `T` | found / till column up to the cursor (exclusive) |
//!
//! Change swaps `w`/`W` for "to end of the current word" (`cw` == `ce`).
//! Nothing here mutates the buffer.

use core_text::{LineBuffer, Position, motion};

/// Region an operator applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRange {
    /// Half-open `[start, end)`, possibly spanning lines.
    Chars { start: Position, end: Position },
    /// Whole lines `first..=last`.
    Lines { first: usize, last: usize },
}

impl TextRange {
    pub fn is_linewise(&self) -> bool {
        matches!(self, TextRange::Lines { .. })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TextRange::Chars { start, end } if start == end)
    }

    /// Position the cursor settles on after the range is removed or yanked.
    pub fn start(&self) -> Position {
        match *self {
            TextRange::Chars { start, .. } => start,
            TextRange::Lines { first, .. } => Position::new(first, 0),
        }
    }

    /// Text for the register. Linewise content carries a trailing newline on
    /// every line.
    pub fn extract(&self, buf: &LineBuffer) -> String {
        match *self {
            TextRange::Chars { start, end } => buf.text_range(start, end),
            TextRange::Lines { first, last } => {
                let mut out = String::new();
                for idx in first..=last.min(buf.last_line()) {
                    out.push_str(buf.line(idx).unwrap_or_default());
                    out.push('\n');
                }
                out
            }
        }
    }
}

/// Motion codes accepted after `d`, `c` or `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorMotion {
    /// The operator key repeated (`dd`, `cc`, `yy`).
    Line,
    WordForward,
    BigWordForward,
    WordEnd,
    BigWordEnd,
    WordBackward,
    BigWordBackward,
    LineStart,
    FirstNonBlank,
    LineEnd,
    FileStart,
    FileEnd,
    FindForward(char),
    FindBackward(char),
    TillForward(char),
    TillBackward(char),
}

impl OperatorMotion {
    /// Map a single motion key. `g` and the `f`/`F`/`t`/`T` family need a
    /// second key and are not handled here.
    pub fn from_code(code: char, operator_key: char) -> Option<Self> {
        Some(match code {
            c if c == operator_key => Self::Line,
            'w' => Self::WordForward,
            'W' => Self::BigWordForward,
            'e' => Self::WordEnd,
            'E' => Self::BigWordEnd,
            'b' => Self::WordBackward,
            'B' => Self::BigWordBackward,
            '0' => Self::LineStart,
            '^' => Self::FirstNonBlank,
            '$' => Self::LineEnd,
            'G' => Self::FileEnd,
            _ => return None,
        })
    }

    /// Two-key motions: `gg` and `f`/`F`/`t`/`T` + character.
    pub fn from_pending(pending: char, code: char) -> Option<Self> {
        Some(match pending {
            'g' if code == 'g' => Self::FileStart,
            'f' => Self::FindForward(code),
            'F' => Self::FindBackward(code),
            't' => Self::TillForward(code),
            'T' => Self::TillBackward(code),
            _ => return None,
        })
    }

    pub fn needs_argument(code: char) -> bool {
        matches!(code, 'g' | 'f' | 'F' | 't' | 'T')
    }
}

fn after(pos: Position) -> Position {
    Position::new(pos.line, pos.col + 1)
}

fn chars(start: Position, end: Position) -> TextRange {
    TextRange::Chars { start, end }
}

/// Resolve `kind` from `cursor`. `change` selects the `cw` special case.
/// `None` means the motion failed (search miss, nowhere to go) and the
/// operator must cancel without touching anything.
pub fn resolve(
    buf: &LineBuffer,
    cursor: Position,
    kind: OperatorMotion,
    change: bool,
) -> Option<TextRange> {
    let cursor = buf.clamp(cursor);
    let line_len = buf.line_len(cursor.line);
    let range = match kind {
        OperatorMotion::Line => TextRange::Lines {
            first: cursor.line,
            last: cursor.line,
        },
        OperatorMotion::WordForward | OperatorMotion::BigWordForward if change => {
            let end = if kind == OperatorMotion::WordForward {
                motion::current_word_end(buf, cursor)
            } else {
                motion::current_big_word_end(buf, cursor)
            };
            match end {
                Some(end) => chars(cursor, after(end)),
                // Nothing ahead: change what is left of the line.
                None => chars(cursor, Position::new(cursor.line, line_len)),
            }
        }
        OperatorMotion::WordForward | OperatorMotion::BigWordForward => {
            let target = if kind == OperatorMotion::WordForward {
                motion::word_forward(buf, cursor)?
            } else {
                motion::big_word_forward(buf, cursor)?
            };
            if target.line > cursor.line {
                chars(cursor, Position::new(cursor.line, line_len))
            } else {
                chars(cursor, target)
            }
        }
        OperatorMotion::WordEnd => chars(cursor, after(motion::word_end(buf, cursor)?)),
        OperatorMotion::BigWordEnd => chars(cursor, after(motion::big_word_end(buf, cursor)?)),
        OperatorMotion::WordBackward => chars(motion::word_backward(buf, cursor)?, cursor),
        OperatorMotion::BigWordBackward => chars(motion::big_word_backward(buf, cursor)?, cursor),
        OperatorMotion::LineStart => chars(motion::line_start(buf, cursor), cursor),
        OperatorMotion::FirstNonBlank => {
            let target = motion::first_non_blank(buf, cursor.line);
            if target <= cursor {
                chars(target, cursor)
            } else {
                chars(cursor, target)
            }
        }
        OperatorMotion::LineEnd => chars(cursor, Position::new(cursor.line, line_len)),
        OperatorMotion::FileStart => TextRange::Lines {
            first: 0,
            last: cursor.line,
        },
        OperatorMotion::FileEnd => TextRange::Lines {
            first: cursor.line,
            last: buf.last_line(),
        },
        OperatorMotion::FindForward(c) => {
            chars(cursor, after(motion::find_char_forward(buf, cursor, c)?))
        }
        OperatorMotion::TillForward(c) => {
            chars(cursor, after(motion::till_char_forward(buf, cursor, c)?))
        }
        OperatorMotion::FindBackward(c) => chars(motion::find_char_backward(buf, cursor, c)?, cursor),
        OperatorMotion::TillBackward(c) => chars(motion::till_char_backward(buf, cursor, c)?, cursor),
    };
    Some(range)
}
