//! Delete / Change / Yank / Paste.
//!
//! An `Operator` is created when `d`, `c` or `y` is typed and is fed the keys
//! that follow until it can resolve a range (`span_resolver`). Range
//! application is shared with Visual mode through `apply`.
//!
//! Every operator extracts the covered text before mutating anything, and
//! multi-step mutations run inside one undo group. Change opens the group and
//! leaves it open: the Insert session that follows continues it and closes it
//! on `Esc`, so `cw` + typing undoes as one step.

use crate::context::EditContext;
use crate::span_resolver::{self, OperatorMotion, TextRange};
use core_text::{Position, byte_index, motion};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    Delete,
    Change,
    Yank,
}

impl OperatorKind {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            'd' => Some(Self::Delete),
            'c' => Some(Self::Change),
            'y' => Some(Self::Yank),
            _ => None,
        }
    }

    pub fn key(self) -> char {
        match self {
            Self::Delete => 'd',
            Self::Change => 'c',
            Self::Yank => 'y',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorStatus {
    Done,
    /// Operation applied; continue in Insert mode (undo group still open).
    InsertMode,
    /// Waiting for another key; carries the code being completed (`g`, `f`, ...).
    Pending(char),
    /// Unknown motion or failed search; nothing was touched.
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    kind: OperatorKind,
    register: Option<char>,
    pending: Option<char>,
}

impl Operator {
    pub fn new(kind: OperatorKind, register: Option<char>) -> Self {
        Self {
            kind,
            register,
            pending: None,
        }
    }

    /// Keys typed so far, for the pending-command display.
    pub fn pending_keys(&self) -> String {
        let mut out = String::new();
        if let Some(r) = self.register {
            out.push('"');
            out.push(r);
        }
        out.push(self.kind.key());
        if let Some(p) = self.pending {
            out.push(p);
        }
        out
    }

    pub fn feed(&mut self, code: char, ctx: &mut EditContext<'_>) -> OperatorStatus {
        let resolved = match self.pending.take() {
            Some(pending) => OperatorMotion::from_pending(pending, code),
            None if OperatorMotion::needs_argument(code) => {
                self.pending = Some(code);
                return OperatorStatus::Pending(code);
            }
            None => OperatorMotion::from_code(code, self.kind.key()),
        };
        let Some(kind) = resolved else {
            trace!(target: "actions.operator", op = ?self.kind, code = %code, "cancel_unknown_motion");
            return OperatorStatus::Cancel;
        };
        let change = self.kind == OperatorKind::Change;
        let Some(range) = span_resolver::resolve(ctx.buffer, *ctx.cursor, kind, change) else {
            trace!(target: "actions.operator", op = ?self.kind, motion = ?kind, "cancel_motion_failed");
            return OperatorStatus::Cancel;
        };
        apply(self.kind, range, self.register, ctx)
    }
}

/// Apply `kind` over `range`: write the register, then mutate.
pub fn apply(
    kind: OperatorKind,
    range: TextRange,
    register: Option<char>,
    ctx: &mut EditContext<'_>,
) -> OperatorStatus {
    trace!(target: "actions.operator", op = ?kind, ?range, register = ?register, "apply");
    if range.is_empty() {
        if kind == OperatorKind::Change {
            ctx.undo.begin_group();
            *ctx.cursor = range.start();
            return OperatorStatus::InsertMode;
        }
        return OperatorStatus::Done;
    }
    let text = range.extract(ctx.buffer);
    let linewise = range.is_linewise();
    match kind {
        OperatorKind::Yank => {
            ctx.registers.yank(&text, linewise, register);
            let start = range.start();
            if start.line < ctx.cursor.line || (!linewise && start < *ctx.cursor) {
                *ctx.cursor = if linewise {
                    Position::new(start.line, ctx.cursor.col)
                } else {
                    start
                };
            }
            ctx.clamp_cursor();
            OperatorStatus::Done
        }
        OperatorKind::Delete => {
            ctx.registers.delete(&text, linewise, register);
            let opened = ctx.undo.begin_group();
            remove(ctx, range, false);
            if opened {
                ctx.undo.end_group();
            }
            OperatorStatus::Done
        }
        OperatorKind::Change => {
            ctx.registers.delete(&text, linewise, register);
            ctx.undo.begin_group();
            remove(ctx, range, true);
            OperatorStatus::InsertMode
        }
    }
}

fn remove(ctx: &mut EditContext<'_>, range: TextRange, change: bool) {
    match range {
        TextRange::Chars { start, end } => {
            ctx.buffer.delete_range(ctx.undo, start, end);
            *ctx.cursor = ctx.buffer.clamp(start);
            if !change {
                ctx.clamp_cursor();
            }
        }
        TextRange::Lines { first, last } => {
            let last = last.min(ctx.buffer.last_line());
            if change {
                for idx in (first + 1..=last).rev() {
                    ctx.buffer.delete_line(ctx.undo, idx);
                }
                ctx.buffer.replace_line(ctx.undo, first, "");
                *ctx.cursor = Position::new(first, 0);
            } else {
                for idx in (first..=last).rev() {
                    ctx.buffer.delete_line(ctx.undo, idx);
                }
                let line = first.min(ctx.buffer.last_line());
                *ctx.cursor = motion::first_non_blank(ctx.buffer, line);
            }
        }
    }
}

/// `p` / `P`. Linewise content goes below / above the cursor line; charwise
/// content goes after / at the cursor column. An empty register is a no-op.
pub fn paste(ctx: &mut EditContext<'_>, register: Option<char>, before: bool) -> OperatorStatus {
    let reg = ctx.registers.read(register);
    let Some(text) = reg.content.filter(|t| !t.is_empty()) else {
        trace!(target: "actions.operator", register = ?register, "paste_empty_register");
        return OperatorStatus::Done;
    };
    trace!(target: "actions.operator", register = ?register, linewise = reg.linewise, before, "paste");
    let opened = ctx.undo.begin_group();
    if reg.linewise {
        let row = if before {
            ctx.cursor.line
        } else {
            ctx.cursor.line + 1
        };
        put_lines(ctx, &text, row);
    } else {
        let len = ctx.buffer.line_len(ctx.cursor.line);
        let col = if before || len == 0 {
            ctx.cursor.col.min(len)
        } else {
            (ctx.cursor.col + 1).min(len)
        };
        put_chars(ctx, &text, Position::new(ctx.cursor.line, col));
    }
    if opened {
        ctx.undo.end_group();
    }
    OperatorStatus::Done
}

/// Insert linewise register text as whole lines starting at `row`; the cursor
/// lands on the first inserted line's first non-blank.
pub(crate) fn put_lines(ctx: &mut EditContext<'_>, text: &str, row: usize) {
    let body = text.strip_suffix('\n').unwrap_or(text);
    let row = row.min(ctx.buffer.line_count());
    for (offset, line) in body.split('\n').enumerate() {
        ctx.buffer.insert_line(ctx.undo, row + offset, line);
    }
    *ctx.cursor = motion::first_non_blank(ctx.buffer, row);
}

/// Insert charwise text at `at`, splitting the line when the text spans
/// lines. The cursor lands on the last inserted character.
pub(crate) fn put_chars(ctx: &mut EditContext<'_>, text: &str, at: Position) {
    let at = ctx.buffer.clamp(at);
    let line = ctx.buffer.line(at.line).unwrap_or_default().to_string();
    let (head, tail) = line.split_at(byte_index(&line, at.col));
    let segments: Vec<&str> = text.split('\n').collect();
    let last = segments.len() - 1;
    if last == 0 {
        ctx.buffer
            .replace_line(ctx.undo, at.line, &format!("{head}{text}{tail}"));
        let inserted = text.chars().count();
        *ctx.cursor = Position::new(at.line, at.col + inserted.saturating_sub(1));
        return;
    }
    ctx.buffer
        .replace_line(ctx.undo, at.line, &format!("{head}{}", segments[0]));
    for (offset, seg) in segments[1..].iter().enumerate() {
        let mut new_line = seg.to_string();
        if offset + 1 == last {
            new_line.push_str(tail);
        }
        ctx.buffer.insert_line(ctx.undo, at.line + 1 + offset, &new_line);
    }
    let end_len = segments[last].chars().count();
    *ctx.cursor = Position::new(at.line + last, end_len.saturating_sub(1));
}
