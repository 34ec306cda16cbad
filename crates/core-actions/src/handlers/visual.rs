//! Visual and VisualLine mode.
//!
//! The selection itself lives with the orchestrator; this handler moves its
//! live end with the cursor and applies operators over the normalized range.
//! Characterwise selections include both endpoint characters; linewise ones
//! cover whole lines. Every operator ends the visual session (the orchestrator
//! caches the selection for `gv`), except `>`/`<` when
//! `keep_visual_on_indent` is set.

use super::ModeHandler;
use super::movement::{self, MotionFeed, MotionKeys};
use crate::context::{EditContext, HandlerResult};
use crate::indent;
use crate::operator::{self, OperatorKind, OperatorStatus};
use crate::span_resolver::TextRange;
use core_events::{KeyCode, KeyEvent};
use core_state::{Mode, RegisterName, Selection, SelectionKind};
use core_text::{LineBuffer, Position, motion};
use tracing::trace;

/// Operator range covered by `sel`.
pub fn selection_range(sel: &Selection, buf: &LineBuffer) -> TextRange {
    let (a, b) = sel.normalized();
    match sel.kind {
        SelectionKind::Linewise => TextRange::Lines {
            first: a.line,
            last: b.line,
        },
        SelectionKind::Characterwise => {
            let len = buf.line_len(b.line);
            let end = if b.col < len {
                Position::new(b.line, b.col + 1)
            } else if b.line < buf.last_line() {
                // Selection ends on the line break.
                Position::new(b.line + 1, 0)
            } else {
                Position::new(b.line, len)
            };
            TextRange::Chars {
                start: buf.clamp(a),
                end,
            }
        }
    }
}

#[derive(Debug)]
pub struct VisualHandler {
    linewise: bool,
    register: Option<char>,
    awaiting_register: bool,
    motion: MotionKeys,
    sticky_col: Option<usize>,
}

impl VisualHandler {
    pub fn new(mode: Mode) -> Self {
        Self {
            linewise: mode == Mode::VisualLine,
            register: None,
            awaiting_register: false,
            motion: MotionKeys::default(),
            sticky_col: None,
        }
    }

    fn current(ctx: &mut EditContext<'_>, linewise: bool) -> Selection {
        let kind = if linewise {
            SelectionKind::Linewise
        } else {
            SelectionKind::Characterwise
        };
        *ctx.selection.get_or_insert_with(|| Selection::new(*ctx.cursor, kind))
    }

    fn operate(&mut self, kind: OperatorKind, ctx: &mut EditContext<'_>) -> HandlerResult {
        let sel = Self::current(ctx, self.linewise);
        let range = selection_range(&sel, ctx.buffer);
        let register = self.register.take();
        trace!(target: "actions.operator", op = ?kind, ?range, "visual_operator");
        match operator::apply(kind, range, register, ctx) {
            OperatorStatus::InsertMode => HandlerResult::enter(Mode::Insert),
            _ => {
                if kind == OperatorKind::Yank {
                    *ctx.cursor = range.start().min(*ctx.cursor);
                    if range.is_linewise() {
                        ctx.cursor.line = range.start().line;
                    }
                    ctx.clamp_cursor();
                }
                HandlerResult::enter(Mode::Normal)
            }
        }
    }

    fn shift(&mut self, outdent: bool, ctx: &mut EditContext<'_>) -> HandlerResult {
        let sel = Self::current(ctx, self.linewise);
        let (first, last) = sel.line_range();
        indent::shift_lines(ctx.buffer, ctx.undo, first, last, ctx.options, outdent);
        if ctx.options.keep_visual_on_indent {
            if let Some(sel) = ctx.selection.as_mut() {
                sel.start = ctx.buffer.clamp_normal(sel.start);
                sel.end = ctx.buffer.clamp_normal(sel.end);
            }
            ctx.clamp_cursor();
            return HandlerResult::stay();
        }
        *ctx.cursor = motion::first_non_blank(ctx.buffer, first);
        HandlerResult::enter(Mode::Normal)
    }

    fn join(&mut self, ctx: &mut EditContext<'_>) -> HandlerResult {
        let (first, last) = Self::current(ctx, self.linewise).line_range();
        if let Some(at) = indent::join_range(ctx.buffer, ctx.undo, first, last) {
            *ctx.cursor = at;
        }
        ctx.clamp_cursor();
        HandlerResult::enter(Mode::Normal)
    }

    /// `p`: replace the selection with register content. The replaced text
    /// goes to the unnamed register like any delete.
    fn replace(&mut self, ctx: &mut EditContext<'_>) -> HandlerResult {
        let register = self.register.take();
        let reg = ctx.registers.read(register);
        let Some(text) = reg.content.filter(|t| !t.is_empty()) else {
            return HandlerResult::enter(Mode::Normal);
        };
        let sel = Self::current(ctx, self.linewise);
        let range = selection_range(&sel, ctx.buffer);
        let whole_buffer = matches!(range, TextRange::Lines { first: 0, last } if last >= ctx.buffer.last_line());
        let opened = ctx.undo.begin_group();
        operator::apply(OperatorKind::Delete, range, None, ctx);
        match (range, reg.linewise) {
            (TextRange::Lines { first, .. }, true) => {
                operator::put_lines(ctx, &text, first);
                if whole_buffer {
                    let tail = ctx.buffer.last_line();
                    ctx.buffer.delete_line(ctx.undo, tail);
                }
            }
            (TextRange::Lines { first, .. }, false) => {
                if !whole_buffer {
                    ctx.buffer.insert_line(ctx.undo, first, "");
                }
                operator::put_chars(ctx, &text, Position::new(first, 0));
            }
            (TextRange::Chars { start, .. }, true) => {
                let at = ctx.buffer.clamp(start);
                ctx.buffer.split_line(ctx.undo, at);
                operator::put_lines(ctx, &text, at.line + 1);
            }
            (TextRange::Chars { start, .. }, false) => {
                operator::put_chars(ctx, &text, start);
            }
        }
        if opened {
            ctx.undo.end_group();
        }
        ctx.clamp_cursor();
        HandlerResult::enter(Mode::Normal)
    }
}

impl ModeHandler for VisualHandler {
    fn mode(&self) -> Mode {
        if self.linewise {
            Mode::VisualLine
        } else {
            Mode::Visual
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, ctx: &mut EditContext<'_>) -> HandlerResult {
        if key.code == KeyCode::Esc || key.is_ctrl('c') {
            return HandlerResult::enter(Mode::Normal);
        }
        if self.awaiting_register {
            self.awaiting_register = false;
            if let Some(c) = key.printable().filter(|c| RegisterName::is_valid(*c)) {
                self.register = Some(c);
            }
            return HandlerResult::stay();
        }
        let had_pending = self.motion.pending().is_some();
        match self.motion.feed(key) {
            MotionFeed::Complete(m) => {
                movement::apply(ctx.buffer, ctx.cursor, m, &mut self.sticky_col);
                let cursor = *ctx.cursor;
                if let Some(sel) = ctx.selection.as_mut() {
                    sel.extend_to(cursor);
                }
                return HandlerResult::stay();
            }
            MotionFeed::Pending => return HandlerResult::stay(),
            MotionFeed::NotMotion if had_pending => return HandlerResult::stay(),
            MotionFeed::NotMotion => {}
        }
        let Some(c) = key.printable() else {
            return HandlerResult::stay();
        };
        let mutating = matches!(c, 'd' | 'x' | 'c' | 's' | '>' | '<' | 'J' | 'p' | 'P');
        if mutating && ctx.readonly() {
            return HandlerResult::readonly();
        }
        match c {
            'o' => {
                if let Some(sel) = ctx.selection.as_mut() {
                    sel.swap_ends();
                    *ctx.cursor = sel.end;
                }
                HandlerResult::stay()
            }
            'v' if !self.linewise => HandlerResult::enter(Mode::Normal),
            'v' => HandlerResult::enter(Mode::Visual),
            'V' if self.linewise => HandlerResult::enter(Mode::Normal),
            'V' => HandlerResult::enter(Mode::VisualLine),
            '"' => {
                self.awaiting_register = true;
                HandlerResult::stay()
            }
            'y' => self.operate(OperatorKind::Yank, ctx),
            'd' | 'x' => self.operate(OperatorKind::Delete, ctx),
            'c' | 's' => self.operate(OperatorKind::Change, ctx),
            '>' | '<' => self.shift(c == '<', ctx),
            'J' => self.join(ctx),
            'p' | 'P' => self.replace(ctx),
            _ => HandlerResult::stay(),
        }
    }

    fn pending_keys(&self) -> String {
        let mut out = String::new();
        if let Some(r) = self.register {
            out.push('"');
            out.push(r);
        }
        if self.awaiting_register {
            out.push('"');
        }
        if let Some(p) = self.motion.pending() {
            out.push(p);
        }
        out
    }
}
