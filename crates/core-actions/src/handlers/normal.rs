//! Normal mode.
//!
//! Owns the short pending-key state that Normal mode accumulates between
//! keys: a `"x` register prefix, an operator waiting for its motion, and the
//! first key of two-key motions (`gg`, `f<c>`). Every key either completes a
//! pending sequence or starts a fresh command; an unrecognised key clears the
//! pending state and is otherwise ignored.
//!
//! Mutating commands check the buffer's readonly flag first and answer with
//! `E21` instead of touching anything.

use super::ModeHandler;
use super::movement::{self, MotionFeed, MotionKeys};
use super::search::jump_to_match;
use crate::context::{EditContext, HandlerResult, Transition};
use crate::indent;
use crate::operator::{self, Operator, OperatorKind, OperatorStatus};
use crate::search::whole_word_pattern;
use crate::span_resolver::{self, OperatorMotion, TextRange};
use core_events::{KeyCode, KeyEvent};
use core_state::{Mode, RegisterName};
use core_text::{Position, motion};
use tracing::trace;

pub const OLDEST_CHANGE: &str = "Already at oldest change";
pub const NEWEST_CHANGE: &str = "Already at newest change";
pub const NO_STRING_UNDER_CURSOR: &str = "E348: No string under cursor";

#[derive(Debug, Default)]
pub struct NormalHandler {
    register: Option<char>,
    awaiting_register: bool,
    operator: Option<Operator>,
    motion: MotionKeys,
    sticky_col: Option<usize>,
}

impl NormalHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        self.register = None;
        self.awaiting_register = false;
        self.operator = None;
        self.motion.reset();
    }

    fn feed_operator(
        &mut self,
        mut op: Operator,
        key: &KeyEvent,
        ctx: &mut EditContext<'_>,
    ) -> HandlerResult {
        let Some(code) = key.printable() else {
            self.reset();
            return HandlerResult::stay();
        };
        match op.feed(code, ctx) {
            OperatorStatus::Pending(_) => {
                self.operator = Some(op);
                HandlerResult::stay()
            }
            OperatorStatus::InsertMode => {
                self.reset();
                HandlerResult::enter(Mode::Insert)
            }
            OperatorStatus::Done | OperatorStatus::Cancel => {
                self.reset();
                HandlerResult::stay()
            }
        }
    }

    /// Shorthands (`D`, `C`, `Y`) resolve a fixed motion immediately.
    fn run_operator(
        kind: OperatorKind,
        motion: OperatorMotion,
        register: Option<char>,
        ctx: &mut EditContext<'_>,
    ) -> HandlerResult {
        let change = kind == OperatorKind::Change;
        let Some(range) = span_resolver::resolve(ctx.buffer, *ctx.cursor, motion, change) else {
            return HandlerResult::stay();
        };
        match operator::apply(kind, range, register, ctx) {
            OperatorStatus::InsertMode => HandlerResult::enter(Mode::Insert),
            _ => HandlerResult::stay(),
        }
    }

    fn command(&mut self, c: char, ctx: &mut EditContext<'_>) -> HandlerResult {
        let register = self.register.take();
        let cursor = *ctx.cursor;
        let mutating = matches!(
            c,
            'i' | 'a' | 'I' | 'A' | 'o' | 'O' | 'x' | 'X' | 'd' | 'c' | 'p' | 'P' | 'D' | 'C' | 'J'
                | 'u'
        );
        if mutating && ctx.readonly() {
            trace!(target: "actions.dispatch", key = %c, "readonly_rejected");
            return HandlerResult::readonly();
        }
        match c {
            'i' => HandlerResult::enter(Mode::Insert),
            'a' => {
                let len = ctx.buffer.line_len(cursor.line);
                ctx.cursor.col = (cursor.col + 1).min(len);
                HandlerResult::enter(Mode::Insert)
            }
            'I' => {
                *ctx.cursor = motion::first_non_blank(ctx.buffer, cursor.line);
                HandlerResult::enter(Mode::Insert)
            }
            'A' => {
                ctx.cursor.col = ctx.buffer.line_len(cursor.line);
                HandlerResult::enter(Mode::Insert)
            }
            'o' | 'O' => {
                // The group stays open for the Insert session that follows.
                ctx.undo.begin_group();
                let row = if c == 'o' { cursor.line + 1 } else { cursor.line };
                let row = ctx.buffer.insert_line(ctx.undo, row, "");
                *ctx.cursor = Position::new(row, 0);
                HandlerResult::enter(Mode::Insert)
            }
            'v' => HandlerResult::enter(Mode::Visual),
            'V' => HandlerResult::enter(Mode::VisualLine),
            ':' => HandlerResult::enter(Mode::Command),
            '/' => HandlerResult::enter(Mode::SearchForward),
            '?' => HandlerResult::enter(Mode::SearchBackward),
            '"' => {
                self.awaiting_register = true;
                HandlerResult::stay()
            }
            'd' | 'c' | 'y' => {
                if let Some(kind) = OperatorKind::from_key(c) {
                    self.operator = Some(Operator::new(kind, register));
                }
                HandlerResult::stay()
            }
            'p' | 'P' => {
                operator::paste(ctx, register, c == 'P');
                HandlerResult::stay()
            }
            'x' => {
                if cursor.col < ctx.buffer.line_len(cursor.line) {
                    let range = TextRange::Chars {
                        start: cursor,
                        end: Position::new(cursor.line, cursor.col + 1),
                    };
                    operator::apply(OperatorKind::Delete, range, register, ctx);
                }
                HandlerResult::stay()
            }
            'X' => {
                if cursor.col > 0 {
                    let range = TextRange::Chars {
                        start: Position::new(cursor.line, cursor.col - 1),
                        end: cursor,
                    };
                    operator::apply(OperatorKind::Delete, range, register, ctx);
                }
                HandlerResult::stay()
            }
            'D' => Self::run_operator(OperatorKind::Delete, OperatorMotion::LineEnd, register, ctx),
            'C' => Self::run_operator(OperatorKind::Change, OperatorMotion::LineEnd, register, ctx),
            'Y' => Self::run_operator(OperatorKind::Yank, OperatorMotion::Line, register, ctx),
            'J' => {
                if let Some(at) = indent::join_below(ctx.buffer, ctx.undo, cursor.line) {
                    *ctx.cursor = at;
                    ctx.clamp_cursor();
                }
                HandlerResult::stay()
            }
            'u' => match ctx.undo.undo(ctx.buffer) {
                Some(hint) => {
                    *ctx.cursor = hint;
                    ctx.clamp_cursor();
                    HandlerResult::stay()
                }
                None => HandlerResult::message(OLDEST_CHANGE),
            },
            'n' | 'N' => {
                let forward = ctx.search.is_forward() == (c == 'n');
                let msg = jump_to_match(ctx, cursor, forward);
                HandlerResult::stay().with_optional_message(msg)
            }
            '*' | '#' => {
                let Some((word, start)) = motion::word_at(ctx.buffer, cursor) else {
                    return HandlerResult::message(NO_STRING_UNDER_CURSOR);
                };
                let forward = c == '*';
                ctx.search.set_pattern(whole_word_pattern(&word), forward);
                let msg = jump_to_match(ctx, Position::new(cursor.line, start), forward);
                HandlerResult::stay().with_optional_message(msg)
            }
            _ => {
                trace!(target: "actions.dispatch", key = %c, "unmapped_normal_key");
                HandlerResult::stay()
            }
        }
    }

    fn redo(ctx: &mut EditContext<'_>) -> HandlerResult {
        if ctx.readonly() {
            return HandlerResult::readonly();
        }
        match ctx.undo.redo(ctx.buffer) {
            Some(hint) => {
                *ctx.cursor = hint;
                ctx.clamp_cursor();
                HandlerResult::stay()
            }
            None => HandlerResult::message(NEWEST_CHANGE),
        }
    }
}

impl ModeHandler for NormalHandler {
    fn mode(&self) -> Mode {
        Mode::Normal
    }

    fn handle_key(&mut self, key: &KeyEvent, ctx: &mut EditContext<'_>) -> HandlerResult {
        if key.code == KeyCode::Esc || key.is_ctrl('c') {
            self.reset();
            return HandlerResult::stay();
        }
        if self.awaiting_register {
            self.awaiting_register = false;
            match key.printable() {
                Some(c) if RegisterName::is_valid(c) => self.register = Some(c),
                _ => self.reset(),
            }
            return HandlerResult::stay();
        }
        if let Some(op) = self.operator.take() {
            return self.feed_operator(op, key, ctx);
        }
        if self.motion.pending() == Some('g') && key.printable() == Some('v') {
            self.reset();
            return HandlerResult {
                transition: Transition::ReselectVisual,
                ..HandlerResult::default()
            };
        }
        let had_pending = self.motion.pending().is_some();
        match self.motion.feed(key) {
            MotionFeed::Complete(m) => {
                self.register = None;
                movement::apply(ctx.buffer, ctx.cursor, m, &mut self.sticky_col);
                return HandlerResult::stay();
            }
            MotionFeed::Pending => return HandlerResult::stay(),
            MotionFeed::NotMotion if had_pending => {
                self.reset();
                return HandlerResult::stay();
            }
            MotionFeed::NotMotion => {}
        }
        if key.is_ctrl('r') {
            self.register = None;
            return Self::redo(ctx);
        }
        let Some(c) = key.printable() else {
            self.reset();
            return HandlerResult::stay();
        };
        self.sticky_col = None;
        self.command(c, ctx)
    }

    fn pending_keys(&self) -> String {
        if let Some(op) = &self.operator {
            return op.pending_keys();
        }
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
