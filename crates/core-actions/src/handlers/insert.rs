//! Insert mode.
//!
//! An Insert session is one undo step: the handler opens an undo group when
//! it is created (or continues the group an `o`/`O`/`c` command left open)
//! and closes it on `Esc`. The cursor may sit one past the last character
//! while inserting; leaving steps it back one column.

use super::ModeHandler;
use crate::context::{EditContext, HandlerResult};
use core_events::{KeyCode, KeyEvent};
use core_state::{Mode, UndoLog};
use core_text::{Position, motion};
use tracing::trace;

#[derive(Debug)]
pub struct InsertHandler {
    sticky_col: Option<usize>,
}

impl InsertHandler {
    pub fn new(undo: &mut UndoLog) -> Self {
        let continued = !undo.begin_group();
        trace!(target: "actions.dispatch", continued, "insert_session_start");
        Self { sticky_col: None }
    }

    fn leave(ctx: &mut EditContext<'_>) -> HandlerResult {
        let pushed = ctx.undo.end_group();
        trace!(target: "actions.dispatch", pushed, "insert_session_end");
        ctx.cursor.col = ctx.cursor.col.saturating_sub(1);
        HandlerResult::enter(Mode::Normal)
    }

    fn insert_text(ctx: &mut EditContext<'_>, text: &str) {
        for ch in text.chars() {
            let at = ctx.buffer.clamp(*ctx.cursor);
            if ctx.buffer.insert_char(ctx.undo, at, ch) {
                *ctx.cursor = Position::new(at.line, at.col + 1);
            }
        }
    }

    fn backspace(ctx: &mut EditContext<'_>) {
        let at = ctx.buffer.clamp(*ctx.cursor);
        if at.col > 0 {
            let prev = Position::new(at.line, at.col - 1);
            if ctx.buffer.delete_char(ctx.undo, prev).is_some() {
                *ctx.cursor = prev;
            }
        } else if at.line > 0
            && let Some(col) = ctx.buffer.join_lines(ctx.undo, at.line - 1)
        {
            *ctx.cursor = Position::new(at.line - 1, col);
        }
    }

    fn delete_forward(ctx: &mut EditContext<'_>) {
        let at = ctx.buffer.clamp(*ctx.cursor);
        if at.col < ctx.buffer.line_len(at.line) {
            ctx.buffer.delete_char(ctx.undo, at);
        } else {
            ctx.buffer.join_lines(ctx.undo, at.line);
        }
    }

    fn tab(ctx: &mut EditContext<'_>) {
        if ctx.options.expandtab {
            let ts = ctx.options.tabstop.max(1);
            let spaces = ts - ctx.cursor.col % ts;
            Self::insert_text(ctx, &" ".repeat(spaces));
        } else {
            Self::insert_text(ctx, "\t");
        }
    }

    fn vertical(&mut self, ctx: &mut EditContext<'_>, down: bool) {
        let want = *self.sticky_col.get_or_insert(ctx.cursor.col);
        let target = if down {
            motion::down(ctx.buffer, *ctx.cursor, want)
        } else {
            motion::up(ctx.buffer, *ctx.cursor, want)
        };
        if let Some(t) = target {
            *ctx.cursor = t;
        }
    }
}

impl ModeHandler for InsertHandler {
    fn mode(&self) -> Mode {
        Mode::Insert
    }

    fn handle_key(&mut self, key: &KeyEvent, ctx: &mut EditContext<'_>) -> HandlerResult {
        if key.code == KeyCode::Esc || key.is_ctrl('c') || key.is_ctrl('[') {
            return Self::leave(ctx);
        }
        if !matches!(key.code, KeyCode::Up | KeyCode::Down) {
            self.sticky_col = None;
        }
        match key.code {
            KeyCode::Enter => {
                let at = ctx.buffer.clamp(*ctx.cursor);
                if ctx.buffer.split_line(ctx.undo, at) {
                    *ctx.cursor = Position::new(at.line + 1, 0);
                }
            }
            KeyCode::Backspace => Self::backspace(ctx),
            KeyCode::Delete => Self::delete_forward(ctx),
            KeyCode::Tab => Self::tab(ctx),
            KeyCode::Left => {
                ctx.cursor.col = ctx.cursor.col.saturating_sub(1);
            }
            KeyCode::Right => {
                if let Some(t) = motion::right(ctx.buffer, *ctx.cursor, true) {
                    *ctx.cursor = t;
                }
            }
            KeyCode::Up => self.vertical(ctx, false),
            KeyCode::Down => self.vertical(ctx, true),
            KeyCode::Home => ctx.cursor.col = 0,
            KeyCode::End => ctx.cursor.col = ctx.buffer.line_len(ctx.cursor.line),
            KeyCode::Char(_) if key.is_ctrl('h') => Self::backspace(ctx),
            KeyCode::Char(_) => {
                if let Some(c) = key.printable() {
                    let mut s = [0u8; 4];
                    Self::insert_text(ctx, c.encode_utf8(&mut s));
                }
            }
            KeyCode::Esc => {}
        }
        HandlerResult::stay()
    }
}
