//! `/` and `?` pattern entry.

use super::ModeHandler;
use crate::context::{EditContext, HandlerResult};
use crate::search::SearchOutcome;
use core_events::{KeyCode, KeyEvent};
use core_state::Mode;
use core_text::Position;
use tracing::debug;

/// Jump from `from` to the next match of the current pattern, returning the
/// status message to show (if any).
pub(crate) fn jump_to_match(
    ctx: &mut EditContext<'_>,
    from: Position,
    forward: bool,
) -> Option<String> {
    let pattern = ctx.search.pattern().unwrap_or_default().to_string();
    let outcome = ctx.search.find(ctx.buffer, ctx.options, from, forward);
    debug!(target: "actions.search", %pattern, forward, ?outcome, "jump");
    if let SearchOutcome::Found { pos, .. } = outcome {
        *ctx.cursor = pos;
    }
    outcome.message(&pattern, forward)
}

#[derive(Debug)]
pub struct SearchHandler {
    forward: bool,
    pattern: String,
}

impl SearchHandler {
    pub fn new(forward: bool) -> Self {
        Self {
            forward,
            pattern: String::new(),
        }
    }

    fn commit(&mut self, ctx: &mut EditContext<'_>) -> HandlerResult {
        // An empty pattern repeats the previous one in the new direction.
        if !self.pattern.is_empty() {
            ctx.search
                .set_pattern(std::mem::take(&mut self.pattern), self.forward);
        } else if let Some(prev) = ctx.search.pattern().map(str::to_string) {
            ctx.search.set_pattern(prev, self.forward);
        }
        let from = *ctx.cursor;
        let msg = jump_to_match(ctx, from, self.forward);
        HandlerResult::enter(Mode::Normal).with_optional_message(msg)
    }
}

impl ModeHandler for SearchHandler {
    fn mode(&self) -> Mode {
        if self.forward {
            Mode::SearchForward
        } else {
            Mode::SearchBackward
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, ctx: &mut EditContext<'_>) -> HandlerResult {
        match key.code {
            KeyCode::Esc => HandlerResult::enter(Mode::Normal),
            KeyCode::Enter => self.commit(ctx),
            KeyCode::Backspace => {
                if self.pattern.pop().is_none() {
                    return HandlerResult::enter(Mode::Normal);
                }
                HandlerResult::stay()
            }
            _ if key.is_ctrl('c') => HandlerResult::enter(Mode::Normal),
            _ => {
                if let Some(c) = key.printable() {
                    self.pattern.push(c);
                } else if key.code == KeyCode::Tab {
                    self.pattern.push('\t');
                }
                HandlerResult::stay()
            }
        }
    }

    fn pending_keys(&self) -> String {
        let prefix = if self.forward { '/' } else { '?' };
        format!("{prefix}{}", self.pattern)
    }
}
