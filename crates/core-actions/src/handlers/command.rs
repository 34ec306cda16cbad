//! `:` command-line entry. The submitted text is handed back to the shell
//! untouched through `HandlerResult::command`.

use super::ModeHandler;
use crate::context::{EditContext, HandlerResult};
use core_events::{KeyCode, KeyEvent};
use core_state::Mode;

#[derive(Debug, Default)]
pub struct CommandHandler {
    line: String,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModeHandler for CommandHandler {
    fn mode(&self) -> Mode {
        Mode::Command
    }

    fn handle_key(&mut self, key: &KeyEvent, _ctx: &mut EditContext<'_>) -> HandlerResult {
        match key.code {
            KeyCode::Esc => HandlerResult::enter(Mode::Normal),
            KeyCode::Enter => {
                let mut result = HandlerResult::enter(Mode::Normal);
                let line = std::mem::take(&mut self.line);
                if !line.trim().is_empty() {
                    result.command = Some(line);
                }
                result
            }
            KeyCode::Backspace => {
                if self.line.pop().is_none() {
                    return HandlerResult::enter(Mode::Normal);
                }
                HandlerResult::stay()
            }
            _ if key.is_ctrl('c') => HandlerResult::enter(Mode::Normal),
            _ => {
                if let Some(c) = key.printable() {
                    self.line.push(c);
                }
                HandlerResult::stay()
            }
        }
    }

    fn pending_keys(&self) -> String {
        format!(":{}", self.line)
    }
}
