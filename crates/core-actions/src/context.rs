//! Per-dispatch borrow bundle and handler results.
//!
//! The orchestrator owns every collaborator; for the duration of one key it
//! lends them to the active handler through `EditContext`. Nothing in here is
//! retained across keys.

use crate::search::SearchState;
use core_config::EditorOptions;
use core_state::{Mode, RegisterBank, Selection, UndoLog};
use core_text::{LineBuffer, Position};

pub const READONLY_MESSAGE: &str = "E21: Cannot make changes, buffer is readonly";

pub struct EditContext<'a> {
    pub buffer: &'a mut LineBuffer,
    pub undo: &'a mut UndoLog,
    pub registers: &'a mut RegisterBank,
    pub search: &'a mut SearchState,
    pub options: &'a EditorOptions,
    /// Active Visual selection (None outside visual modes).
    pub selection: &'a mut Option<Selection>,
    pub cursor: &'a mut Position,
}

impl EditContext<'_> {
    pub fn readonly(&self) -> bool {
        self.buffer.is_readonly()
    }

    /// Park the cursor on a character cell (Normal/Visual semantics).
    pub fn clamp_cursor(&mut self) {
        *self.cursor = self.buffer.clamp_normal(*self.cursor);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    #[default]
    Stay,
    Enter(Mode),
    /// `gv`: restore the last visual selection.
    ReselectVisual,
}

/// What a handler asks the orchestrator to do after one key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HandlerResult {
    pub transition: Transition,
    pub message: Option<String>,
    /// Submitted command-line text (Command mode `Enter`).
    pub command: Option<String>,
}

impl HandlerResult {
    pub fn stay() -> Self {
        Self::default()
    }

    pub fn enter(mode: Mode) -> Self {
        Self {
            transition: Transition::Enter(mode),
            ..Self::default()
        }
    }

    pub fn message(msg: impl Into<String>) -> Self {
        Self::stay().with_message(msg)
    }

    pub fn readonly() -> Self {
        Self::message(READONLY_MESSAGE)
    }

    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }

    pub fn with_optional_message(mut self, msg: Option<String>) -> Self {
        if msg.is_some() {
            self.message = msg;
        }
        self
    }
}
