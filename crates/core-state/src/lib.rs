//! Editing-session state shared by the mode handlers.
//!
//! * `Mode`: the single active editor mode.
//! * `undo::UndoLog`: two-stack history with one optional open group.
//! * `registers::RegisterBank`: unnamed / yank / delete history / named /
//!   black-hole slots, with best-effort system clipboard sync.
//! * `selection::Selection`: anchored Visual-mode selection.
//!
//! Nothing here knows about keys; `core-actions` drives these types one
//! dispatch at a time and is the only code holding mutable access.
//!
//! Telemetry:
//! - Undo lifecycle emits trace events on target `state.undo` (`push`,
//!   `undo_pop`, `redo_pop`, `begin_group`, `end_group`, `undo_stack_trimmed`).
//! - Register writes and swallowed clipboard failures log on `state.registers`.

pub mod registers;
pub mod selection;
pub mod undo;

pub use registers::{Clipboard, HISTORY_SLOTS, Register, RegisterBank, RegisterName};
#[cfg(feature = "system-clipboard")]
pub use registers::SystemClipboard;
pub use selection::{Selection, SelectionKind};
pub use undo::{UNDO_HISTORY_MAX, UndoLog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Command/navigation mode.
    #[default]
    Normal,
    Insert,
    /// Characterwise selection.
    Visual,
    /// Linewise selection.
    VisualLine,
    /// `:` command line.
    Command,
    /// `/` pattern entry.
    SearchForward,
    /// `?` pattern entry.
    SearchBackward,
}

impl Mode {
    pub fn is_visual(self) -> bool {
        matches!(self, Mode::Visual | Mode::VisualLine)
    }

    pub fn is_search(self) -> bool {
        matches!(self, Mode::SearchForward | Mode::SearchBackward)
    }

    /// Modes that edit a one-line prompt rather than the buffer.
    pub fn is_prompt(self) -> bool {
        self == Mode::Command || self.is_search()
    }

    pub fn selection_kind(self) -> Option<SelectionKind> {
        match self {
            Mode::Visual => Some(SelectionKind::Characterwise),
            Mode::VisualLine => Some(SelectionKind::Linewise),
            _ => None,
        }
    }

    /// Status-line label, Vim style.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "-- INSERT --",
            Mode::Visual => "-- VISUAL --",
            Mode::VisualLine => "-- VISUAL LINE --",
            Mode::Command => ":",
            Mode::SearchForward => "/",
            Mode::SearchBackward => "?",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_predicates() {
        assert!(Mode::Visual.is_visual());
        assert!(Mode::VisualLine.is_visual());
        assert!(!Mode::Insert.is_visual());
        assert!(Mode::SearchBackward.is_search());
        assert!(Mode::Command.is_prompt());
        assert!(!Mode::Normal.is_prompt());
        assert_eq!(Mode::default(), Mode::Normal);
    }

    #[test]
    fn visual_modes_map_to_selection_kind() {
        assert_eq!(
            Mode::VisualLine.selection_kind(),
            Some(SelectionKind::Linewise)
        );
        assert_eq!(
            Mode::Visual.selection_kind(),
            Some(SelectionKind::Characterwise)
        );
        assert_eq!(Mode::Normal.selection_kind(), None);
    }
}
