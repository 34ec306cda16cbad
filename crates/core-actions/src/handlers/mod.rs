//! Per-mode key handlers.
//!
//! One handler type per mode family:
//! * `normal`  - movement, mode entry, operators, paste, undo/redo, search keys
//! * `insert`  - text entry inside one undo group
//! * `visual`  - Visual / VisualLine selection and selection operators
//! * `search`  - `/` and `?` pattern entry
//! * `command` - `:` command-line entry
//!
//! Handlers see the session only through the `EditContext` lent for one key
//! and report back with a `HandlerResult`; mode bookkeeping (selection
//! lifecycle, handler construction) belongs to the orchestrator.

use crate::context::{EditContext, HandlerResult};
use core_events::KeyEvent;
use core_state::Mode;

pub mod command;
pub mod insert;
pub(crate) mod movement;
pub mod normal;
pub mod search;
pub mod visual;

pub use command::CommandHandler;
pub use insert::InsertHandler;
pub use normal::NormalHandler;
pub use search::SearchHandler;
pub use visual::VisualHandler;

pub trait ModeHandler {
    fn mode(&self) -> Mode;

    fn handle_key(&mut self, key: &KeyEvent, ctx: &mut EditContext<'_>) -> HandlerResult;

    /// Typed-but-unresolved keys (`"a`, `d`, `dt`) or the prompt line being edited.
    fn pending_keys(&self) -> String {
        String::new()
    }
}
