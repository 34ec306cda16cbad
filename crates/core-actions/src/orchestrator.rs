//! Mode orchestrator: the single entry point for key events.
//!
//! `ModeOrchestrator` owns the editing session (buffer, undo log, registers,
//! search state, option snapshot) and exactly one active handler. Each key is
//! forwarded to that handler with an `EditContext` borrowed for the call; the
//! returned `HandlerResult` drives mode bookkeeping here:
//!
//! * entering a visual mode from a non-visual one anchors a new selection at
//!   the cursor; switching between Visual and VisualLine keeps the anchor;
//! * leaving visual caches the selection for `gv` and clears it;
//! * entering Insert constructs the handler against the undo log so a group
//!   left open by `o`/`O`/`c` is continued rather than nested;
//! * entering Normal parks the cursor on a character cell.
//!
//! `DispatchResult::dirty` tells the shell a redraw is needed: any observable
//! change to text, cursor, mode, selection or message marks it.

use crate::context::{EditContext, HandlerResult, Transition};
use crate::handlers::{
    CommandHandler, InsertHandler, ModeHandler, NormalHandler, SearchHandler, VisualHandler,
};
use crate::search::SearchState;
use core_config::EditorOptions;
use core_events::KeyEvent;
use core_state::{Mode, RegisterBank, Selection, SelectionKind, UndoLog};
use core_text::{LineBuffer, Position};
use tracing::{debug, trace};

/// Outcome of one dispatched key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub mode: Mode,
    /// Status-line message produced by the key, if any.
    pub message: Option<String>,
    /// Command-line text submitted with `Enter` in Command mode.
    pub command: Option<String>,
}

#[derive(Debug)]
enum ActiveHandler {
    Normal(NormalHandler),
    Insert(InsertHandler),
    Visual(VisualHandler),
    Search(SearchHandler),
    Command(CommandHandler),
}

impl ActiveHandler {
    fn get_mut(&mut self) -> &mut dyn ModeHandler {
        match self {
            ActiveHandler::Normal(h) => h,
            ActiveHandler::Insert(h) => h,
            ActiveHandler::Visual(h) => h,
            ActiveHandler::Search(h) => h,
            ActiveHandler::Command(h) => h,
        }
    }

    fn get(&self) -> &dyn ModeHandler {
        match self {
            ActiveHandler::Normal(h) => h,
            ActiveHandler::Insert(h) => h,
            ActiveHandler::Visual(h) => h,
            ActiveHandler::Search(h) => h,
            ActiveHandler::Command(h) => h,
        }
    }
}

pub struct ModeOrchestrator {
    buffer: LineBuffer,
    undo: UndoLog,
    registers: RegisterBank,
    search: SearchState,
    options: EditorOptions,
    selection: Option<Selection>,
    last_visual: Option<Selection>,
    handler: ActiveHandler,
}

impl ModeOrchestrator {
    pub fn new(buffer: LineBuffer, options: EditorOptions) -> Self {
        Self::with_registers(buffer, options, RegisterBank::new())
    }

    /// Construct with a prepared register bank (e.g. one carrying a clipboard).
    pub fn with_registers(
        buffer: LineBuffer,
        options: EditorOptions,
        mut registers: RegisterBank,
    ) -> Self {
        registers.set_clipboard_sync(options.clipboard_unnamed);
        Self {
            buffer,
            undo: UndoLog::new(),
            registers,
            search: SearchState::default(),
            options,
            selection: None,
            last_visual: None,
            handler: ActiveHandler::Normal(NormalHandler::new()),
        }
    }

    pub fn mode(&self) -> Mode {
        self.handler.get().mode()
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    /// Direct buffer access for the shell (load, readonly toggling). Edits made
    /// here bypass the undo log.
    pub fn buffer_mut(&mut self) -> &mut LineBuffer {
        &mut self.buffer
    }

    pub fn registers(&self) -> &RegisterBank {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut RegisterBank {
        &mut self.registers
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.undo.redo_depth()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn last_visual(&self) -> Option<&Selection> {
        self.last_visual.as_ref()
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    /// Match spans `(start_col, end_col)` on `row` for the current pattern.
    pub fn matches_on_row(&mut self, row: usize) -> &[(usize, usize)] {
        self.search.refresh(&self.buffer, &self.options);
        self.search.matches_on_row(row)
    }

    /// Keys typed but not yet resolved, or the prompt line being edited.
    pub fn pending_keys(&self) -> String {
        self.handler.get().pending_keys()
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: EditorOptions) {
        debug!(target: "config", ?options, "options_replaced");
        self.registers.set_clipboard_sync(options.clipboard_unnamed);
        self.options = options;
    }

    /// Dispatch one key event. `cursor` is the shell's cursor, updated in place.
    pub fn handle_key(&mut self, key: &KeyEvent, cursor: &mut Position) -> DispatchResult {
        let tick_before = self.buffer.change_tick();
        let cursor_before = *cursor;
        let mode_before = self.mode();
        let selection_before = self.selection;

        let result = {
            let mut ctx = EditContext {
                buffer: &mut self.buffer,
                undo: &mut self.undo,
                registers: &mut self.registers,
                search: &mut self.search,
                options: &self.options,
                selection: &mut self.selection,
                cursor: &mut *cursor,
            };
            self.handler.get_mut().handle_key(key, &mut ctx)
        };
        trace!(target: "actions.dispatch", %key, mode = mode_before.label(), transition = ?result.transition, "key");

        let HandlerResult {
            transition,
            message,
            command,
        } = result;
        match transition {
            Transition::Stay => {}
            Transition::Enter(mode) => self.enter(mode, cursor),
            Transition::ReselectVisual => self.reselect(cursor),
        }

        let mode = self.mode();
        let dirty = self.buffer.change_tick() != tick_before
            || *cursor != cursor_before
            || mode != mode_before
            || self.selection != selection_before
            || message.is_some();
        DispatchResult {
            dirty,
            mode,
            message,
            command,
        }
    }

    fn enter(&mut self, mode: Mode, cursor: &mut Position) {
        let from = self.mode();
        debug!(target: "actions.dispatch", from = from.label(), to = mode.label(), "mode_transition");
        if from.is_visual() && !mode.is_visual() {
            self.last_visual = self.selection.take();
        }
        self.handler = match mode {
            Mode::Normal => {
                *cursor = self.buffer.clamp_normal(*cursor);
                ActiveHandler::Normal(NormalHandler::new())
            }
            Mode::Insert => ActiveHandler::Insert(InsertHandler::new(&mut self.undo)),
            Mode::Visual | Mode::VisualLine => {
                let kind = mode.selection_kind().unwrap_or(SelectionKind::Characterwise);
                match self.selection.as_mut() {
                    Some(sel) => sel.kind = kind,
                    None => self.selection = Some(Selection::new(*cursor, kind)),
                }
                ActiveHandler::Visual(VisualHandler::new(mode))
            }
            Mode::SearchForward => ActiveHandler::Search(SearchHandler::new(true)),
            Mode::SearchBackward => ActiveHandler::Search(SearchHandler::new(false)),
            Mode::Command => ActiveHandler::Command(CommandHandler::new()),
        };
    }

    fn reselect(&mut self, cursor: &mut Position) {
        let Some(mut sel) = self.last_visual else {
            trace!(target: "actions.dispatch", "no_previous_visual");
            return;
        };
        sel.start = self.buffer.clamp_normal(sel.start);
        sel.end = self.buffer.clamp_normal(sel.end);
        *cursor = sel.end;
        let mode = if sel.is_linewise() {
            Mode::VisualLine
        } else {
            Mode::Visual
        };
        self.selection = Some(sel);
        self.enter(mode, cursor);
    }
}

impl std::fmt::Debug for ModeOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeOrchestrator")
            .field("mode", &self.mode())
            .field("lines", &self.buffer.line_count())
            .field("undo_depth", &self.undo.undo_depth())
            .field("selection", &self.selection)
            .finish()
    }
}
