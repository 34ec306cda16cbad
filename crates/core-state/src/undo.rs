use core_text::{LineBuffer, Position, UndoSink, UndoableAction};
use std::collections::VecDeque;
use tracing::trace;

/// Maximum number of entries retained in undo history.
pub const UNDO_HISTORY_MAX: usize = 200;

/// Two-stack undo history with a single optional open group.
///
/// Invariants:
/// * A mutation recorded with no group open lands on the undo stack and clears
///   the redo stack.
/// * While a group is open, recorded actions accumulate in it; closing a
///   non-empty group pushes exactly one `Group` entry (and clears redo),
///   closing an empty one pushes nothing.
/// * At most one group is open. `begin_group` while one is open keeps the
///   current accumulator and returns `false`; the caller that received `true`
///   is the one that closes it.
/// * The undo stack holds at most `capacity` entries; the oldest are evicted first.
pub struct UndoLog {
    undo_stack: VecDeque<UndoableAction>,
    redo_stack: Vec<UndoableAction>,
    group: Option<Vec<UndoableAction>>,
    capacity: usize,
    evicted: u64,
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoLog {
    pub fn new() -> Self {
        Self::with_capacity(UNDO_HISTORY_MAX)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            group: None,
            capacity: capacity.max(1),
            evicted: 0,
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
    pub fn in_group(&self) -> bool {
        self.group.is_some()
    }
    /// Entries dropped from the bottom of the undo stack so far.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn record(&mut self, action: UndoableAction) {
        if let Some(group) = self.group.as_mut() {
            group.push(action);
            trace!(target: "state.undo", group_len = group.len(), "group_accumulate");
            return;
        }
        self.push_undo(action);
        self.redo_stack.clear();
    }

    /// Open a group. Returns false (and keeps accumulating into the existing
    /// group) when one is already open.
    pub fn begin_group(&mut self) -> bool {
        if self.group.is_some() {
            trace!(target: "state.undo", "begin_group_while_open");
            return false;
        }
        self.group = Some(Vec::new());
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), "begin_group");
        true
    }

    /// Close the open group. Returns true if a `Group` entry was pushed.
    pub fn end_group(&mut self) -> bool {
        let Some(children) = self.group.take() else {
            return false;
        };
        if children.is_empty() {
            trace!(target: "state.undo", "end_group_empty");
            return false;
        }
        trace!(target: "state.undo", children = children.len(), "end_group");
        self.push_undo(UndoableAction::Group(children));
        self.redo_stack.clear();
        true
    }

    fn push_undo(&mut self, action: UndoableAction) {
        self.undo_stack.push_back(action);
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "push");
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
            self.evicted += 1;
            trace!(target: "state.undo", "undo_stack_trimmed");
        }
    }

    /// Revert the newest entry. `None` means the history was exhausted; otherwise
    /// the returned position is where the reverted change happened.
    pub fn undo(&mut self, buffer: &mut LineBuffer) -> Option<Position> {
        if self.group.is_some() {
            self.end_group();
        }
        let action = self.undo_stack.pop_back()?;
        action.undo(buffer);
        let hint = action.cursor_hint();
        self.redo_stack.push(action);
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo_pop");
        Some(hint)
    }

    /// Re-apply the newest undone entry.
    pub fn redo(&mut self, buffer: &mut LineBuffer) -> Option<Position> {
        let action = self.redo_stack.pop()?;
        action.execute(buffer);
        let hint = action.cursor_hint();
        self.undo_stack.push_back(action);
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "redo_pop");
        Some(hint)
    }
}

impl UndoSink for UndoLog {
    fn record(&mut self, action: UndoableAction) {
        UndoLog::record(self, action);
    }
}
