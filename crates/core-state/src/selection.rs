use core_text::{LineBuffer, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Characterwise,
    Linewise,
}

/// Visual-mode selection.
///
/// `start` is the anchor (fixed for the selection's lifetime unless the ends
/// are swapped with `o`); `end` follows the cursor. Characterwise selections
/// include both endpoint characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
    pub kind: SelectionKind,
}

impl Selection {
    pub fn new(anchor: Position, kind: SelectionKind) -> Self {
        Self {
            start: anchor,
            end: anchor,
            kind,
        }
    }

    pub fn is_linewise(&self) -> bool {
        self.kind == SelectionKind::Linewise
    }

    /// Endpoints ordered by document position.
    pub fn normalized(&self) -> (Position, Position) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// First and last covered line (inclusive).
    pub fn line_range(&self) -> (usize, usize) {
        let (a, b) = self.normalized();
        (a.line, b.line)
    }

    pub fn extend_to(&mut self, pos: Position) {
        self.end = pos;
    }

    pub fn swap_ends(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
    }

    pub fn contains(&self, pos: Position) -> bool {
        let (a, b) = self.normalized();
        match self.kind {
            SelectionKind::Linewise => (a.line..=b.line).contains(&pos.line),
            SelectionKind::Characterwise => a <= pos && pos <= b,
        }
    }

    /// Covered columns of `line` as a half-open char range, or `None` if the
    /// line is outside the selection. Renderers use this to paint highlights.
    pub fn columns_on(&self, buf: &LineBuffer, line: usize) -> Option<(usize, usize)> {
        let (a, b) = self.normalized();
        if line < a.line || line > b.line {
            return None;
        }
        let len = buf.line_len(line);
        if self.is_linewise() {
            return Some((0, len));
        }
        let from = if line == a.line { a.col } else { 0 };
        let to = if line == b.line { b.col + 1 } else { len };
        Some((from.min(len), to.min(len)))
    }
}
