//! Line-oriented text buffer.
//!
//! `LineBuffer` owns the document as an ordered `Vec<String>` of lines (never
//! empty: removing the last remaining line leaves a single empty line). Every
//! mutation primitive exists in two forms:
//!
//! * `*_raw` mutates without recording anything. Undo/redo replay goes through
//!   these so replaying an action never logs a new one.
//! * The recording form takes an `UndoSink` and, when the mutation actually
//!   changed the buffer, hands it the inverse-capable `UndoableAction`.
//!
//! Columns are character indices within a line (`0..=line_len`). Out-of-range
//! input is clamped or turns the call into a no-op; nothing here panics on a
//! bad position.
//!
//! `change_tick` increases on every mutation (raw or recorded). Collaborators
//! that cache derived data (search matches, highlighting) compare ticks to
//! decide when to recompute.

use anyhow::{Context, Result, bail};
use std::path::Path;

pub mod action;
pub mod motion;

pub use action::{UndoSink, UndoableAction};

/// A position inside a buffer expressed as (line index, character column within that line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
    pub fn origin() -> Self {
        Self { line: 0, col: 0 }
    }
}

/// Byte offset of character column `col` in `s` (clamped to `s.len()`).
pub fn byte_index(s: &str, col: usize) -> usize {
    s.char_indices().nth(col).map(|(b, _)| b).unwrap_or(s.len())
}

/// Character column of byte offset `byte` in `s`.
pub fn char_col(s: &str, byte: usize) -> usize {
    s[..byte.min(s.len())].chars().count()
}

#[derive(Debug, Clone)]
pub struct LineBuffer {
    lines: Vec<String>,
    pub name: String,
    modified: bool,
    readonly: bool,
    change_tick: u64,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new("[No Name]")
    }
}

impl LineBuffer {
    /// Empty buffer holding one empty line.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            lines: vec![String::new()],
            name: name.into(),
            modified: false,
            readonly: false,
            change_tick: 0,
        }
    }

    /// Construct a buffer from in-memory text. A single trailing newline does not
    /// produce an extra empty line; CRLF endings are normalized to LF.
    pub fn from_str(name: impl Into<String>, content: &str) -> Self {
        let mut buf = Self::new(name);
        buf.lines = split_content(content);
        buf
    }

    pub fn from_lines<I, S>(name: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut buf = Self::new(name);
        buf.lines = lines.into_iter().map(Into::into).collect();
        if buf.lines.is_empty() {
            buf.lines.push(String::new());
        }
        buf
    }

    /// Replace all lines with the file's contents and clear the modified flag.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let readonly = std::fs::metadata(path)
            .map(|m| m.permissions().readonly())
            .unwrap_or(false);
        self.lines = split_content(&content);
        self.name = path.display().to_string();
        self.readonly = readonly;
        self.touch();
        self.modified = false;
        tracing::debug!(target: "text.buffer", path = %path.display(), lines = self.lines.len(), readonly, "load");
        Ok(())
    }

    /// Write lines joined by `\n` with a trailing newline and clear the modified flag.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        if self.readonly {
            bail!("E45: 'readonly' option is set for {}", self.name);
        }
        std::fs::write(path, self.text()).with_context(|| format!("writing {}", path.display()))?;
        self.modified = false;
        tracing::debug!(target: "text.buffer", path = %path.display(), lines = self.lines.len(), "save");
        Ok(())
    }

    /// Whole document as saved to disk.
    pub fn text(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Length of a line in characters (0 for out-of-range lines).
    pub fn line_len(&self, idx: usize) -> usize {
        self.lines.get(idx).map(|l| l.chars().count()).unwrap_or(0)
    }

    /// Characters of a line (empty for out-of-range lines).
    pub fn line_chars(&self, idx: usize) -> Vec<char> {
        self.lines
            .get(idx)
            .map(|l| l.chars().collect())
            .unwrap_or_default()
    }

    pub fn char_at(&self, pos: Position) -> Option<char> {
        self.lines.get(pos.line).and_then(|l| l.chars().nth(pos.col))
    }

    pub fn last_line(&self) -> usize {
        self.lines.len() - 1
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }
    pub fn is_readonly(&self) -> bool {
        self.readonly
    }
    pub fn set_readonly(&mut self, readonly: bool) {
        self.readonly = readonly;
    }
    /// Monotonic mutation counter.
    pub fn change_tick(&self) -> u64 {
        self.change_tick
    }

    /// Clamp to a valid position (`col` may sit one past the last character).
    pub fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.last_line());
        Position::new(line, pos.col.min(self.line_len(line)))
    }

    /// Clamp for Normal-mode semantics: the cursor rests on a character cell,
    /// i.e. `col <= line_len - 1` (0 on empty lines).
    pub fn clamp_normal(&self, pos: Position) -> Position {
        let line = pos.line.min(self.last_line());
        let max = self.line_len(line).saturating_sub(1);
        Position::new(line, pos.col.min(max))
    }

    /// Text covered by `[start, end)` (ordered and clamped). Line breaks inside
    /// the range appear as `\n`.
    pub fn text_range(&self, start: Position, end: Position) -> String {
        let (start, end) = self.order_clamped(start, end);
        if start.line == end.line {
            let line = &self.lines[start.line];
            let a = byte_index(line, start.col);
            let b = byte_index(line, end.col);
            return line[a..b].to_string();
        }
        let first = &self.lines[start.line];
        let mut out = first[byte_index(first, start.col)..].to_string();
        for mid in &self.lines[start.line + 1..end.line] {
            out.push('\n');
            out.push_str(mid);
        }
        let last = &self.lines[end.line];
        out.push('\n');
        out.push_str(&last[..byte_index(last, end.col)]);
        out
    }

    fn order_clamped(&self, a: Position, b: Position) -> (Position, Position) {
        let a = self.clamp(a);
        let b = self.clamp(b);
        if a <= b { (a, b) } else { (b, a) }
    }

    fn touch(&mut self) {
        self.modified = true;
        self.change_tick += 1;
    }

    // ------------------------------------------------------------------
    // Raw primitives (no recording)
    // ------------------------------------------------------------------

    /// Insert `ch` at `pos` (column clamped). Returns false if the line does not exist.
    pub fn insert_char_raw(&mut self, pos: Position, ch: char) -> bool {
        let Some(line) = self.lines.get_mut(pos.line) else {
            return false;
        };
        let at = byte_index(line, pos.col);
        line.insert(at, ch);
        self.touch();
        true
    }

    /// Remove the character at `pos`; no-op (None) at or past end of line.
    pub fn delete_char_raw(&mut self, pos: Position) -> Option<char> {
        let line = self.lines.get_mut(pos.line)?;
        let at = line.char_indices().nth(pos.col).map(|(b, _)| b)?;
        let ch = line.remove(at);
        self.touch();
        Some(ch)
    }

    /// Insert a new line at index `idx` (clamped to `line_count`). Returns the index used.
    pub fn insert_line_raw(&mut self, idx: usize, text: &str) -> usize {
        let idx = idx.min(self.lines.len());
        self.lines.insert(idx, text.to_string());
        self.touch();
        idx
    }

    /// Remove line `idx`. Removing the only line leaves one empty line.
    pub fn delete_line_raw(&mut self, idx: usize) -> Option<String> {
        if idx >= self.lines.len() {
            return None;
        }
        let removed = if self.lines.len() == 1 {
            std::mem::take(&mut self.lines[0])
        } else {
            self.lines.remove(idx)
        };
        self.touch();
        Some(removed)
    }

    /// Split the line at `pos`: text from the column onward moves to a new line below.
    pub fn split_line_raw(&mut self, pos: Position) -> bool {
        let Some(line) = self.lines.get_mut(pos.line) else {
            return false;
        };
        let at = byte_index(line, pos.col);
        let tail = line.split_off(at);
        self.lines.insert(pos.line + 1, tail);
        self.touch();
        true
    }

    /// Append line `idx + 1` onto line `idx`. Returns the join column (old length of `idx`).
    pub fn join_lines_raw(&mut self, idx: usize) -> Option<usize> {
        if idx + 1 >= self.lines.len() {
            return None;
        }
        let next = self.lines.remove(idx + 1);
        let line = &mut self.lines[idx];
        let col = line.chars().count();
        line.push_str(&next);
        self.touch();
        Some(col)
    }

    /// Remove `[start, end)` (ordered and clamped), possibly spanning lines.
    /// Returns the removed text in the form `restore_range_raw` reinserts.
    pub fn delete_range_raw(&mut self, start: Position, end: Position) -> String {
        let (start, end) = self.order_clamped(start, end);
        if start == end {
            return String::new();
        }
        let removed = self.text_range(start, end);
        let last = &self.lines[end.line];
        let suffix = last[byte_index(last, end.col)..].to_string();
        let first = &mut self.lines[start.line];
        let at = byte_index(first, start.col);
        first.truncate(at);
        first.push_str(&suffix);
        if end.line > start.line {
            self.lines.drain(start.line + 1..=end.line);
        }
        self.touch();
        removed
    }

    /// Reinsert text captured by `delete_range_raw` at `start`. Returns the position
    /// just past the inserted text.
    pub fn restore_range_raw(&mut self, start: Position, text: &str) -> Position {
        let start = self.clamp(start);
        let segments: Vec<&str> = text.split('\n').collect();
        let line = &mut self.lines[start.line];
        let at = byte_index(line, start.col);
        if segments.len() == 1 {
            line.insert_str(at, text);
            self.touch();
            return Position::new(start.line, start.col + text.chars().count());
        }
        let tail = line.split_off(at);
        line.push_str(segments[0]);
        let last_idx = segments.len() - 1;
        for (offset, seg) in segments[1..].iter().enumerate() {
            let mut new_line = seg.to_string();
            if offset + 1 == last_idx {
                new_line.push_str(&tail);
            }
            self.lines.insert(start.line + 1 + offset, new_line);
        }
        self.touch();
        Position::new(start.line + last_idx, segments[last_idx].chars().count())
    }

    /// Replace the content of line `idx`, returning the previous content.
    pub fn replace_line_raw(&mut self, idx: usize, text: &str) -> Option<String> {
        let line = self.lines.get_mut(idx)?;
        let old = std::mem::replace(line, text.to_string());
        self.touch();
        Some(old)
    }

    // ------------------------------------------------------------------
    // Recording primitives
    // ------------------------------------------------------------------

    pub fn insert_char(&mut self, sink: &mut dyn UndoSink, pos: Position, ch: char) -> bool {
        let at = self.clamp(pos);
        if pos.line >= self.lines.len() || !self.insert_char_raw(at, ch) {
            return false;
        }
        sink.record(UndoableAction::InsertChar { at, ch });
        true
    }

    pub fn delete_char(&mut self, sink: &mut dyn UndoSink, pos: Position) -> Option<char> {
        let ch = self.delete_char_raw(pos)?;
        sink.record(UndoableAction::DeleteChar { at: pos, ch });
        Some(ch)
    }

    pub fn insert_line(&mut self, sink: &mut dyn UndoSink, idx: usize, text: &str) -> usize {
        let line = self.insert_line_raw(idx, text);
        sink.record(UndoableAction::InsertLine {
            line,
            text: text.to_string(),
        });
        line
    }

    pub fn delete_line(&mut self, sink: &mut dyn UndoSink, idx: usize) -> Option<String> {
        let sole = self.lines.len() == 1;
        let text = self.delete_line_raw(idx)?;
        sink.record(UndoableAction::DeleteLine {
            line: idx,
            text: text.clone(),
            sole,
        });
        Some(text)
    }

    pub fn split_line(&mut self, sink: &mut dyn UndoSink, pos: Position) -> bool {
        let at = self.clamp(pos);
        if pos.line >= self.lines.len() || !self.split_line_raw(at) {
            return false;
        }
        sink.record(UndoableAction::SplitLine { at });
        true
    }

    pub fn join_lines(&mut self, sink: &mut dyn UndoSink, idx: usize) -> Option<usize> {
        let col = self.join_lines_raw(idx)?;
        sink.record(UndoableAction::JoinLines {
            at: Position::new(idx, col),
        });
        Some(col)
    }

    pub fn delete_range(
        &mut self,
        sink: &mut dyn UndoSink,
        start: Position,
        end: Position,
    ) -> String {
        let (start, end) = self.order_clamped(start, end);
        let text = self.delete_range_raw(start, end);
        if !text.is_empty() {
            sink.record(UndoableAction::DeleteRange {
                start,
                end,
                text: text.clone(),
            });
        }
        text
    }

    pub fn replace_line(
        &mut self,
        sink: &mut dyn UndoSink,
        idx: usize,
        text: &str,
    ) -> Option<String> {
        let old = self.replace_line_raw(idx, text)?;
        if old != text {
            sink.record(UndoableAction::ReplaceLine {
                line: idx,
                old: old.clone(),
                new: text.to_string(),
            });
        }
        Some(old)
    }
}

fn split_content(content: &str) -> Vec<String> {
    let body = content
        .strip_suffix("\r\n")
        .or_else(|| content.strip_suffix('\n'))
        .unwrap_or(content);
    let lines: Vec<String> = body
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
        .collect();
    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}
