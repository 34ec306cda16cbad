//! Register (clipboard) model.
//!
//! Slots:
//! * unnamed (`""`): mirrors the latest yank or delete.
//! * yank (`"0`): receives yank results only.
//! * delete history (`"1`..`"9`): every delete shifts the ring, newest at `"1`.
//! * named (`"a`..`"z`): written only when selected explicitly; the uppercase
//!   name appends instead of replacing.
//! * black hole (`"_`): discards writes, always empty on read.
//! * clipboard (`"+`/`"*`): reads and writes the system clipboard directly.
//!
//! Selecting a register explicitly writes only that register; the unnamed
//! register and the history ring are left untouched.
//!
//! When clipboard sync is enabled the unnamed write paths also copy to the
//! system clipboard, and unnamed reads prefer the clipboard content when it
//! differs (treated as linewise if it ends in a newline). Clipboard failures
//! are logged and swallowed; editing never depends on the clipboard.
//!
//! Linewise content is stored with every line newline-terminated.

use std::fmt;
use tracing::{debug, trace};

pub const HISTORY_SLOTS: usize = 9;

/// System clipboard collaborator. Both directions are best-effort.
pub trait Clipboard {
    fn copy(&mut self, text: &str) -> anyhow::Result<()>;
    fn paste(&mut self) -> anyhow::Result<String>;
}

/// `arboard`-backed clipboard.
#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            inner: arboard::Clipboard::new()?,
        })
    }
}

#[cfg(feature = "system-clipboard")]
impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> anyhow::Result<()> {
        self.inner.set_text(text.to_string())?;
        Ok(())
    }

    fn paste(&mut self) -> anyhow::Result<String> {
        Ok(self.inner.get_text()?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    pub content: Option<String>,
    pub linewise: bool,
}

impl Register {
    pub fn new(text: impl Into<String>, linewise: bool) -> Self {
        Self {
            content: Some(text.into()),
            linewise,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.as_deref().is_none_or(str::is_empty)
    }

    fn append(&mut self, text: &str, linewise: bool) {
        let Some(old) = self.content.as_mut() else {
            *self = Register::new(text, linewise);
            return;
        };
        match (self.linewise, linewise) {
            (false, true) => {
                old.push('\n');
                old.push_str(text);
                self.linewise = true;
            }
            (true, false) => {
                old.push_str(text);
                old.push('\n');
            }
            _ => old.push_str(text),
        }
    }
}

/// Register selector parsed from a `"x` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterName {
    Unnamed,
    Yank,
    /// Delete history slot, 0-based (`"1` is index 0).
    History(usize),
    Named { index: usize, append: bool },
    BlackHole,
    Clipboard,
}

impl RegisterName {
    pub fn parse(c: char) -> Option<Self> {
        match c {
            '"' => Some(Self::Unnamed),
            '0' => Some(Self::Yank),
            '1'..='9' => Some(Self::History(c as usize - '1' as usize)),
            'a'..='z' => Some(Self::Named {
                index: c as usize - 'a' as usize,
                append: false,
            }),
            'A'..='Z' => Some(Self::Named {
                index: c as usize - 'A' as usize,
                append: true,
            }),
            '_' => Some(Self::BlackHole),
            '+' | '*' => Some(Self::Clipboard),
            _ => None,
        }
    }

    pub fn is_valid(c: char) -> bool {
        Self::parse(c).is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteKind {
    Yank,
    Delete,
}

pub struct RegisterBank {
    unnamed: Register,
    yank: Register,
    history: [Register; HISTORY_SLOTS],
    named: [Register; 26],
    clipboard: Option<Box<dyn Clipboard>>,
    sync_clipboard: bool,
}

impl Default for RegisterBank {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RegisterBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterBank")
            .field("unnamed", &self.unnamed)
            .field("yank", &self.yank)
            .field("history", &self.history)
            .field("sync_clipboard", &self.sync_clipboard)
            .finish_non_exhaustive()
    }
}

impl RegisterBank {
    pub fn new() -> Self {
        Self {
            unnamed: Register::default(),
            yank: Register::default(),
            history: std::array::from_fn(|_| Register::default()),
            named: std::array::from_fn(|_| Register::default()),
            clipboard: None,
            sync_clipboard: false,
        }
    }

    pub fn with_clipboard(clipboard: Box<dyn Clipboard>) -> Self {
        let mut bank = Self::new();
        bank.clipboard = Some(clipboard);
        bank
    }

    /// Mirror unnamed writes to the system clipboard (the `clipboard=unnamed` option).
    pub fn set_clipboard_sync(&mut self, enabled: bool) {
        self.sync_clipboard = enabled;
    }

    pub fn clipboard_sync(&self) -> bool {
        self.sync_clipboard
    }

    /// Record a yank: unnamed + `"0`, or only the explicitly selected register.
    pub fn yank(&mut self, text: &str, linewise: bool, name: Option<char>) {
        self.write(WriteKind::Yank, text, linewise, name);
    }

    /// Record a delete/change: unnamed + history shift, or only the selected register.
    pub fn delete(&mut self, text: &str, linewise: bool, name: Option<char>) {
        self.write(WriteKind::Delete, text, linewise, name);
    }

    fn write(&mut self, kind: WriteKind, text: &str, linewise: bool, name: Option<char>) {
        let selected = match name {
            None => RegisterName::Unnamed,
            Some(c) => match RegisterName::parse(c) {
                Some(sel) => sel,
                None => {
                    debug!(target: "state.registers", register = %c, "write_invalid_register");
                    return;
                }
            },
        };
        trace!(target: "state.registers", ?kind, ?selected, linewise, len = text.len(), "write");
        match selected {
            RegisterName::Unnamed => {
                self.unnamed = Register::new(text, linewise);
                match kind {
                    WriteKind::Yank => self.yank = Register::new(text, linewise),
                    WriteKind::Delete => self.shift_history(Register::new(text, linewise)),
                }
                if self.sync_clipboard {
                    self.copy_to_clipboard(text);
                }
            }
            RegisterName::Yank => self.yank = Register::new(text, linewise),
            RegisterName::History(i) => self.history[i] = Register::new(text, linewise),
            RegisterName::Named { index, append } => {
                if append {
                    self.named[index].append(text, linewise);
                } else {
                    self.named[index] = Register::new(text, linewise);
                }
            }
            RegisterName::BlackHole => {}
            RegisterName::Clipboard => self.copy_to_clipboard(text),
        }
    }

    fn shift_history(&mut self, entry: Register) {
        self.history.rotate_right(1);
        self.history[0] = entry;
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        if let Some(cb) = self.clipboard.as_mut()
            && let Err(err) = cb.copy(text)
        {
            debug!(target: "state.registers", error = %err, "clipboard_copy_failed");
        }
    }

    fn paste_from_clipboard(&mut self) -> Option<String> {
        let cb = self.clipboard.as_mut()?;
        match cb.paste() {
            Ok(text) => Some(text),
            Err(err) => {
                debug!(target: "state.registers", error = %err, "clipboard_paste_failed");
                None
            }
        }
    }

    /// Resolve a register for reading. `None` selects the unnamed register.
    pub fn read(&mut self, name: Option<char>) -> Register {
        let selected = match name {
            None => RegisterName::Unnamed,
            Some(c) => match RegisterName::parse(c) {
                Some(sel) => sel,
                None => return Register::default(),
            },
        };
        match selected {
            RegisterName::Unnamed => {
                if self.sync_clipboard
                    && let Some(text) = self.paste_from_clipboard()
                    && !text.is_empty()
                    && self.unnamed.content.as_deref() != Some(text.as_str())
                {
                    let linewise = text.ends_with('\n');
                    trace!(target: "state.registers", linewise, "unnamed_from_clipboard");
                    return Register::new(text, linewise);
                }
                self.unnamed.clone()
            }
            RegisterName::Yank => self.yank.clone(),
            RegisterName::History(i) => self.history[i].clone(),
            RegisterName::Named { index, .. } => self.named[index].clone(),
            RegisterName::BlackHole => Register::default(),
            RegisterName::Clipboard => match self.paste_from_clipboard() {
                Some(text) if !text.is_empty() => {
                    let linewise = text.ends_with('\n');
                    Register::new(text, linewise)
                }
                _ => Register::default(),
            },
        }
    }

    pub fn get(&mut self, name: Option<char>) -> Option<String> {
        self.read(name).content
    }

    pub fn is_linewise(&mut self, name: Option<char>) -> bool {
        self.read(name).linewise
    }

    /// Non-empty registers in display order (`"`, `0`-`9`, `a`-`z`), without
    /// consulting the clipboard.
    pub fn snapshot(&self) -> Vec<(char, Register)> {
        let mut out = Vec::new();
        let mut push = |name: char, reg: &Register| {
            if !reg.is_empty() {
                out.push((name, reg.clone()));
            }
        };
        push('"', &self.unnamed);
        push('0', &self.yank);
        for (i, reg) in self.history.iter().enumerate() {
            push((b'1' + i as u8) as char, reg);
        }
        for (i, reg) in self.named.iter().enumerate() {
            push((b'a' + i as u8) as char, reg);
        }
        out
    }
}
