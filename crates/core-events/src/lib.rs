//! Key event types consumed by the modal engine.
//!
//! The editor shell owns the input-read loop; it normalizes whatever the
//! terminal (or GUI) produces into a `KeyEvent` and hands exactly one event at
//! a time to the orchestrator. Nothing in this crate performs I/O.
//!
//! A small key-notation parser (`parse_keys`) turns scripts such as
//! `"ihello<Esc>dd"` into event sequences. Tests and the replay binary use it
//! so key sequences read the way a user would type them.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// KeyCode enumerates normalized logical key representations consumed by higher layers.
/// Printable keys (including ':' and '/') always arrive as `Char`.
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Unmodified key.
    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// Unmodified printable character.
    pub fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    /// `<C-c>` style chord.
    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    pub fn is_ctrl(&self, c: char) -> bool {
        self.mods.contains(KeyModifiers::CTRL) && self.code == KeyCode::Char(c)
    }

    /// Printable character carried by the event when no Ctrl/Alt modifier is held.
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if !self.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) => {
                Some(c)
            }
            _ => None,
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.code {
            KeyCode::Char('<') => "lt".to_string(),
            KeyCode::Char(c) => {
                if self.mods.is_empty() || self.mods == KeyModifiers::SHIFT {
                    return write!(f, "{c}");
                }
                c.to_string()
            }
            KeyCode::Enter => "CR".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Backspace => "BS".to_string(),
            KeyCode::Delete => "Del".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
        };
        let mut prefix = String::new();
        if self.mods.contains(KeyModifiers::CTRL) {
            prefix.push_str("C-");
        }
        if self.mods.contains(KeyModifiers::ALT) {
            prefix.push_str("A-");
        }
        write!(f, "<{prefix}{name}>")
    }
}

/// Key-notation parse failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("unterminated key notation starting at offset {0}")]
    Unterminated(usize),
    #[error("unknown key notation <{0}>")]
    Unknown(String),
}

/// Parse a Vim-style key script into events.
///
/// Plain characters map to `KeyEvent::char`. Angle-bracket notation covers the
/// named keys (`<Esc>`, `<CR>`/`<Enter>`, `<BS>`, `<Del>`, `<Tab>`, arrows,
/// `<Home>`, `<End>`, `<lt>`) and Ctrl/Alt chords (`<C-r>`, `<A-x>`).
pub fn parse_keys(script: &str) -> Result<Vec<KeyEvent>, KeyParseError> {
    let mut out = Vec::with_capacity(script.len());
    let mut rest = script.char_indices();
    while let Some((offset, c)) = rest.next() {
        if c != '<' {
            out.push(KeyEvent::char(c));
            continue;
        }
        let mut name = String::new();
        let mut closed = false;
        for (_, nc) in rest.by_ref() {
            if nc == '>' {
                closed = true;
                break;
            }
            name.push(nc);
        }
        if !closed {
            return Err(KeyParseError::Unterminated(offset));
        }
        out.push(parse_named(&name)?);
    }
    Ok(out)
}

fn parse_named(name: &str) -> Result<KeyEvent, KeyParseError> {
    let mut mods = KeyModifiers::empty();
    let mut base = name;
    loop {
        if let Some(stripped) = base.strip_prefix("C-").or_else(|| base.strip_prefix("c-")) {
            mods |= KeyModifiers::CTRL;
            base = stripped;
        } else if let Some(stripped) = base.strip_prefix("A-").or_else(|| base.strip_prefix("M-"))
        {
            mods |= KeyModifiers::ALT;
            base = stripped;
        } else {
            break;
        }
    }
    let code = match base.to_ascii_lowercase().as_str() {
        "esc" => KeyCode::Esc,
        "cr" | "enter" | "return" => KeyCode::Enter,
        "bs" | "backspace" => KeyCode::Backspace,
        "del" | "delete" => KeyCode::Delete,
        "tab" => KeyCode::Tab,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "lt" => KeyCode::Char('<'),
        "space" => KeyCode::Char(' '),
        _ => {
            let mut chars = base.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if !mods.is_empty() => KeyCode::Char(c),
                _ => return Err(KeyParseError::Unknown(name.to_string())),
            }
        }
    };
    Ok(KeyEvent::new(code, mods))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_display() {
        assert_eq!(KeyEvent::char('x').to_string(), "x");
        assert_eq!(KeyEvent::ctrl('r').to_string(), "<C-r>");
        assert_eq!(KeyEvent::plain(KeyCode::Esc).to_string(), "<Esc>");
    }

    #[test]
    fn parses_plain_and_named_keys() {
        let keys = parse_keys("ia<Esc>dd<C-r><lt>").unwrap();
        assert_eq!(
            keys,
            vec![
                KeyEvent::char('i'),
                KeyEvent::char('a'),
                KeyEvent::plain(KeyCode::Esc),
                KeyEvent::char('d'),
                KeyEvent::char('d'),
                KeyEvent::ctrl('r'),
                KeyEvent::char('<'),
            ]
        );
    }

    #[test]
    fn rejects_unterminated_and_unknown_notation() {
        assert_eq!(parse_keys("ab<Esc"), Err(KeyParseError::Unterminated(2)));
        assert_eq!(
            parse_keys("<Nope>"),
            Err(KeyParseError::Unknown("Nope".to_string()))
        );
    }

    #[test]
    fn printable_excludes_ctrl_chords() {
        assert_eq!(KeyEvent::char('q').printable(), Some('q'));
        assert_eq!(KeyEvent::ctrl('q').printable(), None);
        assert!(KeyEvent::ctrl('r').is_ctrl('r'));
    }
}
