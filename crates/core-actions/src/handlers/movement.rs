//! Cursor movement keys shared by Normal and Visual mode.

use core_events::{KeyCode, KeyEvent};
use core_text::{LineBuffer, Position, motion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Movement {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    FirstNonBlank,
    LineEnd,
    WordForward,
    BigWordForward,
    WordBackward,
    BigWordBackward,
    WordEnd,
    BigWordEnd,
    FileStart,
    FileEnd,
    FindForward(char),
    FindBackward(char),
    TillForward(char),
    TillBackward(char),
}

pub(crate) enum MotionFeed {
    Complete(Movement),
    /// First key of `gg` or `f<c>`-style motion seen.
    Pending,
    NotMotion,
}

/// Parser for (possibly two-key) movement sequences.
#[derive(Debug, Default)]
pub(crate) struct MotionKeys {
    pending: Option<char>,
}

impl MotionKeys {
    pub(crate) fn pending(&self) -> Option<char> {
        self.pending
    }

    pub(crate) fn reset(&mut self) {
        self.pending = None;
    }

    pub(crate) fn feed(&mut self, key: &KeyEvent) -> MotionFeed {
        if let Some(p) = self.pending.take() {
            let Some(c) = key.printable() else {
                return MotionFeed::NotMotion;
            };
            return match p {
                'g' if c == 'g' => MotionFeed::Complete(Movement::FileStart),
                'f' => MotionFeed::Complete(Movement::FindForward(c)),
                'F' => MotionFeed::Complete(Movement::FindBackward(c)),
                't' => MotionFeed::Complete(Movement::TillForward(c)),
                'T' => MotionFeed::Complete(Movement::TillBackward(c)),
                _ => MotionFeed::NotMotion,
            };
        }
        let movement = match key.code {
            KeyCode::Left | KeyCode::Backspace => Movement::Left,
            KeyCode::Right => Movement::Right,
            KeyCode::Up => Movement::Up,
            KeyCode::Down => Movement::Down,
            KeyCode::Home => Movement::LineStart,
            KeyCode::End => Movement::LineEnd,
            KeyCode::Char(_) => match key.printable() {
                Some('h') => Movement::Left,
                Some('l') | Some(' ') => Movement::Right,
                Some('j') => Movement::Down,
                Some('k') => Movement::Up,
                Some('0') => Movement::LineStart,
                Some('^') => Movement::FirstNonBlank,
                Some('$') => Movement::LineEnd,
                Some('w') => Movement::WordForward,
                Some('W') => Movement::BigWordForward,
                Some('b') => Movement::WordBackward,
                Some('B') => Movement::BigWordBackward,
                Some('e') => Movement::WordEnd,
                Some('E') => Movement::BigWordEnd,
                Some('G') => Movement::FileEnd,
                Some(c @ ('g' | 'f' | 'F' | 't' | 'T')) => {
                    self.pending = Some(c);
                    return MotionFeed::Pending;
                }
                _ => return MotionFeed::NotMotion,
            },
            _ => return MotionFeed::NotMotion,
        };
        MotionFeed::Complete(movement)
    }
}

/// Move `cursor` by `movement`. `sticky_col` remembers the wanted column
/// across vertical moves (`usize::MAX` after `$`). Returns false when the
/// motion had nowhere to go.
pub(crate) fn apply(
    buf: &LineBuffer,
    cursor: &mut Position,
    movement: Movement,
    sticky_col: &mut Option<usize>,
) -> bool {
    let from = *cursor;
    let target = match movement {
        Movement::Left => motion::left(buf, from),
        Movement::Right => motion::right(buf, from, false),
        Movement::Up | Movement::Down => {
            let want = sticky_col.unwrap_or(from.col);
            *sticky_col = Some(want);
            if movement == Movement::Up {
                motion::up(buf, from, want)
            } else {
                motion::down(buf, from, want)
            }
        }
        Movement::LineStart => Some(motion::line_start(buf, from)),
        Movement::FirstNonBlank => Some(motion::first_non_blank(buf, from.line)),
        Movement::LineEnd => Some(motion::line_end(buf, from)),
        Movement::WordForward => motion::word_forward(buf, from),
        Movement::BigWordForward => motion::big_word_forward(buf, from),
        Movement::WordBackward => motion::word_backward(buf, from),
        Movement::BigWordBackward => motion::big_word_backward(buf, from),
        Movement::WordEnd => motion::word_end(buf, from),
        Movement::BigWordEnd => motion::big_word_end(buf, from),
        Movement::FileStart => Some(motion::file_start(buf)),
        Movement::FileEnd => Some(motion::file_end(buf)),
        Movement::FindForward(c) => motion::find_char_forward(buf, from, c),
        Movement::FindBackward(c) => motion::find_char_backward(buf, from, c),
        Movement::TillForward(c) => motion::till_char_forward(buf, from, c),
        Movement::TillBackward(c) => motion::till_char_backward(buf, from, c),
    };
    match movement {
        Movement::Up | Movement::Down => {}
        Movement::LineEnd => *sticky_col = Some(usize::MAX),
        _ => *sticky_col = None,
    }
    match target {
        Some(t) => {
            *cursor = buf.clamp_normal(t);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(keys: &mut MotionKeys, chars: &str) -> Option<Movement> {
        let mut last = None;
        for c in chars.chars() {
            if let MotionFeed::Complete(m) = keys.feed(&KeyEvent::char(c)) {
                last = Some(m);
            }
        }
        last
    }

    #[test]
    fn two_key_motions_resolve() {
        let mut keys = MotionKeys::default();
        assert_eq!(feed_all(&mut keys, "gg"), Some(Movement::FileStart));
        assert_eq!(feed_all(&mut keys, "tx"), Some(Movement::TillForward('x')));
        assert!(matches!(keys.feed(&KeyEvent::char('g')), MotionFeed::Pending));
        assert!(matches!(keys.feed(&KeyEvent::char('q')), MotionFeed::NotMotion));
        assert_eq!(keys.pending(), None);
    }

    #[test]
    fn vertical_moves_keep_wanted_column() {
        let buf = LineBuffer::from_str("t", "long line\nab\nlonger line");
        let mut cur = Position::new(0, 7);
        let mut sticky = None;
        assert!(apply(&buf, &mut cur, Movement::Down, &mut sticky));
        assert_eq!(cur, Position::new(1, 1));
        assert!(apply(&buf, &mut cur, Movement::Down, &mut sticky));
        assert_eq!(cur, Position::new(2, 7));
        assert!(apply(&buf, &mut cur, Movement::Left, &mut sticky));
        assert_eq!(sticky, None);
    }

    #[test]
    fn dollar_sticks_to_line_end() {
        let buf = LineBuffer::from_str("t", "abc\nabcdef");
        let mut cur = Position::origin();
        let mut sticky = None;
        apply(&buf, &mut cur, Movement::LineEnd, &mut sticky);
        assert_eq!(cur, Position::new(0, 2));
        apply(&buf, &mut cur, Movement::Down, &mut sticky);
        assert_eq!(cur, Position::new(1, 5));
    }

    #[test]
    fn failed_motion_leaves_cursor() {
        let buf = LineBuffer::from_str("t", "abc");
        let mut cur = Position::origin();
        let mut sticky = None;
        assert!(!apply(&buf, &mut cur, Movement::FindForward('z'), &mut sticky));
        assert!(!apply(&buf, &mut cur, Movement::Up, &mut sticky));
        assert_eq!(cur, Position::origin());
    }
}
