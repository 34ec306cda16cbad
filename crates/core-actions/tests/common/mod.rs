#![allow(dead_code)] // Shared across many integration tests; each test binary uses a subset of helpers.

use core_actions::{DispatchResult, ModeOrchestrator};
use core_config::EditorOptions;
use core_events::parse_keys;
use core_state::Mode;
use core_text::{LineBuffer, Position};

/// Orchestrator plus the shell-owned cursor, driven by key-notation scripts.
pub struct Session {
    pub orch: ModeOrchestrator,
    pub cursor: Position,
    /// Every dispatch result produced so far, in order.
    pub results: Vec<DispatchResult>,
}

impl Session {
    pub fn new(lines: &[&str]) -> Self {
        Self::with_options(lines, EditorOptions::default())
    }

    pub fn with_options(lines: &[&str], options: EditorOptions) -> Self {
        let buffer = LineBuffer::from_lines("fixture", lines.iter().copied());
        Self {
            orch: ModeOrchestrator::new(buffer, options),
            cursor: Position::origin(),
            results: Vec::new(),
        }
    }

    pub fn at(mut self, line: usize, col: usize) -> Self {
        self.cursor = Position::new(line, col);
        self
    }

    /// Replay `script`, returning the result of the final key.
    pub fn keys(&mut self, script: &str) -> DispatchResult {
        let events = parse_keys(script).expect("valid key script");
        let mut last = None;
        for ev in events {
            let res = self.orch.handle_key(&ev, &mut self.cursor);
            self.results.push(res.clone());
            last = Some(res);
        }
        last.expect("non-empty key script")
    }

    pub fn lines(&self) -> Vec<String> {
        self.orch.buffer().lines().to_vec()
    }

    pub fn mode(&self) -> Mode {
        self.orch.mode()
    }

    /// Most recent non-empty status message, if any key produced one.
    pub fn last_message(&self) -> Option<&str> {
        self.results.iter().rev().find_map(|r| r.message.as_deref())
    }

    pub fn unnamed(&mut self) -> Option<String> {
        self.orch.registers_mut().get(None)
    }

    pub fn register(&mut self, name: char) -> Option<String> {
        self.orch.registers_mut().get(Some(name))
    }
}

pub fn lines(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}
