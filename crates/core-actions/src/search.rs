//! Pattern search state.
//!
//! Holds the last committed pattern and direction, and the match table for
//! the active buffer: per row, the `[start, end)` character columns of every
//! match. The table is recomputed in one pass whenever the pattern, the
//! `ignorecase` option or the buffer's change tick differs from the cached
//! key, so repeated `n` presses and highlight queries are cheap.
//!
//! An invalid pattern is logged and behaves as "no matches".

use core_config::EditorOptions;
use core_text::{LineBuffer, Position, char_col};
use regex::RegexBuilder;
use tracing::{debug, trace};

pub const NO_PREVIOUS_PATTERN: &str = "No previous search pattern";
pub const WRAPPED_TO_TOP: &str = "search hit BOTTOM, continuing at TOP";
pub const WRAPPED_TO_BOTTOM: &str = "search hit TOP, continuing at BOTTOM";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found { pos: Position, wrapped: bool },
    /// No match anywhere in the buffer.
    NotFound,
    /// Matches exist but only behind the cursor and `wrapscan` is off.
    HitBoundary,
    NoPattern,
}

impl SearchOutcome {
    /// Status-line text for this outcome.
    pub fn message(&self, pattern: &str, forward: bool) -> Option<String> {
        match self {
            SearchOutcome::Found { wrapped: false, .. } => None,
            SearchOutcome::Found { wrapped: true, .. } => Some(
                if forward {
                    WRAPPED_TO_TOP
                } else {
                    WRAPPED_TO_BOTTOM
                }
                .to_string(),
            ),
            SearchOutcome::NotFound => Some(format!("Pattern not found: {pattern}")),
            SearchOutcome::HitBoundary => Some(if forward {
                format!("E385: Search hit BOTTOM without match for: {pattern}")
            } else {
                format!("E384: Search hit TOP without match for: {pattern}")
            }),
            SearchOutcome::NoPattern => Some(NO_PREVIOUS_PATTERN.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    pattern: String,
    ignorecase: bool,
    tick: u64,
}

#[derive(Debug, Default)]
pub struct SearchState {
    pattern: Option<String>,
    forward: bool,
    matches: Vec<Vec<(usize, usize)>>,
    cache: Option<CacheKey>,
}

impl SearchState {
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Direction of the last committed search (`/` and `*` are forward).
    pub fn is_forward(&self) -> bool {
        self.forward
    }

    pub fn set_pattern(&mut self, pattern: impl Into<String>, forward: bool) {
        let pattern = pattern.into();
        trace!(target: "actions.search", %pattern, forward, "set_pattern");
        self.pattern = Some(pattern);
        self.forward = forward;
    }

    /// Recompute the match table if the cache key is stale.
    pub fn refresh(&mut self, buf: &LineBuffer, opts: &EditorOptions) {
        let Some(pattern) = self.pattern.as_deref() else {
            self.matches.clear();
            self.cache = None;
            return;
        };
        let key = CacheKey {
            pattern: pattern.to_string(),
            ignorecase: opts.ignorecase,
            tick: buf.change_tick(),
        };
        if self.cache.as_ref() == Some(&key) {
            return;
        }
        self.matches = compute_matches(buf, pattern, opts.ignorecase);
        trace!(
            target: "actions.search",
            rows = self.matches.len(),
            total = self.matches.iter().map(Vec::len).sum::<usize>(),
            "matches_recomputed"
        );
        self.cache = Some(key);
    }

    /// Matches on `row` from the last refresh.
    pub fn matches_on_row(&self, row: usize) -> &[(usize, usize)] {
        self.matches.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn match_count(&self) -> usize {
        self.matches.iter().map(Vec::len).sum()
    }

    /// Find the next match start strictly after (`forward`) or before `from`.
    pub fn find(
        &mut self,
        buf: &LineBuffer,
        opts: &EditorOptions,
        from: Position,
        forward: bool,
    ) -> SearchOutcome {
        if self.pattern.is_none() {
            return SearchOutcome::NoPattern;
        }
        self.refresh(buf, opts);
        let starts: Vec<Position> = self
            .matches
            .iter()
            .enumerate()
            .flat_map(|(row, ms)| ms.iter().map(move |&(s, _)| Position::new(row, s)))
            .collect();
        if starts.is_empty() {
            return SearchOutcome::NotFound;
        }
        let ahead = if forward {
            starts.iter().find(|p| **p > from).copied()
        } else {
            starts.iter().rev().find(|p| **p < from).copied()
        };
        if let Some(pos) = ahead {
            return SearchOutcome::Found { pos, wrapped: false };
        }
        if !opts.wrapscan {
            return SearchOutcome::HitBoundary;
        }
        let pos = if forward {
            starts[0]
        } else {
            starts[starts.len() - 1]
        };
        debug!(target: "actions.search", forward, row = pos.line, "search_wrapped");
        SearchOutcome::Found { pos, wrapped: true }
    }
}

fn compute_matches(buf: &LineBuffer, pattern: &str, ignorecase: bool) -> Vec<Vec<(usize, usize)>> {
    let re = match RegexBuilder::new(pattern).case_insensitive(ignorecase).build() {
        Ok(re) => re,
        Err(err) => {
            debug!(target: "actions.search", %pattern, error = %err, "pattern_compile_failed");
            return vec![Vec::new(); buf.line_count()];
        }
    };
    buf.lines()
        .iter()
        .map(|line| {
            re.find_iter(line)
                .filter(|m| !m.as_str().is_empty())
                .map(|m| (char_col(line, m.start()), char_col(line, m.end())))
                .collect()
        })
        .collect()
}

/// `*`/`#` pattern: the word as a literal, anchored at ASCII word boundaries
/// so a neighbouring non-ASCII letter counts as a separator, as in `word_at`.
pub fn whole_word_pattern(word: &str) -> String {
    format!(r"(?-u:\b){}(?-u:\b)", regex::escape(word))
}
