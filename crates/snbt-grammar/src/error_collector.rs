//! Sinks for failure reasons reported during a parse

use crate::error::{reason, GrammarError, ReaderError, Reason};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// A failure reason and the cursor it was reported at.
#[derive(Clone)]
pub struct ErrorEntry {
    pub cursor: usize,
    pub reason: Reason,
}

impl fmt::Debug for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.reason, self.cursor)
    }
}

/// Receives every reason terms and rules report.
pub trait ErrorCollector {
    fn store(&mut self, cursor: usize, reason: Reason);

    /// Called with the final cursor after a successful top-level parse.
    fn finish(&mut self, cursor: usize);
}

/// Keeps only the reasons reported at the furthest cursor.
///
/// Backtracking makes most failures irrelevant: the parse went further
/// elsewhere. What remains is what the user most likely got wrong.
#[derive(Debug, Default)]
pub struct LongestOnly {
    entries: Vec<Reason>,
    last_cursor: Option<usize>,
}

impl LongestOnly {
    pub fn new() -> Self {
        Self::default()
    }

    fn discard_errors_from_shorter_parse(&mut self, cursor: usize) {
        if self.last_cursor.is_none_or(|last| cursor > last) {
            self.last_cursor = Some(cursor);
            self.entries.clear();
        }
    }

    pub fn entries(&self) -> Vec<ErrorEntry> {
        let Some(cursor) = self.last_cursor else {
            return Vec::new();
        };
        self.entries
            .iter()
            .map(|reason| ErrorEntry {
                cursor,
                reason: Reason::clone(reason),
            })
            .collect()
    }

    /// Cursor of the surviving entries, if anything was reported
    pub fn cursor(&self) -> Option<usize> {
        self.last_cursor
    }

    /// The surviving reasons as one parse error.
    ///
    /// Reasons with the same message are reported once. A single reason
    /// becomes [`GrammarError::Parse`]; several become
    /// [`GrammarError::Aggregate`]. With nothing reported the error is
    /// [`ReaderError::NoMatch`] at `fallback_cursor`.
    pub fn to_error(&self, fallback_cursor: usize) -> GrammarError {
        if self.entries.is_empty() {
            debug!(cursor = fallback_cursor, "parse failed without reasons");
            return GrammarError::Parse {
                cursor: fallback_cursor,
                reason: reason(ReaderError::NoMatch),
            };
        }
        let cursor = self.last_cursor.unwrap_or(fallback_cursor);
        let mut seen = HashSet::new();
        let mut reasons: Vec<Reason> = self
            .entries
            .iter()
            .filter(|reason| seen.insert(reason.to_string()))
            .map(Reason::clone)
            .collect();
        debug!(cursor, reasons = reasons.len(), "parse failed");

        if reasons.len() == 1 {
            if let Some(reason) = reasons.pop() {
                return GrammarError::Parse { cursor, reason };
            }
        }
        GrammarError::Aggregate { cursor, reasons }
    }
}

impl ErrorCollector for LongestOnly {
    fn store(&mut self, cursor: usize, reason: Reason) {
        self.discard_errors_from_shorter_parse(cursor);
        if self.last_cursor == Some(cursor) {
            self.entries.push(reason);
        }
    }

    fn finish(&mut self, cursor: usize) {
        self.discard_errors_from_shorter_parse(cursor);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOp;

impl ErrorCollector for NoOp {
    fn store(&mut self, _cursor: usize, _reason: Reason) {}

    fn finish(&mut self, _cursor: usize) {}
}
