//! Terminal rules over [`StringReader`] producing the matched text

use crate::error::{reason, GrammarResult, Reason};
use crate::reader::StringReader;
use crate::rule::Rule;
use crate::state::ParseState;
use regex::Regex;
use std::error::Error as StdError;
use std::fmt;

/// Byte length of the longest prefix of `text` whose chars are accepted,
/// stopping after `max` chars.
fn accepted_prefix(text: &str, accept: impl Fn(char) -> bool, max: usize) -> (usize, usize) {
    let mut count = 0;
    let mut end = 0;
    for c in text.chars() {
        if count == max || !accept(c) {
            break;
        }
        count += 1;
        end += c.len_utf8();
    }
    (count, end)
}

/// A run of digits that may contain `_` separators, but not at either end.
pub struct NumberRunRule {
    accept: fn(char) -> bool,
    no_value: Reason,
    underscore_not_allowed: Reason,
}

impl NumberRunRule {
    pub fn new<E1, E2>(accept: fn(char) -> bool, no_value: E1, underscore_not_allowed: E2) -> Self
    where
        E1: StdError + Send + Sync + 'static,
        E2: StdError + Send + Sync + 'static,
    {
        Self {
            accept,
            no_value: reason(no_value),
            underscore_not_allowed: reason(underscore_not_allowed),
        }
    }
}

impl Rule<StringReader, String> for NumberRunRule {
    fn parse(&self, state: &mut ParseState<'_, StringReader>) -> Option<String> {
        state.input_mut().skip_whitespace();
        let start = state.mark();
        let (_, length) = accepted_prefix(state.input().remaining(), self.accept, usize::MAX);
        let run = &state.input().remaining()[..length];

        if run.is_empty() {
            state.store_reason(start, &self.no_value);
            return None;
        }
        if run.starts_with('_') || run.ends_with('_') {
            state.store_reason(start, &self.underscore_not_allowed);
            return None;
        }
        let run = run.to_string();
        state.restore(start + length);
        Some(run)
    }
}

/// Between `min` and `max` characters accepted by a predicate.
pub struct GreedyPredicateRule {
    accept: fn(char) -> bool,
    min: usize,
    max: usize,
    error: Reason,
}

impl GreedyPredicateRule {
    pub fn new<E>(accept: fn(char) -> bool, min: usize, error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::bounded(accept, min, usize::MAX, error)
    }

    /// Exactly `length` characters, for fixed-width fields such as `\uXXXX`.
    pub fn exactly<E>(accept: fn(char) -> bool, length: usize, error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::bounded(accept, length, length, error)
    }

    pub fn bounded<E>(accept: fn(char) -> bool, min: usize, max: usize, error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            accept,
            min,
            max,
            error: reason(error),
        }
    }
}

impl Rule<StringReader, String> for GreedyPredicateRule {
    fn parse(&self, state: &mut ParseState<'_, StringReader>) -> Option<String> {
        let start = state.mark();
        let (count, length) = accepted_prefix(state.input().remaining(), self.accept, self.max);
        if count < self.min {
            state.store_reason(start, &self.error);
            return None;
        }
        let run = state.input().remaining()[..length].to_string();
        state.restore(start + length);
        Some(run)
    }
}

/// The longest match of a regular expression starting exactly at the cursor.
pub struct GreedyPatternRule {
    pattern: Regex,
    error: Reason,
}

impl GreedyPatternRule {
    /// Compile `pattern`; it is anchored at the cursor.
    pub fn new<E>(pattern: &str, error: E) -> GrammarResult<Self>
    where
        E: StdError + Send + Sync + 'static,
    {
        let anchored = Regex::new(&format!("^(?:{pattern})"))?;
        Ok(Self::from_regex(anchored, error))
    }

    /// Use an already compiled regex. Only matches that start at the cursor
    /// are accepted.
    pub fn from_regex<E>(pattern: Regex, error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            pattern,
            error: reason(error),
        }
    }
}

impl Rule<StringReader, String> for GreedyPatternRule {
    fn parse(&self, state: &mut ParseState<'_, StringReader>) -> Option<String> {
        let start = state.mark();
        let found = self
            .pattern
            .find(state.input().remaining())
            .filter(|m| m.start() == 0)
            .map(|m| m.as_str().to_string());
        match found {
            Some(text) => {
                state.restore(start + text.len());
                Some(text)
            }
            None => {
                state.store_reason(start, &self.error);
                None
            }
        }
    }
}

/// `[0-9A-Za-z_.+-]*` after whitespace, at least `min` characters long.
pub struct UnquotedStringRule {
    min: usize,
    error: Reason,
}

impl UnquotedStringRule {
    pub fn new<E>(min: usize, error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            min,
            error: reason(error),
        }
    }
}

impl Rule<StringReader, String> for UnquotedStringRule {
    fn parse(&self, state: &mut ParseState<'_, StringReader>) -> Option<String> {
        state.input_mut().skip_whitespace();
        let cursor = state.mark();
        let text = state.input_mut().read_unquoted_string().to_string();
        if text.len() < self.min {
            state.store_reason(cursor, &self.error);
            return None;
        }
        Some(text)
    }
}

macro_rules! reader_rule_debug {
    ($($name:ident),+) => {
        $(
            impl fmt::Debug for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(stringify!($name))
                }
            }
        )+
    };
}

reader_rule_debug!(NumberRunRule, GreedyPredicateRule, UnquotedStringRule);

impl fmt::Debug for GreedyPatternRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GreedyPatternRule({})", self.pattern.as_str())
    }
}
