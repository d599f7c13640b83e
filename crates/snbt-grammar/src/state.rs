//! Parse state: input, scope, cut controls, packrat cache and error sink

use crate::atom::AtomId;
use crate::control::{Control, ControlPool};
use crate::error::{reason, GrammarError, GrammarResult, Reason};
use crate::error_collector::{ErrorCollector, NoOp};
use crate::rule::NamedRule;
use crate::scope::{Scope, Value};
use smallvec::SmallVec;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tracing::trace;

/// Anything with a cursor that can be saved and rewound.
pub trait ParseInput {
    fn mark(&self) -> usize;
    fn restore(&mut self, cursor: usize);
}

#[derive(Clone)]
enum CacheEntry {
    /// The rule does not match at this position. `silent` failures
    /// reported nothing and are parsed again when errors are wanted.
    Negative { silent: bool },
    Hit { value: Value, end: usize },
}

/// Rules tried at one position. Few rules start at any given position,
/// so a short inline list beats a map.
type PositionCache = SmallVec<[(AtomId, CacheEntry); 4]>;

/// Everything a single parse run mutates.
///
/// A state is used for exactly one parse. Grammars are shared and
/// immutable; concurrent parses each build their own state.
pub struct ParseState<'c, S> {
    input: S,
    scope: Scope,
    errors: &'c mut dyn ErrorCollector,
    silent_errors: NoOp,
    silent_depth: usize,
    controls: ControlPool,
    cache: Vec<Option<PositionCache>>,
}

impl<'c, S> ParseState<'c, S> {
    pub fn new(input: S, errors: &'c mut dyn ErrorCollector) -> Self {
        Self {
            input,
            scope: Scope::new(),
            errors,
            silent_errors: NoOp,
            silent_depth: 0,
            controls: ControlPool::default(),
            cache: Vec::new(),
        }
    }

    pub fn input(&self) -> &S {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut S {
        &mut self.input
    }

    pub fn into_input(self) -> S {
        self.input
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }

    /// The active collector; a no-op one while silenced
    pub fn errors(&mut self) -> &mut dyn ErrorCollector {
        if self.silent_depth > 0 {
            &mut self.silent_errors
        } else {
            &mut *self.errors
        }
    }

    pub fn is_silent(&self) -> bool {
        self.silent_depth > 0
    }

    pub(crate) fn acquire_control(&mut self) -> Control {
        self.controls.acquire()
    }

    pub(crate) fn release_control(&mut self) {
        self.controls.release();
    }

    pub fn has_cut(&self, control: Control) -> bool {
        self.controls.has_cut(control)
    }
}

impl<S: ParseInput> ParseState<'_, S> {
    pub fn mark(&self) -> usize {
        self.input.mark()
    }

    pub fn restore(&mut self, cursor: usize) {
        self.input.restore(cursor);
    }

    /// Report `error` at the current cursor.
    pub fn store_error<E>(&mut self, error: E)
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let cursor = self.mark();
        self.store_error_at(cursor, error);
    }

    pub fn store_error_at<E>(&mut self, cursor: usize, error: E)
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        if !self.is_silent() {
            self.errors.store(cursor, reason(error));
        }
    }

    /// Report an already shared reason.
    pub fn store_reason(&mut self, cursor: usize, reason: &Reason) {
        if !self.is_silent() {
            self.errors.store(cursor, Arc::clone(reason));
        }
    }

    /// Run `f` with error reporting muted. Nests.
    pub fn silent<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let mut guard = SilentGuard::enter(self);
        f(&mut guard)
    }

    /// Commit the alternative owning `control` to its current branch.
    pub fn cut(&mut self, control: Control) {
        if control.is_bound() {
            trace!(cursor = self.mark(), "cut");
        }
        self.controls.cut(control);
    }

    fn cached(&self, cursor: usize, atom: AtomId) -> Option<CacheEntry> {
        self.cache
            .get(cursor)?
            .as_ref()?
            .iter()
            .find(|(key, _)| *key == atom)
            .map(|(_, entry)| entry.clone())
    }

    fn insert_cached(&mut self, cursor: usize, atom: AtomId, entry: CacheEntry) {
        if cursor >= self.cache.len() {
            self.cache.resize_with(cursor + 1, || None);
        }
        let position = self.cache[cursor].get_or_insert_with(SmallVec::new);
        match position.iter_mut().find(|(key, _)| *key == atom) {
            Some(slot) => slot.1 = entry,
            None => position.push((atom, entry)),
        }
    }

    /// Apply a named rule at the cursor, going through the packrat cache.
    ///
    /// A cached failure is not reported again when the first attempt
    /// stored its reasons. A failure first seen under look-ahead stored
    /// none, so it is parsed again once reporting is back on.
    pub fn parse<T>(&mut self, rule: &NamedRule<S, T>) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let start = self.mark();
        let atom = rule.atom().id();
        match self.cached(start, atom) {
            Some(CacheEntry::Negative { silent }) if !silent || self.is_silent() => {
                trace!(rule = %atom, cursor = start, "cache hit (no match)");
                return None;
            }
            Some(CacheEntry::Negative { .. }) => {
                trace!(rule = %atom, cursor = start, "reparsing silent failure");
            }
            Some(CacheEntry::Hit { value, end }) => {
                trace!(rule = %atom, cursor = start, end, "cache hit");
                self.restore(end);
                return value.downcast_ref::<T>().cloned();
            }
            None => trace!(rule = %atom, cursor = start, "cache miss"),
        }

        let result = rule.rule().parse(self);
        let entry = match &result {
            Some(value) => CacheEntry::Hit {
                value: Arc::new(value.clone()),
                end: self.mark(),
            },
            None => CacheEntry::Negative {
                silent: self.is_silent(),
            },
        };
        self.insert_cached(start, atom, entry);
        result
    }

    /// Parse `rule` as the whole grammar and check the scope afterwards.
    pub fn parse_top_rule<T>(&mut self, rule: &NamedRule<S, T>) -> GrammarResult<Option<T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        let parsed = self.parse(rule);
        if parsed.is_some() {
            let cursor = self.mark();
            self.errors().finish(cursor);
        }
        if !self.scope.has_only_single_frame() {
            return Err(GrammarError::MalformedScope(self.scope.to_string()));
        }
        Ok(parsed)
    }
}

impl<S: fmt::Debug> fmt::Debug for ParseState<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseState")
            .field("input", &self.input)
            .field("scope", &self.scope)
            .field("silent_depth", &self.silent_depth)
            .field("controls", &self.controls)
            .field("cached_positions", &self.cache.iter().flatten().count())
            .finish_non_exhaustive()
    }
}

/// Raises the silent depth for its lifetime, also when unwinding.
struct SilentGuard<'a, 'c, S> {
    state: &'a mut ParseState<'c, S>,
}

impl<'a, 'c, S> SilentGuard<'a, 'c, S> {
    fn enter(state: &'a mut ParseState<'c, S>) -> Self {
        state.silent_depth += 1;
        Self { state }
    }
}

impl<'c, S> Deref for SilentGuard<'_, 'c, S> {
    type Target = ParseState<'c, S>;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl<S> DerefMut for SilentGuard<'_, '_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl<S> Drop for SilentGuard<'_, '_, S> {
    fn drop(&mut self) {
        self.state.silent_depth -= 1;
    }
}
