//! Rules: functions from parse state to an optional value

use crate::atom::Atom;
use crate::control::Control;
use crate::state::{ParseInput, ParseState};
use crate::term::{BoxedTerm, Term};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

/// Produces a value from the input at the cursor, or `None`.
///
/// Failures are reported through the state's error collector; the return
/// value only says whether the rule matched.
pub trait Rule<S, T>: Send + Sync {
    fn parse(&self, state: &mut ParseState<'_, S>) -> Option<T>;
}

/// A rule action, run after the rule's term matched.
pub type Action<S, T> = Box<dyn Fn(&mut ParseState<'_, S>) -> Option<T> + Send + Sync>;

/// Rule backed by a plain function.
pub struct SimpleRule<F>(pub F);

impl<S, T, F> Rule<S, T> for SimpleRule<F>
where
    S: ParseInput,
    F: Fn(&mut ParseState<'_, S>) -> Option<T> + Send + Sync,
{
    fn parse(&self, state: &mut ParseState<'_, S>) -> Option<T> {
        (self.0)(state)
    }
}

impl<F> fmt::Debug for SimpleRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SimpleRule")
    }
}

/// A term run in a fresh scope frame, followed by an action that turns the
/// frame's bindings into the rule's value.
pub struct WrappedTerms<S, T> {
    term: BoxedTerm<S>,
    action: Action<S, T>,
}

impl<S, T> WrappedTerms<S, T> {
    pub fn new(term: BoxedTerm<S>, action: Action<S, T>) -> Self {
        Self { term, action }
    }
}

impl<S: ParseInput, T> Rule<S, T> for WrappedTerms<S, T> {
    fn parse(&self, state: &mut ParseState<'_, S>) -> Option<T> {
        let mut frame = FrameGuard::push(state);
        if !self.term.parse(&mut frame, Control::Unbound) {
            return None;
        }
        (self.action)(&mut frame)
    }
}

impl<S, T> fmt::Debug for WrappedTerms<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WrappedTerms")
    }
}

/// Pops the rule's frame on every exit path, unwinding included.
struct FrameGuard<'a, 'c, S> {
    state: &'a mut ParseState<'c, S>,
}

impl<'a, 'c, S: ParseInput> FrameGuard<'a, 'c, S> {
    fn push(state: &'a mut ParseState<'c, S>) -> Self {
        state.scope_mut().push_frame();
        Self { state }
    }
}

impl<'c, S> Deref for FrameGuard<'_, 'c, S> {
    type Target = ParseState<'c, S>;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl<S> DerefMut for FrameGuard<'_, '_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl<S> Drop for FrameGuard<'_, '_, S> {
    fn drop(&mut self) {
        self.state.scope_mut().pop_frame();
    }
}

/// An atom bound to a rule, possibly later than its first reference.
pub struct NamedRule<S, T> {
    atom: Atom<T>,
    rule: OnceLock<Box<dyn Rule<S, T>>>,
}

impl<S, T> NamedRule<S, T> {
    pub(crate) fn unbound(atom: Atom<T>) -> Self {
        Self {
            atom,
            rule: OnceLock::new(),
        }
    }

    pub fn atom(&self) -> Atom<T> {
        self.atom
    }

    pub fn is_bound(&self) -> bool {
        self.rule.get().is_some()
    }

    /// # Panics
    ///
    /// Panics when the rule was never bound. Grammars check this when they
    /// are built, so it only happens with hand-driven dictionaries.
    pub fn rule(&self) -> &dyn Rule<S, T> {
        match self.rule.get() {
            Some(rule) => rule.as_ref(),
            None => panic!("Unbound rule {}", self.atom),
        }
    }

    /// # Panics
    ///
    /// Panics when the rule is already bound.
    pub(crate) fn bind(&self, rule: Box<dyn Rule<S, T>>) {
        if self.rule.set(rule).is_err() {
            panic!("Trying to override rule: {}", self.atom);
        }
    }
}

impl<S, T> fmt::Debug for NamedRule<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedRule")
            .field("atom", &self.atom)
            .field("bound", &self.is_bound())
            .finish()
    }
}
