//! Terms: the composable matching units inside a rule body
//!
//! A term returns whether it matched. It may move the cursor, bind values in
//! the current scope frame and report errors; a term that fails leaves the
//! cursor where it found it unless documented otherwise.

use crate::atom::Atom;
use crate::control::Control;
use crate::error::{reason, Reason};
use crate::rule::NamedRule;
use crate::state::{ParseInput, ParseState};
use std::error::Error as StdError;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// A matching unit. Terms hold no per-parse state and are shared between
/// threads.
pub trait Term<S>: Send + Sync {
    fn parse(&self, state: &mut ParseState<'_, S>, control: Control) -> bool;
}

pub type BoxedTerm<S> = Box<dyn Term<S>>;

/// Match every element in order, or nothing.
pub struct Sequence<S> {
    elements: Vec<BoxedTerm<S>>,
}

impl<S: ParseInput> Term<S> for Sequence<S> {
    fn parse(&self, state: &mut ParseState<'_, S>, control: Control) -> bool {
        let mark = state.mark();
        for element in &self.elements {
            if !element.parse(state, control) {
                state.restore(mark);
                return false;
            }
        }
        true
    }
}

/// Ordered choice. Each branch runs in a split of the current frame; the
/// winner is merged back. A cut in a branch stops later branches from
/// being tried once that branch fails.
pub struct Alternative<S> {
    elements: Vec<BoxedTerm<S>>,
}

impl<S: ParseInput> Term<S> for Alternative<S> {
    fn parse(&self, state: &mut ParseState<'_, S>, _control: Control) -> bool {
        let mut branch = BranchGuard::enter(state);
        let control = branch.control;
        let mark = branch.mark();
        for element in &self.elements {
            if element.parse(&mut branch, control) {
                branch.merge();
                return true;
            }
            branch.scope_mut().clear_frame();
            branch.restore(mark);
            if branch.has_cut(control) {
                break;
            }
        }
        false
    }
}

/// Owns an alternative's control and split frame; both are given back
/// even if a branch panics.
struct BranchGuard<'a, 'c, S> {
    state: &'a mut ParseState<'c, S>,
    control: Control,
    frame_open: bool,
}

impl<'a, 'c, S> BranchGuard<'a, 'c, S> {
    fn enter(state: &'a mut ParseState<'c, S>) -> Self {
        let control = state.acquire_control();
        state.scope_mut().split_frame();
        Self {
            state,
            control,
            frame_open: true,
        }
    }

    fn merge(&mut self) {
        self.state.scope_mut().merge_frame();
        self.frame_open = false;
    }
}

impl<'c, S> Deref for BranchGuard<'_, 'c, S> {
    type Target = ParseState<'c, S>;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl<S> DerefMut for BranchGuard<'_, '_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl<S> Drop for BranchGuard<'_, '_, S> {
    fn drop(&mut self) {
        if self.frame_open {
            self.state.scope_mut().pop_frame();
        }
        self.state.release_control();
    }
}

/// Try the element; match regardless.
pub struct Optional<S> {
    term: BoxedTerm<S>,
}

impl<S: ParseInput> Term<S> for Optional<S> {
    fn parse(&self, state: &mut ParseState<'_, S>, control: Control) -> bool {
        let mark = state.mark();
        if !self.term.parse(state, control) {
            state.restore(mark);
        }
        true
    }
}

/// Check whether the element would match without consuming input or
/// reporting errors.
pub struct LookAhead<S> {
    term: BoxedTerm<S>,
    positive: bool,
}

impl<S: ParseInput> Term<S> for LookAhead<S> {
    fn parse(&self, state: &mut ParseState<'_, S>, control: Control) -> bool {
        let mark = state.mark();
        let matched = state.silent(|state| self.term.parse(state, control));
        state.restore(mark);
        self.positive == matched
    }
}

/// Bind a fixed value.
pub struct Marker<T> {
    atom: Atom<T>,
    value: T,
}

impl<S, T> Term<S> for Marker<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn parse(&self, state: &mut ParseState<'_, S>, _control: Control) -> bool {
        state.scope_mut().put(self.atom, self.value.clone());
        true
    }
}

/// Commit to the current branch of the enclosing alternative.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cut;

impl<S: ParseInput> Term<S> for Cut {
    fn parse(&self, state: &mut ParseState<'_, S>, control: Control) -> bool {
        state.cut(control);
        true
    }
}

/// Report a fixed reason and fail.
pub struct Fail {
    reason: Reason,
}

impl<S: ParseInput> Term<S> for Fail {
    fn parse(&self, state: &mut ParseState<'_, S>, _control: Control) -> bool {
        let cursor = state.mark();
        state.store_reason(cursor, &self.reason);
        false
    }
}

/// Apply a rule as many times as it matches and bind the values as a list.
pub struct Repeated<S, T> {
    element: Arc<NamedRule<S, T>>,
    list_name: Atom<Vec<T>>,
    min_repetitions: usize,
}

impl<S, T> Term<S> for Repeated<S, T>
where
    S: ParseInput,
    T: Clone + Send + Sync + 'static,
{
    fn parse(&self, state: &mut ParseState<'_, S>, _control: Control) -> bool {
        let mark = state.mark();
        let mut values = Vec::with_capacity(self.min_repetitions);
        loop {
            let entry_mark = state.mark();
            match state.parse(&self.element) {
                Some(value) => values.push(value),
                None => {
                    state.restore(entry_mark);
                    break;
                }
            }
        }

        if values.len() < self.min_repetitions {
            state.restore(mark);
            return false;
        }
        state.scope_mut().put(self.list_name, values);
        true
    }
}

/// Like [`Repeated`], with a separator term between elements.
pub struct RepeatedWithSeparator<S, T> {
    element: Arc<NamedRule<S, T>>,
    list_name: Atom<Vec<T>>,
    separator: BoxedTerm<S>,
    min_repetitions: usize,
    allow_trailing_separator: bool,
}

impl<S, T> Term<S> for RepeatedWithSeparator<S, T>
where
    S: ParseInput,
    T: Clone + Send + Sync + 'static,
{
    fn parse(&self, state: &mut ParseState<'_, S>, control: Control) -> bool {
        let mark = state.mark();
        let mut values = Vec::with_capacity(self.min_repetitions);
        let mut first = true;
        loop {
            let before_separator = state.mark();
            if !first && !self.separator.parse(state, control) {
                state.restore(before_separator);
                break;
            }

            let after_separator = state.mark();
            let Some(value) = state.parse(&self.element) else {
                if !first && !self.allow_trailing_separator {
                    // A separator with nothing after it
                    state.restore(mark);
                    return false;
                }
                state.restore(after_separator);
                break;
            };
            values.push(value);
            first = false;
        }

        if values.len() < self.min_repetitions {
            state.restore(mark);
            return false;
        }
        state.scope_mut().put(self.list_name, values);
        true
    }
}

pub fn sequence<S: ParseInput + 'static>(elements: Vec<BoxedTerm<S>>) -> BoxedTerm<S> {
    Box::new(Sequence { elements })
}

pub fn alternative<S: ParseInput + 'static>(elements: Vec<BoxedTerm<S>>) -> BoxedTerm<S> {
    Box::new(Alternative { elements })
}

pub fn optional<S: ParseInput + 'static>(term: BoxedTerm<S>) -> BoxedTerm<S> {
    Box::new(Optional { term })
}

pub fn positive_look_ahead<S: ParseInput + 'static>(term: BoxedTerm<S>) -> BoxedTerm<S> {
    Box::new(LookAhead {
        term,
        positive: true,
    })
}

pub fn negative_look_ahead<S: ParseInput + 'static>(term: BoxedTerm<S>) -> BoxedTerm<S> {
    Box::new(LookAhead {
        term,
        positive: false,
    })
}

pub fn marker<S, T>(atom: Atom<T>, value: T) -> BoxedTerm<S>
where
    S: 'static,
    T: Clone + Send + Sync + 'static,
{
    Box::new(Marker { atom, value })
}

pub fn cut<S: ParseInput + 'static>() -> BoxedTerm<S> {
    Box::new(Cut)
}

pub fn fail<S, E>(error: E) -> BoxedTerm<S>
where
    S: ParseInput + 'static,
    E: StdError + Send + Sync + 'static,
{
    Box::new(Fail {
        reason: reason(error),
    })
}

pub fn repeated<S, T>(element: Arc<NamedRule<S, T>>, list_name: Atom<Vec<T>>) -> BoxedTerm<S>
where
    S: ParseInput + 'static,
    T: Clone + Send + Sync + 'static,
{
    repeated_at_least(element, list_name, 0)
}

pub fn repeated_at_least<S, T>(
    element: Arc<NamedRule<S, T>>,
    list_name: Atom<Vec<T>>,
    min_repetitions: usize,
) -> BoxedTerm<S>
where
    S: ParseInput + 'static,
    T: Clone + Send + Sync + 'static,
{
    Box::new(Repeated {
        element,
        list_name,
        min_repetitions,
    })
}

/// Separated list with no dangling separator allowed
pub fn repeated_with_separator<S, T>(
    element: Arc<NamedRule<S, T>>,
    list_name: Atom<Vec<T>>,
    separator: BoxedTerm<S>,
) -> BoxedTerm<S>
where
    S: ParseInput + 'static,
    T: Clone + Send + Sync + 'static,
{
    Box::new(RepeatedWithSeparator {
        element,
        list_name,
        separator,
        min_repetitions: 0,
        allow_trailing_separator: false,
    })
}

/// Separated list that may end with a separator
pub fn repeated_with_trailing_separator<S, T>(
    element: Arc<NamedRule<S, T>>,
    list_name: Atom<Vec<T>>,
    separator: BoxedTerm<S>,
    min_repetitions: usize,
) -> BoxedTerm<S>
where
    S: ParseInput + 'static,
    T: Clone + Send + Sync + 'static,
{
    Box::new(RepeatedWithSeparator {
        element,
        list_name,
        separator,
        min_repetitions,
        allow_trailing_separator: true,
    })
}

/// `seq![a, b, c]` builds a [`Sequence`] term.
#[macro_export]
macro_rules! seq {
    ($($term:expr),+ $(,)?) => {
        $crate::term::sequence(vec![$($term),+])
    };
}

/// `alt![a, b, c]` builds an [`Alternative`] term.
#[macro_export]
macro_rules! alt {
    ($($term:expr),+ $(,)?) => {
        $crate::term::alternative(vec![$($term),+])
    };
}

macro_rules! opaque_debug {
    ($($name:ident<$($param:ident),+>),+ $(,)?) => {
        $(
            impl<$($param),+> fmt::Debug for $name<$($param),+> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(stringify!($name))
                }
            }
        )+
    };
}

opaque_debug!(
    Sequence<S>,
    Alternative<S>,
    Optional<S>,
    LookAhead<S>,
    Marker<T>,
    Repeated<S, T>,
    RepeatedWithSeparator<S, T>,
);

impl fmt::Debug for Fail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fail({})", self.reason)
    }
}
