//! Grammar assembly: atoms bound to rules, with forward references

use crate::atom::{Atom, AtomId};
use crate::control::Control;
use crate::error::{GrammarError, GrammarResult};
use crate::rule::{NamedRule, Rule, WrappedTerms};
use crate::state::{ParseInput, ParseState};
use crate::term::{BoxedTerm, Term};
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Type-erased view of a [`NamedRule`] so rules of every value type can
/// share one table.
trait ErasedEntry: Send + Sync {
    fn is_bound(&self) -> bool;
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<S, T> ErasedEntry for NamedRule<S, T>
where
    S: 'static,
    T: 'static,
{
    fn is_bound(&self) -> bool {
        NamedRule::is_bound(self)
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Rules of a grammar over input `S`, keyed by atom in registration order.
pub struct Dictionary<S> {
    terms: IndexMap<AtomId, Arc<dyn ErasedEntry>>,
    _input: PhantomData<fn(S)>,
}

impl<S: ParseInput + 'static> Dictionary<S> {
    pub fn new() -> Self {
        Self {
            terms: IndexMap::new(),
            _input: PhantomData,
        }
    }

    fn entry<T>(&mut self, atom: Atom<T>) -> Arc<NamedRule<S, T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        let erased = Arc::clone(self.terms.entry(atom.id()).or_insert_with(|| {
            let fresh: Arc<dyn ErasedEntry> = Arc::new(NamedRule::<S, T>::unbound(atom));
            fresh
        }));
        match erased.into_any().downcast::<NamedRule<S, T>>() {
            Ok(rule) => rule,
            Err(_) => panic!("Atom {atom} is already registered with another value type"),
        }
    }

    /// Bind `atom` to any rule.
    ///
    /// # Panics
    ///
    /// Panics when `atom` is already bound.
    pub fn put_rule<T, R>(&mut self, atom: Atom<T>, rule: R) -> Arc<NamedRule<S, T>>
    where
        T: Clone + Send + Sync + 'static,
        R: Rule<S, T> + 'static,
    {
        let entry = self.entry(atom);
        entry.bind(Box::new(rule));
        entry
    }

    /// Bind `atom` to `term` followed by `action`, run in a fresh frame.
    pub fn put<T, F>(&mut self, atom: Atom<T>, term: BoxedTerm<S>, action: F) -> Arc<NamedRule<S, T>>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&mut ParseState<'_, S>) -> Option<T> + Send + Sync + 'static,
    {
        self.put_rule(atom, WrappedTerms::new(term, Box::new(action)))
    }

    /// Like [`put`](Self::put) for actions that cannot fail.
    pub fn put_simple<T, F>(&mut self, atom: Atom<T>, term: BoxedTerm<S>, action: F) -> Arc<NamedRule<S, T>>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&mut ParseState<'_, S>) -> T + Send + Sync + 'static,
    {
        self.put(atom, term, move |state| Some(action(state)))
    }

    /// The shared rule for `atom`, bound or not.
    pub fn forward<T>(&mut self, atom: Atom<T>) -> Arc<NamedRule<S, T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.entry(atom)
    }

    /// The rule for an atom that must already be registered.
    pub fn get<T>(&self, atom: Atom<T>) -> GrammarResult<Arc<NamedRule<S, T>>>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.terms
            .get(&atom.id())
            .and_then(|entry| Arc::clone(entry).into_any().downcast::<NamedRule<S, T>>().ok())
            .ok_or_else(|| GrammarError::NoSuchRule(atom.name().to_string()))
    }

    /// A term that applies the rule for `atom` and binds its value to `atom`.
    pub fn named<T>(&mut self, atom: Atom<T>) -> BoxedTerm<S>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.named_with_alias(atom, atom)
    }

    /// A term that applies the rule for `atom` and binds its value to
    /// `alias`. Caching is still keyed by `atom`.
    pub fn named_with_alias<T>(&mut self, atom: Atom<T>, alias: Atom<T>) -> BoxedTerm<S>
    where
        T: Clone + Send + Sync + 'static,
    {
        Box::new(Reference {
            rule: self.entry(atom),
            store: alias,
        })
    }

    pub fn check_all_bound(&self) -> GrammarResult<()> {
        let unbound: Vec<String> = self
            .terms
            .iter()
            .filter(|(_, entry)| !entry.is_bound())
            .map(|(atom, _)| atom.name().to_string())
            .collect();
        if unbound.is_empty() {
            Ok(())
        } else {
            Err(GrammarError::UnboundNames(unbound))
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<S: ParseInput + 'static> Default for Dictionary<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for Dictionary<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dictionary")
            .field("rules", &self.terms.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Applies a named rule through the cache and stores the result.
struct Reference<S, T> {
    rule: Arc<NamedRule<S, T>>,
    store: Atom<T>,
}

impl<S, T> Term<S> for Reference<S, T>
where
    S: ParseInput,
    T: Clone + Send + Sync + 'static,
{
    fn parse(&self, state: &mut ParseState<'_, S>, _control: Control) -> bool {
        match state.parse(&self.rule) {
            Some(value) => {
                state.scope_mut().put(self.store, value);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::StringReader;
    use crate::rule::SimpleRule;

    #[test]
    fn test_unbound_names_in_registration_order() {
        let mut dictionary = Dictionary::<StringReader>::new();
        let first: Atom<i32> = Atom::new("first");
        let bound: Atom<i32> = Atom::new("bound");
        let second: Atom<i32> = Atom::new("second");
        let _ = dictionary.forward(first);
        let _ = dictionary.put_rule(bound, SimpleRule(|_: &mut ParseState<'_, StringReader>| Some(1)));
        let _ = dictionary.named(second);

        assert_eq!(
            dictionary.check_all_bound().map_err(|e| e.to_string()),
            Err("Unbound names: first, second".to_string())
        );
    }

    #[test]
    fn test_forward_is_shared() {
        let mut dictionary = Dictionary::<StringReader>::new();
        let atom: Atom<i32> = Atom::new("value");
        let forward = dictionary.forward(atom);
        assert!(!forward.is_bound());
        let bound = dictionary.put_rule(atom, SimpleRule(|_: &mut ParseState<'_, StringReader>| Some(1)));
        assert!(Arc::ptr_eq(&forward, &bound));
        assert!(forward.is_bound());
        assert!(dictionary.check_all_bound().is_ok());
    }

    #[test]
    fn test_get_unknown() {
        let dictionary = Dictionary::<StringReader>::new();
        let atom: Atom<i32> = Atom::new("ghost");
        assert!(matches!(dictionary.get(atom), Err(GrammarError::NoSuchRule(_))));
    }

    #[test]
    #[should_panic(expected = "Trying to override rule: twice")]
    fn test_double_binding_panics() {
        let mut dictionary = Dictionary::<StringReader>::new();
        let atom: Atom<i32> = Atom::new("twice");
        let _ = dictionary.put_rule(atom, SimpleRule(|_: &mut ParseState<'_, StringReader>| Some(1)));
        let _ = dictionary.put_rule(atom, SimpleRule(|_: &mut ParseState<'_, StringReader>| Some(2)));
    }
}
