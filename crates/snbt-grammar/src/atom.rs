//! Typed identity tokens used as scope and cache keys

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_ATOM: AtomicU32 = AtomicU32::new(0);

/// Untyped atom identity.
///
/// Two ids are equal only when they were minted by the same
/// [`Atom::new`] call; the display name takes no part in comparisons.
#[derive(Clone, Copy)]
pub struct AtomId {
    index: u32,
    name: &'static str,
}

impl AtomId {
    pub const fn index(self) -> u32 {
        self.index
    }

    pub const fn name(self) -> &'static str {
        self.name
    }
}

impl PartialEq for AtomId {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for AtomId {}

impl Hash for AtomId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl fmt::Debug for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.index)
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A name for values of type `T` in a grammar.
pub struct Atom<T> {
    id: AtomId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Atom<T> {
    pub fn new(name: &'static str) -> Self {
        let index = NEXT_ATOM.fetch_add(1, Ordering::Relaxed);
        Self {
            id: AtomId { index, name },
            _marker: PhantomData,
        }
    }

    pub const fn id(self) -> AtomId {
        self.id
    }

    pub const fn name(self) -> &'static str {
        self.id.name
    }
}

impl<T> Clone for Atom<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Atom<T> {}

impl<T> PartialEq for Atom<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Atom<T> {}

impl<T> Hash for Atom<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Atom<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom({:?})", self.id)
    }
}

impl<T> fmt::Display for Atom<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_not_name() {
        let first: Atom<i32> = Atom::new("value");
        let second: Atom<i32> = Atom::new("value");
        let copy = first;
        assert_ne!(first, second);
        assert_eq!(first, copy);
        assert_eq!(first.to_string(), "value");
    }
}
