//! Frame-structured variable bindings shared by the terms of a rule
//!
//! The scope is one flat stack of slots. A frame starts at a marker slot
//! that links back to the previous frame's marker; the entries above it are
//! that frame's bindings. Lookups never look below the current marker, so
//! a rule body only sees what its own terms bound.
//!
//! ```text
//! | root ... | marker(prev=0) a b | marker(prev=3) a b c
//!                                   ^ top_marker
//! ```

use crate::atom::{Atom, AtomId};
use crate::error::{GrammarError, GrammarResult};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A bound value. Values are shared so frames and cache entries can be
/// copied without cloning payloads.
pub type Value = Arc<dyn Any + Send + Sync>;

#[derive(Clone)]
enum Slot {
    Marker { previous: usize },
    Entry { atom: AtomId, value: Option<Value> },
}

/// Stack of binding frames.
pub struct Scope {
    slots: Vec<Slot>,
    top_marker: usize,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            slots: vec![Slot::Marker { previous: 0 }],
            top_marker: 0,
        }
    }

    fn value_index(&self, atom: AtomId) -> Option<usize> {
        (self.top_marker + 1..self.slots.len())
            .rev()
            .find(|&i| matches!(&self.slots[i], Slot::Entry { atom: name, .. } if *name == atom))
    }

    fn value_index_for_any(&self, atoms: &[AtomId]) -> Option<usize> {
        (self.top_marker + 1..self.slots.len()).rev().find(|&i| {
            matches!(&self.slots[i], Slot::Entry { atom, .. } if atoms.contains(atom))
        })
    }

    fn value_at<T: Clone + 'static>(&self, index: usize) -> Option<T> {
        match &self.slots[index] {
            Slot::Entry {
                value: Some(value), ..
            } => value.downcast_ref::<T>().cloned(),
            _ => None,
        }
    }

    fn previous_marker(&self, marker: usize) -> usize {
        match self.slots[marker] {
            Slot::Marker { previous } => previous,
            Slot::Entry { .. } => {
                debug_assert!(false, "slot {marker} is not a frame marker");
                0
            }
        }
    }

    /// Bind `value` in the current frame, replacing an existing binding.
    pub fn put<T: Send + Sync + 'static>(&mut self, atom: Atom<T>, value: T) {
        self.put_value(atom.id(), Some(Arc::new(value)));
    }

    pub(crate) fn put_value(&mut self, atom: AtomId, value: Option<Value>) {
        match self.value_index(atom) {
            Some(index) => self.slots[index] = Slot::Entry { atom, value },
            None => self.slots.push(Slot::Entry { atom, value }),
        }
        debug_assert!(self.validate_structure());
    }

    pub fn get<T: Clone + 'static>(&self, atom: Atom<T>) -> Option<T> {
        self.value_index(atom.id())
            .and_then(|index| self.value_at(index))
    }

    pub fn get_or_throw<T: Clone + 'static>(&self, atom: Atom<T>) -> GrammarResult<T> {
        self.get(atom)
            .ok_or_else(|| GrammarError::MissingValue(format!("atom {atom}")))
    }

    pub fn get_or_default<T: Clone + 'static>(&self, atom: Atom<T>, default: T) -> T {
        self.get(atom).unwrap_or(default)
    }

    /// The most recently bound value among `atoms`.
    pub fn get_any<T: Clone + 'static>(&self, atoms: &[Atom<T>]) -> Option<T> {
        let ids: Vec<AtomId> = atoms.iter().map(|atom| atom.id()).collect();
        self.value_index_for_any(&ids)
            .and_then(|index| self.value_at(index))
    }

    pub fn get_any_or_throw<T: Clone + 'static>(&self, atoms: &[Atom<T>]) -> GrammarResult<T> {
        self.get_any(atoms).ok_or_else(|| {
            let names: Vec<&str> = atoms.iter().map(|atom| atom.name()).collect();
            GrammarError::MissingValue(format!("atoms {}", names.join(",")))
        })
    }

    pub fn push_frame(&mut self) {
        self.slots.push(Slot::Marker {
            previous: self.top_marker,
        });
        self.top_marker = self.slots.len() - 1;
        debug_assert!(self.validate_structure());
    }

    /// Drop the current frame and its bindings.
    ///
    /// # Panics
    ///
    /// Panics when only the root frame is left.
    pub fn pop_frame(&mut self) {
        assert!(self.top_marker != 0, "cannot pop the root scope frame");
        let previous = self.previous_marker(self.top_marker);
        self.slots.truncate(self.top_marker);
        self.top_marker = previous;
        debug_assert!(self.validate_structure());
    }

    /// Open a child frame that starts with a copy of the current bindings.
    pub fn split_frame(&mut self) {
        let inherited: Vec<Slot> = self.slots[self.top_marker + 1..].to_vec();
        self.push_frame();
        self.slots.extend(inherited);
        debug_assert!(self.validate_structure());
    }

    /// Forget every value in the current frame, keeping its keys.
    pub fn clear_frame(&mut self) {
        for slot in &mut self.slots[self.top_marker + 1..] {
            if let Slot::Entry { value, .. } = slot {
                *value = None;
            }
        }
        debug_assert!(self.validate_structure());
    }

    /// Close the current frame, writing its bindings into the parent.
    ///
    /// Parent bindings are only overwritten by values the child actually
    /// holds; keys new to the parent are appended.
    pub fn merge_frame(&mut self) {
        assert!(self.top_marker != 0, "cannot merge the root scope frame");
        let previous = self.previous_marker(self.top_marker);
        let child = self.slots.split_off(self.top_marker);
        self.top_marker = previous;

        for slot in child.into_iter().skip(1) {
            if let Slot::Entry { atom, value } = slot {
                match self.value_index(atom) {
                    Some(index) => {
                        if value.is_some() {
                            self.slots[index] = Slot::Entry { atom, value };
                        }
                    }
                    None => self.slots.push(Slot::Entry { atom, value }),
                }
            }
        }
        debug_assert!(self.validate_structure());
    }

    pub fn has_only_single_frame(&self) -> bool {
        self.frame_count() == 1
    }

    pub fn frame_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Marker { .. }))
            .count()
    }

    fn validate_structure(&self) -> bool {
        if !matches!(self.slots.first(), Some(Slot::Marker { .. })) {
            return false;
        }
        if self.top_marker >= self.slots.len() {
            return false;
        }
        if self.slots[self.top_marker + 1..]
            .iter()
            .any(|slot| matches!(slot, Slot::Marker { .. }))
        {
            return false;
        }

        let mut marker = self.top_marker;
        while marker != 0 {
            match self.slots[marker] {
                Slot::Marker { previous } if previous < marker => marker = previous,
                _ => return false,
            }
        }
        true
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first_entry = true;
        for slot in &self.slots {
            match slot {
                Slot::Marker { .. } => {
                    f.write_str("|")?;
                    first_entry = true;
                }
                Slot::Entry { atom, .. } => {
                    if !first_entry {
                        f.write_str(",")?;
                    }
                    first_entry = false;
                    write!(f, "{atom}")?;
                }
            }
        }
        f.write_str("|")
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("frames", &self.frame_count())
            .field("layout", &self.to_string())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_current_frame_only() {
        let a: Atom<i32> = Atom::new("a");
        let mut scope = Scope::new();
        scope.put(a, 1);
        assert_eq!(scope.get(a), Some(1));

        scope.push_frame();
        assert_eq!(scope.get(a), None);
        scope.put(a, 2);
        assert_eq!(scope.get(a), Some(2));

        scope.pop_frame();
        assert_eq!(scope.get(a), Some(1));
        assert!(scope.has_only_single_frame());
    }

    #[test]
    fn test_put_overwrites_in_place() {
        let a: Atom<&str> = Atom::new("a");
        let b: Atom<&str> = Atom::new("b");
        let mut scope = Scope::new();
        scope.put(a, "x");
        scope.put(b, "y");
        scope.put(a, "z");
        assert_eq!(scope.to_string(), "|a,b|");
        assert_eq!(scope.get(a), Some("z"));
    }

    #[test]
    fn test_split_clear_merge() {
        let a: Atom<i32> = Atom::new("a");
        let b: Atom<i32> = Atom::new("b");
        let mut scope = Scope::new();
        scope.push_frame();
        scope.put(a, 1);

        scope.split_frame();
        assert_eq!(scope.get(a), Some(1));
        scope.put(b, 2);
        scope.clear_frame();
        assert_eq!(scope.get(a), None);
        assert_eq!(scope.get(b), None);

        // A cleared key must not wipe the parent's value on merge
        scope.merge_frame();
        assert_eq!(scope.get(a), Some(1));
        assert_eq!(scope.get(b), None);
        assert_eq!(scope.frame_count(), 2);

        scope.split_frame();
        scope.put(a, 3);
        scope.merge_frame();
        assert_eq!(scope.get(a), Some(3));
        scope.pop_frame();
        assert!(scope.has_only_single_frame());
    }

    #[test]
    fn test_get_any_prefers_latest_binding() {
        let a: Atom<i32> = Atom::new("a");
        let b: Atom<i32> = Atom::new("b");
        let mut scope = Scope::new();
        scope.put(a, 1);
        scope.put(b, 2);
        assert_eq!(scope.get_any(&[a, b]), Some(2));
        assert!(scope.get_any_or_throw(&[Atom::<i32>::new("c")]).is_err());
    }

    #[test]
    fn test_get_or_throw_and_default() {
        let a: Atom<i32> = Atom::new("missing");
        let scope = Scope::new();
        assert_eq!(scope.get_or_default(a, 7), 7);
        assert_eq!(
            scope.get_or_throw(a).map_err(|e| e.to_string()),
            Err("No value for atom missing".to_string())
        );
    }

    #[test]
    #[should_panic(expected = "cannot pop the root scope frame")]
    fn test_pop_root_panics() {
        Scope::new().pop_frame();
    }
}
