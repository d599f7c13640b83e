//! The tag tree produced by the SNBT parser
//!
//! Besides the NBT types this includes two virtual ones: [`Tag::Boolean`],
//! which is a byte on the wire, and [`Tag::Operation`], an operation call
//! such as `bool(1)` that has not been run yet.

use crate::error::{SnbtError, SnbtResult};
use compact_str::CompactString;
use indexmap::IndexMap;
use std::fmt;

/// NBT type ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TagType {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagType {
    pub const fn id(self) -> u8 {
        self as u8
    }

    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            TagType::Byte
                | TagType::Short
                | TagType::Int
                | TagType::Long
                | TagType::Float
                | TagType::Double
        )
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TagType::End => "end",
            TagType::Byte => "byte",
            TagType::Short => "short",
            TagType::Int => "int",
            TagType::Long => "long",
            TagType::Float => "float",
            TagType::Double => "double",
            TagType::ByteArray => "byte[]",
            TagType::String => "string",
            TagType::List => "list",
            TagType::Compound => "compound",
            TagType::IntArray => "int[]",
            TagType::LongArray => "long[]",
        };
        f.write_str(name)
    }
}

/// A node of the tag tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(ListTag),
    Compound(CompoundTag),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    /// Stored as a byte
    Boolean(bool),
    /// An operation call kept for later resolution
    Operation(OperationTag),
}

impl Tag {
    /// The NBT type of this tag. Booleans are bytes; operations have no
    /// type until resolved and report [`TagType::End`].
    pub const fn tag_type(&self) -> TagType {
        match self {
            Tag::End | Tag::Operation(_) => TagType::End,
            Tag::Byte(_) | Tag::Boolean(_) => TagType::Byte,
            Tag::Short(_) => TagType::Short,
            Tag::Int(_) => TagType::Int,
            Tag::Long(_) => TagType::Long,
            Tag::Float(_) => TagType::Float,
            Tag::Double(_) => TagType::Double,
            Tag::ByteArray(_) => TagType::ByteArray,
            Tag::String(_) => TagType::String,
            Tag::List(_) => TagType::List,
            Tag::Compound(_) => TagType::Compound,
            Tag::IntArray(_) => TagType::IntArray,
            Tag::LongArray(_) => TagType::LongArray,
        }
    }

    pub const fn is_operation(&self) -> bool {
        matches!(self, Tag::Operation(_))
    }

    /// Numeric value of a number tag. Booleans are not numbers here.
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            Tag::Byte(value) => Some(f64::from(value)),
            Tag::Short(value) => Some(f64::from(value)),
            Tag::Int(value) => Some(f64::from(value)),
            Tag::Long(value) => Some(value as f64),
            Tag::Float(value) => Some(f64::from(value)),
            Tag::Double(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(value) => Some(value),
            _ => None,
        }
    }

    pub const fn as_compound(&self) -> Option<&CompoundTag> {
        match self {
            Tag::Compound(compound) => Some(compound),
            _ => None,
        }
    }

    pub const fn as_list(&self) -> Option<&ListTag> {
        match self {
            Tag::List(list) => Some(list),
            _ => None,
        }
    }
}

impl From<bool> for Tag {
    fn from(value: bool) -> Self {
        Tag::Boolean(value)
    }
}

impl From<i8> for Tag {
    fn from(value: i8) -> Self {
        Tag::Byte(value)
    }
}

impl From<i16> for Tag {
    fn from(value: i16) -> Self {
        Tag::Short(value)
    }
}

impl From<i32> for Tag {
    fn from(value: i32) -> Self {
        Tag::Int(value)
    }
}

impl From<i64> for Tag {
    fn from(value: i64) -> Self {
        Tag::Long(value)
    }
}

impl From<f32> for Tag {
    fn from(value: f32) -> Self {
        Tag::Float(value)
    }
}

impl From<f64> for Tag {
    fn from(value: f64) -> Self {
        Tag::Double(value)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Tag::String(value.to_string())
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Tag::String(value)
    }
}

impl From<ListTag> for Tag {
    fn from(value: ListTag) -> Self {
        Tag::List(value)
    }
}

impl From<CompoundTag> for Tag {
    fn from(value: CompoundTag) -> Self {
        Tag::Compound(value)
    }
}

/// A list whose elements all share one type.
///
/// The type comes from the first element that is not an unresolved
/// operation; operations are let through and checked once resolved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListTag {
    element_type: Option<TagType>,
    elements: Vec<Tag>,
}

impl ListTag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<Tag>) -> SnbtResult<Self> {
        let mut list = Self {
            element_type: None,
            elements: Vec::with_capacity(elements.len()),
        };
        for element in elements {
            list.push(element)?;
        }
        Ok(list)
    }

    pub fn push(&mut self, tag: Tag) -> SnbtResult<()> {
        if !tag.is_operation() {
            let actual = tag.tag_type();
            match self.element_type {
                None => self.element_type = Some(actual),
                Some(expected) if expected != actual => {
                    return Err(SnbtError::MixedList { expected, actual });
                }
                Some(_) => {}
            }
        }
        self.elements.push(tag);
        Ok(())
    }

    /// Element type, [`TagType::End`] while no typed element is present
    pub fn element_type(&self) -> TagType {
        self.element_type.unwrap_or(TagType::End)
    }

    pub fn elements(&self) -> &[Tag] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Tag> {
        self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl<'a> IntoIterator for &'a ListTag {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Named tags. Insertion order is kept in memory, but output is always
/// sorted by key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundTag {
    entries: IndexMap<CompactString, Tag>,
}

impl CompoundTag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, returning the value it replaces.
    pub fn insert(&mut self, key: impl Into<CompactString>, tag: impl Into<Tag>) -> Option<Tag> {
        self.entries.insert(key.into(), tag.into())
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> indexmap::map::Iter<'_, CompactString, Tag> {
        self.entries.iter()
    }

    /// Entries ordered by key, the order they are written in
    pub fn sorted_entries(&self) -> Vec<(&str, &Tag)> {
        let mut entries: Vec<(&str, &Tag)> = self
            .entries
            .iter()
            .map(|(key, tag)| (key.as_str(), tag))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl<K: Into<CompactString>> FromIterator<(K, Tag)> for CompoundTag {
    fn from_iter<I: IntoIterator<Item = (K, Tag)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(key, tag)| (key.into(), tag)).collect(),
        }
    }
}

/// An operation call such as `bool(1b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationTag {
    pub name: CompactString,
    pub arguments: Vec<Tag>,
}

impl OperationTag {
    pub fn new(name: impl Into<CompactString>, arguments: Vec<Tag>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_infers_type_from_first_element() {
        let list = ListTag::from_elements(vec![Tag::Int(1), Tag::Int(2)]).unwrap();
        assert_eq!(list.element_type(), TagType::Int);
        assert_eq!(ListTag::new().element_type(), TagType::End);
    }

    #[test]
    fn test_list_rejects_mixed_types() {
        let error = ListTag::from_elements(vec![Tag::Int(1), Tag::from("a")]).unwrap_err();
        assert_eq!(error.to_string(), "Mixed list: expected int, got string");
    }

    #[test]
    fn test_booleans_are_bytes() {
        let list = ListTag::from_elements(vec![Tag::Boolean(true), Tag::Byte(3)]).unwrap();
        assert_eq!(list.element_type(), TagType::Byte);
    }

    #[test]
    fn test_operations_skip_type_check() {
        let operation = Tag::Operation(OperationTag::new("bool", vec![Tag::Int(1)]));
        let list = ListTag::from_elements(vec![operation.clone(), Tag::from("a"), operation]).unwrap();
        assert_eq!(list.element_type(), TagType::String);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_compound_sorted_entries_and_replacement() {
        let mut compound = CompoundTag::new();
        let _ = compound.insert("b", 1i32);
        let _ = compound.insert("a", 2i32);
        assert_eq!(compound.insert("b", 3i32), Some(Tag::Int(1)));
        let keys: Vec<&str> = compound.sorted_entries().iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, ["a", "b"]);
        let insertion: Vec<&str> = compound.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(insertion, ["b", "a"]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(Tag::Long(-3).as_number(), Some(-3.0));
        assert_eq!(Tag::Boolean(true).as_number(), None);
        assert_eq!(Tag::from("x").as_number(), None);
    }
}
