//! Operation calls such as `bool(1)`
//!
//! The parser keeps calls as [`Tag::Operation`]; [`Tag::resolve`] runs them
//! against an [`OperationRegistry`], innermost first.

use crate::error::{SnbtError, SnbtResult};
use crate::tag::{CompoundTag, ListTag, Tag};
use compact_str::CompactString;
use indexmap::IndexMap;
use std::fmt;
use tracing::trace;

/// Runs operations by name.
pub trait OperationRegistry: Send + Sync {
    /// Run `name` on already resolved arguments.
    fn execute(&self, name: &str, arguments: &[Tag]) -> SnbtResult<Tag>;
}

/// Implementation of one operation
pub type OperationFn = Box<dyn Fn(&[Tag]) -> SnbtResult<Tag> + Send + Sync>;

/// An operation with a fixed argument count.
pub struct OperationSpec {
    pub name: CompactString,
    pub arity: usize,
    pub implementation: OperationFn,
}

impl fmt::Debug for OperationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

/// Operations keyed by name and argument count.
///
/// [`Operations::new`] includes the built-ins; [`Operations::empty`] starts
/// with nothing.
pub struct Operations {
    specs: IndexMap<(CompactString, usize), OperationSpec>,
}

impl Operations {
    pub fn new() -> Self {
        let mut operations = Self::empty();
        register_builtin_operations(&mut operations);
        operations
    }

    pub fn empty() -> Self {
        Self {
            specs: IndexMap::new(),
        }
    }

    /// Add or replace `name/arity`, returning the replaced operation.
    pub fn register<F>(&mut self, name: &str, arity: usize, implementation: F) -> Option<OperationSpec>
    where
        F: Fn(&[Tag]) -> SnbtResult<Tag> + Send + Sync + 'static,
    {
        let name = CompactString::from(name);
        let spec = OperationSpec {
            name: name.clone(),
            arity,
            implementation: Box::new(implementation),
        };
        self.specs.insert((name, arity), spec)
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with_operation<F>(mut self, name: &str, arity: usize, implementation: F) -> Self
    where
        F: Fn(&[Tag]) -> SnbtResult<Tag> + Send + Sync + 'static,
    {
        let _ = self.register(name, arity, implementation);
        self
    }

    pub fn contains(&self, name: &str, arity: usize) -> bool {
        self.specs.contains_key(&(CompactString::from(name), arity))
    }

    /// `name/arity` of every operation, in registration order
    pub fn signatures(&self) -> Vec<String> {
        self.specs.values().map(|spec| format!("{spec:?}")).collect()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for Operations {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Operations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.specs.values()).finish()
    }
}

impl OperationRegistry for Operations {
    fn execute(&self, name: &str, arguments: &[Tag]) -> SnbtResult<Tag> {
        let key = (CompactString::from(name), arguments.len());
        match self.specs.get(&key) {
            Some(spec) => (spec.implementation)(arguments),
            None => Err(SnbtError::NoSuchOperation(format!("{name}/{}", arguments.len()))),
        }
    }
}

fn register_builtin_operations(operations: &mut Operations) {
    let _ = operations.register("bool", 1, bool_operation);
}

/// `bool(x)`: numbers are true when non-zero, booleans stay as they are
fn bool_operation(arguments: &[Tag]) -> SnbtResult<Tag> {
    match arguments {
        [Tag::Boolean(value)] => Ok(Tag::Boolean(*value)),
        [argument] => argument
            .as_number()
            .map(|value| Tag::Boolean(value != 0.0))
            .ok_or(SnbtError::ExpectedNumberOrBoolean),
        _ => Err(SnbtError::ExpectedNumberOrBoolean),
    }
}

impl Tag {
    /// Run every operation in the tree, innermost first.
    ///
    /// Lists are checked for mixed element types again once their
    /// operations are replaced by results.
    pub fn resolve(&self, registry: &dyn OperationRegistry) -> SnbtResult<Tag> {
        match self {
            Tag::Operation(operation) => {
                let arguments = operation
                    .arguments
                    .iter()
                    .map(|argument| argument.resolve(registry))
                    .collect::<SnbtResult<Vec<Tag>>>()?;
                trace!(operation = %operation.name, arguments = arguments.len(), "running operation");
                registry.execute(&operation.name, &arguments)
            }
            Tag::List(list) => {
                let elements = list
                    .iter()
                    .map(|element| element.resolve(registry))
                    .collect::<SnbtResult<Vec<Tag>>>()?;
                Ok(Tag::List(ListTag::from_elements(elements)?))
            }
            Tag::Compound(compound) => {
                let resolved = compound
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), value.resolve(registry)?)))
                    .collect::<SnbtResult<CompoundTag>>()?;
                Ok(Tag::Compound(resolved))
            }
            other => Ok(other.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::OperationTag;

    fn call(name: &str, arguments: Vec<Tag>) -> Tag {
        Tag::Operation(OperationTag::new(name, arguments))
    }

    #[test]
    fn test_bool_operation() {
        let operations = Operations::new();
        assert_eq!(operations.execute("bool", &[Tag::Int(2)]).unwrap(), Tag::Boolean(true));
        assert_eq!(operations.execute("bool", &[Tag::Double(0.0)]).unwrap(), Tag::Boolean(false));
        assert_eq!(operations.execute("bool", &[Tag::Boolean(true)]).unwrap(), Tag::Boolean(true));
        let error = operations.execute("bool", &[Tag::from("x")]).unwrap_err();
        assert_eq!(error.to_string(), "Expected a number or a boolean");
    }

    #[test]
    fn test_unknown_operation() {
        let operations = Operations::new();
        let error = operations.execute("bool", &[Tag::Int(1), Tag::Int(2)]).unwrap_err();
        assert_eq!(error.to_string(), "No such operation: bool/2");
        let error = Operations::empty().execute("bool", &[Tag::Int(1)]).unwrap_err();
        assert_eq!(error.to_string(), "No such operation: bool/1");
    }

    #[test]
    fn test_custom_operation() {
        let operations = Operations::new().with_operation("negate", 1, |arguments| match arguments {
            [Tag::Int(value)] => Ok(Tag::Int(-value)),
            _ => Err(SnbtError::ExpectedIntegerType),
        });
        assert!(operations.contains("negate", 1));
        assert_eq!(operations.signatures(), ["bool/1", "negate/1"]);
        let tag = call("negate", vec![call("negate", vec![Tag::Int(3)])]);
        assert_eq!(tag.resolve(&operations).unwrap(), Tag::Int(3));
    }

    #[test]
    fn test_resolve_nested() {
        let mut compound = CompoundTag::new();
        let _ = compound.insert("flag", call("bool", vec![Tag::Byte(1)]));
        let _ = compound.insert("name", "x");
        let resolved = Tag::Compound(compound).resolve(&Operations::new()).unwrap();
        let resolved = resolved.as_compound().unwrap();
        assert_eq!(resolved.get("flag"), Some(&Tag::Boolean(true)));
        assert_eq!(resolved.get("name"), Some(&Tag::from("x")));
    }

    #[test]
    fn test_resolve_checks_lists_again() {
        let list = ListTag::from_elements(vec![call("bool", vec![Tag::Int(0)]), Tag::Int(1)]).unwrap();
        let error = Tag::List(list).resolve(&Operations::new()).unwrap_err();
        assert_eq!(error.to_string(), "Mixed list: expected byte, got int");
    }
}
