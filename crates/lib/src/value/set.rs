//! Ordered duplicate-free sequence container.

use std::{fmt, sync::Arc};

use super::Value;

/// An ordered, duplicate-free sequence of [`Value`]s.
///
/// Elements are kept in insertion order and addressed by iteration index,
/// which is how the accessor reads and writes set-like containers. Equality
/// of elements is value equality ([`PartialEq`]); inserting an element equal
/// to an existing one is a no-op.
///
/// The backing storage is `Arc`-shared like the other containers.
///
/// # Examples
///
/// ```
/// # use fieldtree::value::Set;
/// let mut set = Set::new();
/// assert!(set.insert("a"));
/// assert!(set.insert("b"));
/// assert!(!set.insert("a")); // duplicate
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.get(1).and_then(|v| v.as_text()), Some("b"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "Vec<Value>", into = "Vec<Value>")]
pub struct Set {
    items: Arc<Vec<Value>>,
}

impl Set {
    /// Creates a new empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the set has no elements
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if the set contains an element equal to `value`
    pub fn contains(&self, value: &Value) -> bool {
        self.items.iter().any(|item| item == value)
    }

    /// Gets an element by iteration-order index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Returns the iteration-order index of the first element equal to `value`
    pub fn index_of(&self, value: &Value) -> Option<usize> {
        self.items.iter().position(|item| item == value)
    }

    /// Inserts an element at the end, returning false if an equal element
    /// already exists
    pub fn insert(&mut self, value: impl Into<Value>) -> bool {
        let value = value.into();
        if self.contains(&value) {
            return false;
        }
        Arc::make_mut(&mut self.items).push(value);
        true
    }

    /// Removes the first element equal to `value`, returning true if found
    pub fn remove(&mut self, value: &Value) -> bool {
        match self.index_of(value) {
            Some(index) => {
                Arc::make_mut(&mut self.items).remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns a set with the element at `index` replaced by `value`.
    ///
    /// Uniqueness is preserved: if `value` already occurs elsewhere, the
    /// duplicate occurrence is dropped. An index at or past the end inserts
    /// at the end instead.
    pub fn with_replaced(&self, index: usize, value: impl Into<Value>) -> Set {
        let value = value.into();
        let mut items: Vec<Value> = Vec::with_capacity(self.items.len() + 1);
        for (i, item) in self.items.iter().enumerate() {
            if i == index {
                items.push(value.clone());
            } else {
                items.push(item.clone());
            }
        }
        if index >= self.items.len() {
            items.push(value);
        }
        Set::from(items)
    }

    /// Iterates over elements in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    /// Returns true if both sets share the same allocation
    pub fn ptr_eq(&self, other: &Set) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "}}")
    }
}

// Deduplicates while preserving first-occurrence order.
impl From<Vec<Value>> for Set {
    fn from(values: Vec<Value>) -> Self {
        let mut items: Vec<Value> = Vec::with_capacity(values.len());
        for value in values {
            if !items.iter().any(|item| *item == value) {
                items.push(value);
            }
        }
        Self {
            items: Arc::new(items),
        }
    }
}

impl From<Set> for Vec<Value> {
    fn from(set: Set) -> Self {
        match Arc::try_unwrap(set.items) {
            Ok(items) => items,
            Err(shared) => shared.as_ref().clone(),
        }
    }
}

impl FromIterator<Value> for Set {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Set::from(iter.into_iter().collect::<Vec<_>>())
    }
}
