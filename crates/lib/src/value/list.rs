//! Index-addressed sequence container with copy-on-write semantics.

use std::{fmt, sync::Arc};

use super::Value;

/// An ordered sequence of [`Value`]s addressed by index.
///
/// Like [`Map`](super::Map), the backing storage is behind an [`Arc`]:
/// clones are O(1) and share the allocation, and mutating methods copy only
/// when shared.
///
/// # Examples
///
/// ```
/// # use fieldtree::value::List;
/// let mut list = List::new();
/// list.push(1);
/// list.push(2);
///
/// assert_eq!(list.len(), 2);
/// assert_eq!(list.get(0).and_then(|v| v.as_int()), Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct List {
    items: Arc<Vec<Value>>,
}

impl List {
    /// Creates a new empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the list has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Gets an item by index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Appends an item to the end of the list
    pub fn push(&mut self, value: impl Into<Value>) {
        Arc::make_mut(&mut self.items).push(value.into());
    }

    /// Replaces the item at `index`, returning the previous item.
    ///
    /// An index equal to the length appends; an index past the end pads the
    /// gap with [`Value::Null`] before writing, keeping the list dense.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Option<Value> {
        let items = Arc::make_mut(&mut self.items);
        if index < items.len() {
            Some(std::mem::replace(&mut items[index], value.into()))
        } else {
            while items.len() < index {
                items.push(Value::Null);
            }
            items.push(value.into());
            None
        }
    }

    /// Removes and returns the last item
    pub fn pop(&mut self) -> Option<Value> {
        Arc::make_mut(&mut self.items).pop()
    }

    /// Iterates over items in order
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    /// Returns true if both lists share the same allocation
    pub fn ptr_eq(&self, other: &List) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "]")
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl From<Vec<Value>> for List {
    fn from(items: Vec<Value>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }
}

impl From<List> for Vec<Value> {
    fn from(list: List) -> Self {
        match Arc::try_unwrap(list.items) {
            Ok(items) => items,
            Err(shared) => shared.as_ref().clone(),
        }
    }
}

/// Builds a [`List`] from values.
///
/// # Examples
///
/// ```
/// # use fieldtree::list;
/// let numbers = list![1, 2, 3];
/// assert_eq!(numbers.len(), 3);
/// ```
#[macro_export]
macro_rules! list {
    () => {
        $crate::value::List::new()
    };
    ($($value:expr),+ $(,)?) => {{
        let mut list = $crate::value::List::new();
        $( list.push($value); )+
        list
    }};
}
