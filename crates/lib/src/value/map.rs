//! String-keyed map container with copy-on-write semantics.

use std::{collections::HashMap, fmt, sync::Arc};

use super::Value;

/// A string-keyed map of [`Value`]s.
///
/// The entry table is behind an [`Arc`], so cloning a `Map` is O(1) and the
/// clone shares the original allocation. Mutating methods use
/// [`Arc::make_mut`], copying the table only when it is shared. This gives
/// the structural-sharing behavior the propagation algorithm depends on: an
/// untouched map survives a write with its allocation (and therefore its
/// [`Map::ptr_eq`] identity) intact.
///
/// # Examples
///
/// ```
/// # use fieldtree::value::Map;
/// let mut map = Map::new();
/// map.insert("name", "Alice");
/// map.insert("age", 30);
///
/// assert_eq!(map.len(), 2);
/// assert!(map.get("name").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Map {
    entries: Arc<HashMap<String, Value>>,
}

impl Map {
    /// Creates a new empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the map contains the given key
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Gets a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Inserts a value, returning the previous value at that key if present.
    ///
    /// Copies the entry table first if it is shared with other clones.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        Arc::make_mut(&mut self.entries).insert(key.into(), value.into())
    }

    /// Removes a value by key, returning it if present
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        Arc::make_mut(&mut self.entries).remove(key)
    }

    /// Iterates over entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Iterates over keys in arbitrary order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Returns true if both maps share the same allocation
    pub fn ptr_eq(&self, other: &Map) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        write!(f, "}}")
    }
}

impl FromIterator<(String, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl From<HashMap<String, Value>> for Map {
    fn from(entries: HashMap<String, Value>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }
}

/// Builds a [`Map`] from key-value pairs.
///
/// # Examples
///
/// ```
/// # use fieldtree::map;
/// let user = map! { "name" => "Alice", "age" => 30 };
/// assert_eq!(user.len(), 2);
/// ```
#[macro_export]
macro_rules! map {
    () => {
        $crate::value::Map::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::value::Map::new();
        $( map.insert($key, $value); )+
        map
    }};
}
