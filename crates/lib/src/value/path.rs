//! Keys and paths for addressing values inside a field tree.
//!
//! A [`Key`] addresses one step into a container: a text key for maps, an
//! index for lists and sets. A [`KeyPath`] is a sequence of keys addressing a
//! nested sub-value, with dot-notation parsing.
//!
//! # Key Equality
//!
//! Text keys that are well-formed indexes compare equal to the corresponding
//! index key: `Key::from("0") == Key::from(0usize)`. This keeps the child
//! registry of a field node from ever holding two children for the same
//! logical slot when callers mix the two spellings.
//!
//! # Usage
//!
//! ```
//! use fieldtree::value::{Key, KeyPath};
//!
//! // Parse from a dot-notation string (automatically normalized)
//! let path = KeyPath::from("user.addresses.0.city");
//! assert_eq!(path.len(), 4);
//! assert_eq!(path.keys()[2], Key::Index(0));
//!
//! // Build incrementally
//! let path = KeyPath::new().join("user").join(0usize);
//! assert_eq!(path.to_string(), "user.0");
//! ```

use std::{
    convert::Infallible,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

/// One step of a path: a text key into a map, or an index into a list or set.
#[derive(Debug, Clone, Eq, serde::Serialize, serde::Deserialize)]
pub enum Key {
    /// Text key addressing a map entry
    Text(String),
    /// Index addressing a list or set element
    Index(usize),
}

impl Key {
    /// Returns the index form of this key, if it has one.
    ///
    /// Index keys return their index; text keys return one only when they are
    /// a well-formed non-negative decimal index ("0", "17", but not "01",
    /// "+1" or "1.5").
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(index) => Some(*index),
            Key::Text(text) => {
                let parsed: usize = text.parse().ok()?;
                (parsed.to_string() == *text).then_some(parsed)
            }
        }
    }

    /// Returns the text form of this key, if it is a text key
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Text(text) => Some(text),
            Key::Index(_) => None,
        }
    }

    /// Returns the canonical text rendering of this key.
    ///
    /// Index keys render as their decimal form, which is also how they
    /// address map entries.
    pub fn to_text(&self) -> String {
        match self {
            Key::Text(text) => text.clone(),
            Key::Index(index) => index.to_string(),
        }
    }
}

// Equality and hashing go through the canonical form so that Text("0") and
// Index(0) address the same child registry slot.
impl PartialEq for Key {
    fn eq(&self, other: &Key) -> bool {
        match (self.as_index(), other.as_index()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.as_str() == other.as_str(),
            _ => false,
        }
    }
}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.as_index() {
            Some(index) => {
                state.write_u8(0);
                state.write_u64(index as u64);
            }
            None => {
                state.write_u8(1);
                // as_index() returned None, so this is a Text key
                if let Key::Text(text) = self {
                    text.hash(state);
                }
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Text(text) => write!(f, "{text}"),
            Key::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Text(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Text(value)
    }
}

impl From<usize> for Key {
    fn from(value: usize) -> Self {
        Key::Index(value)
    }
}

impl From<u32> for Key {
    fn from(value: u32) -> Self {
        Key::Index(value as usize)
    }
}

/// An owned sequence of [`Key`]s addressing a nested sub-value.
///
/// Parsing from a string splits on dots, drops empty components (so leading,
/// trailing and doubled dots normalize away, as in `"user..name."` →
/// `"user.name"`), and turns well-formed index components into
/// [`Key::Index`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct KeyPath {
    keys: Vec<Key>,
}

impl KeyPath {
    /// Creates a new empty path (addresses the root)
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of keys in the path
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the path is empty (addresses the root)
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the keys of the path in order
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Appends a key in place
    pub fn push(&mut self, key: impl Into<Key>) {
        self.keys.push(key.into());
    }

    /// Appends a key, returning the extended path (builder style)
    #[must_use]
    pub fn join(mut self, key: impl Into<Key>) -> Self {
        self.push(key);
        self
    }

    /// Iterates over the keys in order
    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

impl From<&str> for KeyPath {
    fn from(value: &str) -> Self {
        let keys = value
            .split('.')
            .filter(|component| !component.is_empty())
            .map(|component| {
                let key = Key::Text(component.to_string());
                match key.as_index() {
                    Some(index) => Key::Index(index),
                    None => key,
                }
            })
            .collect();
        Self { keys }
    }
}

impl From<String> for KeyPath {
    fn from(value: String) -> Self {
        KeyPath::from(value.as_str())
    }
}

impl From<Key> for KeyPath {
    fn from(key: Key) -> Self {
        Self { keys: vec![key] }
    }
}

impl From<usize> for KeyPath {
    fn from(index: usize) -> Self {
        KeyPath::from(Key::Index(index))
    }
}

impl From<Vec<Key>> for KeyPath {
    fn from(keys: Vec<Key>) -> Self {
        Self { keys }
    }
}

impl FromStr for KeyPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(KeyPath::from(s))
    }
}

impl FromIterator<Key> for KeyPath {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

/// Builds a [`KeyPath`].
///
/// With a single argument, anything convertible to a `KeyPath` works,
/// including dot-notation strings. With multiple arguments, each argument is
/// one key.
///
/// # Examples
///
/// ```
/// use fieldtree::path;
///
/// let a = path!("user.addresses.0.city");
/// let b = path!("user", "addresses", 0usize, "city");
/// assert_eq!(a, b);
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::value::KeyPath::new()
    };
    ($single:expr $(,)?) => {
        $crate::value::KeyPath::from($single)
    };
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut path = $crate::value::KeyPath::from($first);
        $( path.push($rest); )+
        path
    }};
}
