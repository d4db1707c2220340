//! The get/set abstraction over keyed sub-values.
//!
//! An [`Accessor`] is the only thing the propagation algorithm knows about
//! the shape of values: `get` reads the sub-value at a key, `set` produces a
//! new container with the sub-value replaced. The whole tree shares one
//! accessor, assigned when the tree is built.
//!
//! # Contract
//!
//! - `set` never mutates its input container.
//! - When the value already at `key` equals the new value, `set` returns the
//!   *original* container (same allocation). The propagation algorithm uses
//!   this to terminate subtree walks early, so a custom accessor that copies
//!   unconditionally will defeat pruning and notify unchanged fields.
//! - `get` on a non-container value returns `None` instead of failing; key
//!   misuse (e.g. a non-numeric key on a list) also resolves to `None`.
//!
//! The default [`ValueAccessor`] covers maps, lists, sets and primitives.
//! External accessors over other container shapes implement the same two
//! methods.

use crate::value::{Key, List, Map, Value};


/// Reads and writes one keyed step of a nested value.
///
/// Implementations must be pure: no interior state, no mutation of the input
/// container. See the module docs for the identity contract on `set`.
pub trait Accessor {
    /// Returns the sub-value of `container` at `key`, or `None` when the
    /// container has no such sub-value (absent key, key/container mismatch,
    /// or a non-container value).
    fn get(&self, container: &Value, key: &Key) -> Option<Value>;

    /// Returns a container equal to `container` except that `key` now holds
    /// `value`. Returns `container` itself (same allocation) when the value
    /// at `key` is already equal to `value`.
    fn set(&self, container: &Value, key: &Key, value: Value) -> Value;
}

/// The default accessor over the [`Value`] model.
///
/// Policies:
///
/// - **Maps**: text keys address entries; index keys address the entry named
///   by their decimal form (`Key::Index(1)` reads the `"1"` entry).
/// - **Lists**: index keys (or text keys that are well-formed indexes)
///   address elements; writing at the length appends, writing past it pads
///   the gap with nulls. A non-index key treats the list as an absent
///   container.
/// - **Sets**: index into iteration order; writing rebuilds the set with the
///   target element replaced, dropping any duplicate this creates.
/// - **Primitives / null**: `get` returns `None`; `set` synthesizes a new
///   list when the key is a well-formed index, otherwise a new map.
///
/// ```
/// # use fieldtree::accessor::{Accessor, ValueAccessor};
/// # use fieldtree::value::{Key, Value};
/// # use fieldtree::map;
/// let accessor = ValueAccessor;
/// let container = Value::Map(map! { "a" => 1 });
///
/// assert_eq!(accessor.get(&container, &Key::from("a")), Some(Value::Int(1)));
///
/// // Unchanged write hands back the original allocation.
/// let same = accessor.set(&container, &Key::from("a"), Value::Int(1));
/// assert!(same.ptr_eq(&container));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueAccessor;

impl Accessor for ValueAccessor {
    fn get(&self, container: &Value, key: &Key) -> Option<Value> {
        match container {
            Value::Map(map) => map.get(&key.to_text()).cloned(),
            Value::List(list) => list.get(key.as_index()?).cloned(),
            Value::Set(set) => set.get(key.as_index()?).cloned(),
            _ => None,
        }
    }

    fn set(&self, container: &Value, key: &Key, value: Value) -> Value {
        match container {
            Value::Map(map) => {
                let text = key.to_text();
                if map.get(&text) == Some(&value) {
                    return container.clone();
                }
                let mut updated = map.clone();
                updated.insert(text, value);
                Value::Map(updated)
            }
            Value::List(list) => match key.as_index() {
                Some(index) => {
                    if list.get(index) == Some(&value) {
                        return container.clone();
                    }
                    let mut updated = list.clone();
                    updated.set(index, value);
                    Value::List(updated)
                }
                // Key misuse: treat the list as absent and synthesize a map.
                None => synthesize(key, value),
            },
            Value::Set(set) => match key.as_index() {
                Some(index) => {
                    if set.get(index) == Some(&value) {
                        return container.clone();
                    }
                    Value::Set(set.with_replaced(index, value))
                }
                None => synthesize(key, value),
            },
            // Primitives and null have no slots to write into.
            _ => synthesize(key, value),
        }
    }
}

/// Builds a fresh container holding only `value` at `key`: a list for index
/// keys, a map otherwise.
fn synthesize(key: &Key, value: Value) -> Value {
    match key.as_index() {
        Some(index) => {
            let mut list = List::new();
            list.set(index, value);
            Value::List(list)
        }
        None => {
            let mut map = Map::new();
            map.insert(key.to_text(), value);
            Value::Map(map)
        }
    }
}
