//! Field nodes: the tree units of a reactive state container.
//!
//! A [`Field`] addresses one sub-path of a tree's root value. Children are
//! derived lazily with [`Field::at`] and cached for the life of the tree, so
//! repeated calls with an equal key return the same node. Writes propagate
//! upward into ancestor values through the tree's accessor (with structural
//! sharing) and back downward into previously derived descendants, unless a
//! node is *transient*, in which case its edits stay buffered locally until
//! [`Field::flush_transient`] promotes them.
//!
//! # Tree Shape
//!
//! Nodes live in an arena owned by the tree; a `Field` is a cheap handle
//! (shared tree state plus a node id). Parent and child links are arena ids,
//! which keeps ownership strictly tree-shaped: no cycles, and a node never
//! appears under two parents. Nodes are not destroyed individually; they
//! live as long as any handle to their tree.
//!
//! # Usage
//!
//! ```
//! use fieldtree::{map, new_tree};
//!
//! let root = new_tree(map! { "user" => map! { "name" => "Alice" } })?;
//! let name = root.at("user")?.at("name")?;
//!
//! name.set_value("Bob")?;
//! assert_eq!(root.at("user")?.value().as_map().unwrap().get("name").unwrap(), "Bob");
//! # Ok::<(), fieldtree::Error>(())
//! ```
//!
//! # Invariants
//!
//! 1. Every non-root node has exactly one parent.
//! 2. `at(key)` called twice with an equal key returns the same node.
//! 3. A non-transient node's value always equals
//!    `accessor.get(parent.value, key)` between writes.
//! 4. A transient node's subtree is excluded from downward propagation until
//!    the node is flushed.

use std::{
    any::{Any, TypeId},
    cell::{Cell, RefCell},
    collections::HashMap,
    fmt,
    rc::Rc,
};

use crate::{
    Result,
    accessor::Accessor,
    event::Listener,
    plugin::Plugin,
    value::{Key, KeyPath, Value},
};

pub(crate) mod propagate;

/// Tree-wide state shared by every field handle of one tree.
pub(crate) struct TreeShared {
    pub(crate) accessor: Rc<dyn Accessor>,
    pub(crate) plugins: Vec<Rc<dyn Plugin>>,
    pub(crate) nodes: RefCell<Vec<Node>>,
    next_subscriber_id: Cell<u64>,
}

impl TreeShared {
    pub(crate) fn next_subscriber_id(&self) -> u64 {
        let id = self.next_subscriber_id.get();
        self.next_subscriber_id.set(id + 1);
        id
    }

    /// Removes a subscriber registration. Safe to call repeatedly; removal
    /// of an id that is already gone is a no-op.
    pub(crate) fn remove_subscriber(&self, node_id: usize, subscriber_id: u64) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(node) = nodes.get_mut(node_id) {
            node.subscribers.retain(|entry| entry.id != subscriber_id);
        }
    }
}

/// One arena slot: the per-node state of the tree.
pub(crate) struct Node {
    pub(crate) key: Option<Key>,
    pub(crate) parent: Option<usize>,
    pub(crate) value: Value,
    pub(crate) transient: bool,
    /// Small ordered registry; at most one child per distinct key.
    pub(crate) children: Vec<(Key, usize)>,
    pub(crate) subscribers: Vec<SubscriberEntry>,
    pub(crate) capabilities: HashMap<TypeId, Rc<dyn Any>>,
}

impl Node {
    fn new(key: Option<Key>, parent: Option<usize>, value: Value) -> Self {
        Self {
            key,
            parent,
            value,
            transient: false,
            children: Vec::new(),
            subscribers: Vec::new(),
            capabilities: HashMap::new(),
        }
    }
}

pub(crate) struct SubscriberEntry {
    pub(crate) id: u64,
    pub(crate) kind: String,
    pub(crate) listener: Rc<Listener>,
}

/// A handle to one node of a field tree.
///
/// `Field` is cheap to clone; all clones refer to the same node. Two fields
/// compare equal exactly when they are handles to the same node of the same
/// tree. Fields are single-threaded (`!Send`), matching the synchronous
/// propagation model.
pub struct Field {
    shared: Rc<TreeShared>,
    id: usize,
}

impl Field {
    pub(crate) fn from_parts(shared: Rc<TreeShared>, id: usize) -> Self {
        Self { shared, id }
    }

    /// Builds the root node of a new tree and runs the plugin chain on it.
    ///
    /// A plugin failure aborts construction; no tree is returned.
    pub(crate) fn new_root(
        accessor: Rc<dyn Accessor>,
        plugins: Vec<Rc<dyn Plugin>>,
        initial: Value,
    ) -> Result<Field> {
        let shared = Rc::new(TreeShared {
            accessor,
            plugins,
            nodes: RefCell::new(vec![Node::new(None, None, initial)]),
            next_subscriber_id: Cell::new(0),
        });
        let root = Field { shared, id: 0 };
        for plugin in root.shared.plugins.iter() {
            plugin.enhance(&root)?;
        }
        Ok(root)
    }

    pub(crate) fn shared(&self) -> &Rc<TreeShared> {
        &self.shared
    }

    pub(crate) fn node_id(&self) -> usize {
        self.id
    }

    /// Returns the node's current value.
    ///
    /// Container values are `Arc`-backed, so this is a cheap clone.
    pub fn value(&self) -> Value {
        self.shared.nodes.borrow()[self.id].value.clone()
    }

    /// Returns true if this node holds a buffered edit that has not been
    /// flushed to its parent yet.
    pub fn is_transient(&self) -> bool {
        self.shared.nodes.borrow()[self.id].transient
    }

    /// Returns the node's key within its parent, or `None` for the root.
    pub fn key(&self) -> Option<Key> {
        self.shared.nodes.borrow()[self.id].key.clone()
    }

    /// Returns the parent field, or `None` for the root.
    pub fn parent(&self) -> Option<Field> {
        let parent_id = self.shared.nodes.borrow()[self.id].parent?;
        Some(Field::from_parts(Rc::clone(&self.shared), parent_id))
    }

    /// Returns true if this is the tree's root node.
    pub fn is_root(&self) -> bool {
        self.shared.nodes.borrow()[self.id].parent.is_none()
    }

    /// Returns the root field of this node's tree.
    pub fn root(&self) -> Field {
        let nodes = self.shared.nodes.borrow();
        let mut id = self.id;
        while let Some(parent_id) = nodes[id].parent {
            id = parent_id;
        }
        Field::from_parts(Rc::clone(&self.shared), id)
    }

    /// Returns the path from the root to this node.
    pub fn path(&self) -> KeyPath {
        let nodes = self.shared.nodes.borrow();
        let mut keys = Vec::new();
        let mut id = self.id;
        while let Some(parent_id) = nodes[id].parent {
            if let Some(key) = nodes[id].key.clone() {
                keys.push(key);
            }
            id = parent_id;
        }
        keys.reverse();
        KeyPath::from(keys)
    }

    /// Derives (or returns the cached) child field at `key`.
    ///
    /// On first access the child's value is read through the tree's accessor;
    /// an absent sub-value derives as [`Value::Null`]. The plugin chain runs
    /// against the new node before it is cached; if a plugin fails, the error
    /// is returned and nothing is cached, so a later `at` with the same key
    /// starts fresh.
    pub fn at(&self, key: impl Into<Key>) -> Result<Field> {
        self.derive_child(key.into(), None)
    }

    /// Like [`Field::at`], but uses `default` in place of an absent
    /// sub-value when the child is first derived.
    ///
    /// The default applies only at creation; it does not resurrect a value
    /// removed later by an ancestor write.
    pub fn at_or(&self, key: impl Into<Key>, default: impl Into<Value>) -> Result<Field> {
        self.derive_child(key.into(), Some(default.into()))
    }

    /// Walks a whole [`KeyPath`], deriving each step with [`Field::at`].
    ///
    /// ```
    /// use fieldtree::{map, new_tree, path};
    ///
    /// let root = new_tree(map! { "user" => map! { "name" => "Alice" } })?;
    /// let name = root.at_path(path!("user.name"))?;
    /// assert_eq!(name.value(), "Alice");
    /// # Ok::<(), fieldtree::Error>(())
    /// ```
    pub fn at_path(&self, path: impl Into<KeyPath>) -> Result<Field> {
        let mut field = self.clone();
        for key in path.into().iter() {
            field = field.at(key.clone())?;
        }
        Ok(field)
    }

    fn derive_child(&self, key: Key, default: Option<Value>) -> Result<Field> {
        if let Some(existing) = self.cached_child(&key) {
            return Ok(existing);
        }

        let value = {
            let nodes = self.shared.nodes.borrow();
            match self.shared.accessor.get(&nodes[self.id].value, &key) {
                Some(derived) => derived,
                None => default.unwrap_or(Value::Null),
            }
        };

        let child_id = {
            let mut nodes = self.shared.nodes.borrow_mut();
            nodes.push(Node::new(Some(key.clone()), Some(self.id), value));
            nodes.len() - 1
        };
        let child = Field::from_parts(Rc::clone(&self.shared), child_id);

        // Run the chain before caching: a failing plugin must not leave a
        // half-enhanced node reachable through the registry.
        for plugin in self.shared.plugins.iter() {
            plugin.enhance(&child)?;
        }

        let mut nodes = self.shared.nodes.borrow_mut();
        // A plugin may have derived this key re-entrantly; keep whichever
        // registration landed first.
        let registered = nodes[self.id]
            .children
            .iter()
            .position(|(existing_key, _)| *existing_key == key);
        match registered {
            Some(index) => {
                let existing_id = nodes[self.id].children[index].1;
                Ok(Field::from_parts(Rc::clone(&self.shared), existing_id))
            }
            None => {
                nodes[self.id].children.push((key, child_id));
                Ok(child)
            }
        }
    }

    fn cached_child(&self, key: &Key) -> Option<Field> {
        let nodes = self.shared.nodes.borrow();
        nodes[self.id]
            .children
            .iter()
            .find(|(existing_key, _)| existing_key == key)
            .map(|(_, id)| Field::from_parts(Rc::clone(&self.shared), *id))
    }

    /// Writes a value persistently.
    ///
    /// The new value is pushed upward through ancestor values (stopping at
    /// the root or at the first transient ancestor, which absorbs the edit
    /// without passing it on) and then back downward into previously derived
    /// descendants, skipping transient subtrees and unchanged branches. One
    /// change event per visited node is dispatched after the whole value
    /// graph is consistent.
    ///
    /// Writing a value equal to the current one to an already non-transient
    /// node is a pure no-op: no walk, no events.
    ///
    /// # Errors
    ///
    /// The write itself cannot fail; a returned error is the first error
    /// produced by a listener during event dispatch, surfaced after every
    /// listener has run. The value graph is already committed at that point.
    pub fn set_value(&self, value: impl Into<Value>) -> Result<()> {
        propagate::write(self, value.into(), false)
    }

    /// Writes a value transiently: the edit is buffered at this node and
    /// propagated only downward into this node's own subtree. Ancestors (and
    /// the rest of the tree) do not observe it until
    /// [`Field::flush_transient`].
    pub fn set_transient_value(&self, value: impl Into<Value>) -> Result<()> {
        propagate::write(self, value.into(), true)
    }

    /// Promotes a buffered transient edit to a persistent one, pushing it
    /// upward as if [`Field::set_value`] had been called with the buffered
    /// value. No-op when the node is not transient.
    pub fn flush_transient(&self) -> Result<()> {
        let buffered = {
            let nodes = self.shared.nodes.borrow();
            let node = &nodes[self.id];
            if !node.transient {
                return Ok(());
            }
            node.value.clone()
        };
        propagate::write(self, buffered, false)
    }

    /// Installs a capability of type `T` on this node, returning the
    /// previously installed capability of the same type if there was one.
    ///
    /// This is the wrapping hook for plugin composition: a later plugin can
    /// take the returned previous capability and install a new one that
    /// delegates to it.
    pub fn insert_capability<T: Any>(&self, capability: T) -> Option<Rc<T>> {
        let mut nodes = self.shared.nodes.borrow_mut();
        nodes[self.id]
            .capabilities
            .insert(TypeId::of::<T>(), Rc::new(capability))
            .and_then(|previous| previous.downcast::<T>().ok())
    }

    /// Returns the capability of type `T` installed on this node, if any.
    pub fn capability<T: Any>(&self) -> Option<Rc<T>> {
        let nodes = self.shared.nodes.borrow();
        let entry = nodes[self.id].capabilities.get(&TypeId::of::<T>())?;
        Rc::clone(entry).downcast::<T>().ok()
    }

    /// Returns true if a capability of type `T` is installed on this node.
    pub fn has_capability<T: Any>(&self) -> bool {
        let nodes = self.shared.nodes.borrow();
        nodes[self.id].capabilities.contains_key(&TypeId::of::<T>())
    }
}

impl Clone for Field {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
            id: self.id,
        }
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Field) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared) && self.id == other.id
    }
}

impl Eq for Field {}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("path", &self.path().to_string())
            .field("value", &self.value())
            .field("transient", &self.is_transient())
            .finish()
    }
}
