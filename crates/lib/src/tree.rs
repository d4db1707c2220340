//! Tree construction: the builder that assembles accessor, plugins, and
//! initial value into a root [`Field`].

use std::rc::Rc;

use crate::{
    Result,
    accessor::{Accessor, ValueAccessor},
    field::Field,
    plugin::Plugin,
    value::Value,
};

/// Builds a field tree.
///
/// The builder collects the tree-wide configuration (the value accessor and
/// the plugin chain) and produces the root field. The accessor defaults to
/// [`ValueAccessor`]; plugins run in registration order, against the root at
/// build time and against every child when it is first derived.
///
/// ```
/// use fieldtree::{TreeBuilder, map};
///
/// let root = TreeBuilder::new()
///     .plugin(|field: &fieldtree::Field| {
///         field.insert_capability(std::cell::Cell::new(false));
///         Ok(())
///     })
///     .build(map! { "draft" => map! { "title" => "" } })?;
///
/// assert!(root.has_capability::<std::cell::Cell<bool>>());
/// # Ok::<(), fieldtree::Error>(())
/// ```
pub struct TreeBuilder {
    accessor: Rc<dyn Accessor>,
    plugins: Vec<Rc<dyn Plugin>>,
}

impl TreeBuilder {
    /// Creates a builder with the default [`ValueAccessor`] and no plugins.
    pub fn new() -> Self {
        Self {
            accessor: Rc::new(ValueAccessor),
            plugins: Vec::new(),
        }
    }

    /// Replaces the tree's accessor.
    ///
    /// All derivation and upward propagation in the resulting tree goes
    /// through this accessor.
    pub fn accessor(mut self, accessor: impl Accessor + 'static) -> Self {
        self.accessor = Rc::new(accessor);
        self
    }

    /// Appends a plugin to the chain.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Rc::new(plugin));
        self
    }

    /// Builds the tree and returns its root field.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by a plugin while enhancing the
    /// root; no tree is created in that case.
    pub fn build(self, initial: impl Into<Value>) -> Result<Field> {
        Field::new_root(self.accessor, self.plugins, initial.into())
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates a plain tree: default accessor, no plugins.
///
/// Shorthand for `TreeBuilder::new().build(initial)`.
///
/// ```
/// use fieldtree::{map, new_tree};
///
/// let root = new_tree(map! { "count" => 0 })?;
/// root.at("count")?.set_value(1)?;
/// assert_eq!(root.at("count")?.value(), 1);
/// # Ok::<(), fieldtree::Error>(())
/// ```
pub fn new_tree(initial: impl Into<Value>) -> Result<Field> {
    TreeBuilder::new().build(initial)
}
