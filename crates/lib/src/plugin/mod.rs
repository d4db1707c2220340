//! Capability injection: plugins that enhance every node of a tree.
//!
//! A [`Plugin`] is run against every field node at creation time: the root
//! when the tree is built, and each child when it is first derived. Plugins
//! run in registration order, each seeing the node as enhanced by the
//! plugins before it in the chain.
//!
//! Plugins attach behavior through *capabilities*: typed values installed on
//! a node with [`Field::insert_capability`] and read back with
//! [`Field::capability`]. The capability model is open. A plugin may read
//! any core state and install anything, but plugins must not violate the
//! tree invariants (they cannot rewire parents or children; the core does
//! not expose mutation of either).
//!
//! # Composition
//!
//! When a plugin installs a capability type that an earlier plugin already
//! installed, `insert_capability` hands back the earlier value. A
//! well-behaved plugin composes with it (calls through) instead of
//! discarding it; this is how independent plugins stack side effects on the
//! same hook.
//!
//! ```
//! use fieldtree::{Field, TreeBuilder, map};
//!
//! // A capability: renders the field for display.
//! struct Renderer(Box<dyn Fn(&Field) -> String>);
//!
//! // First plugin installs a plain renderer.
//! fn base(field: &Field) -> fieldtree::Result<()> {
//!     field.insert_capability(Renderer(Box::new(|f| f.value().to_string())));
//!     Ok(())
//! }
//!
//! // Second plugin wraps whatever renderer is already installed.
//! fn bracketed(field: &Field) -> fieldtree::Result<()> {
//!     if let Some(previous) = field.insert_capability(Renderer(Box::new(|f| f.value().to_string()))) {
//!         field.insert_capability(Renderer(Box::new(move |f| format!("[{}]", (previous.0)(f)))));
//!     }
//!     Ok(())
//! }
//!
//! let root = TreeBuilder::new()
//!     .plugin(base)
//!     .plugin(bracketed)
//!     .build(map! { "a" => 1 })?;
//!
//! let renderer = root.at("a")?.capability::<Renderer>().unwrap();
//! assert_eq!((renderer.0)(&root.at("a")?), "[1]");
//! # Ok::<(), fieldtree::Error>(())
//! ```
//!
//! # Failure
//!
//! A plugin returning an error during node creation is fatal for that node:
//! `at` (or tree construction) returns the error and the half-enhanced node
//! is not cached.

use crate::{Result, field::Field};

pub mod errors;

pub use errors::PluginError;

/// A capability injector, run once per node at creation time.
///
/// Implemented automatically by closures of the matching shape, so simple
/// plugins are just functions:
///
/// ```
/// use fieldtree::{Field, TreeBuilder};
///
/// fn touch_counter(field: &Field) -> fieldtree::Result<()> {
///     field.insert_capability(std::cell::Cell::new(0u32));
///     Ok(())
/// }
///
/// let root = TreeBuilder::new().plugin(touch_counter).build(1)?;
/// assert!(root.has_capability::<std::cell::Cell<u32>>());
/// # Ok::<(), fieldtree::Error>(())
/// ```
pub trait Plugin {
    /// Enhances a freshly created node in place.
    fn enhance(&self, field: &Field) -> Result<()>;
}

impl<F> Plugin for F
where
    F: Fn(&Field) -> Result<()>,
{
    fn enhance(&self, field: &Field) -> Result<()> {
        self(field)
    }
}
