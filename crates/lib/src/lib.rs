//!
//! Fieldtree: a reactive, tree-structured state container.
//!
//! A tree holds one root value; [`Field`] handles address sub-paths of it,
//! derived lazily with [`Field::at`] and cached forever. Writes anywhere in
//! the tree keep the whole value graph consistent and notify subscribed
//! listeners, synchronously.
//!
//! ## Core Concepts
//!
//! * **Values (`value::Value`)**: The data model: JSON-like primitives plus
//!   `Arc`-backed maps, lists, and sets, so unchanged branches share
//!   structure across writes.
//! * **Fields (`field::Field`)**: Lazily derived, cached handles to
//!   sub-values. Writing a field propagates the edit upward into ancestor
//!   values and back downward into derived descendants.
//! * **Transient edits**: `set_transient_value` buffers an edit at one node
//!   (visible to that subtree only) until `flush_transient` promotes it.
//! * **Accessors (`accessor::Accessor`)**: The pluggable read/update policy
//!   deciding how a key addresses a sub-value inside a container.
//! * **Plugins (`plugin::Plugin`)**: Run against every node at creation,
//!   attaching typed capabilities that handles can retrieve later.
//! * **Events (`event::FieldEvent`)**: Change notifications dispatched after
//!   a write commits, bubbling from each changed node to the root.
//!
//! ## Example
//!
//! ```
//! use fieldtree::{map, new_tree};
//!
//! let root = new_tree(map! { "user" => map! { "name" => "Alice", "age" => 30 } })?;
//! let age = root.at("user")?.at("age")?;
//!
//! let _sub = age.subscribe(|event| {
//!     println!("{} -> {}", event.previous_value(), event.target().value());
//!     Ok(())
//! });
//!
//! age.set_value(31)?;
//! assert_eq!(age.value(), 31);
//! # Ok::<(), fieldtree::Error>(())
//! ```

pub mod accessor;
pub mod event;
pub mod field;
pub mod plugin;
pub mod tree;
pub mod value;

pub use accessor::{Accessor, ValueAccessor};
pub use event::{FieldEvent, Subscription};
pub use field::Field;
pub use plugin::Plugin;
pub use tree::{TreeBuilder, new_tree};
pub use value::{Key, KeyPath, Value};

/// Result type used throughout the fieldtree library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the fieldtree library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured plugin errors from the plugin module
    #[error(transparent)]
    Plugin(plugin::PluginError),

    /// Structured listener errors from the event module
    #[error(transparent)]
    Event(event::EventError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Serialize(_) => "serialize",
            Error::Plugin(_) => "plugin",
            Error::Event(_) => "event",
        }
    }

    /// Check if this error came from a plugin.
    pub fn is_plugin_error(&self) -> bool {
        matches!(self, Error::Plugin(_))
    }

    /// Check if this error is a missing-capability failure.
    pub fn is_capability_error(&self) -> bool {
        match self {
            Error::Plugin(plugin_err) => plugin_err.is_capability_error(),
            _ => false,
        }
    }

    /// Check if this error came from an event listener.
    pub fn is_listener_error(&self) -> bool {
        match self {
            Error::Event(event_err) => event_err.is_listener_error(),
            _ => false,
        }
    }

    /// Check if this error is serialization-related.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::Serialize(_))
    }
}
