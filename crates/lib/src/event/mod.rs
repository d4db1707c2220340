//! Event bus: per-node subscriptions with parent-bubbling dispatch.
//!
//! Every field node owns a registry of listeners keyed by event kind.
//! Publishing an event invokes the target node's matching listeners (exact
//! kind plus the [`ANY`] wildcard), then bubbles the same event to the
//! parent's listeners, recursively to the root.
//!
//! The propagation algorithm publishes [`CHANGE`] events; plugins are free
//! to publish their own kinds through [`Field::publish`].
//!
//! # Dispatch Guarantees
//!
//! - Listeners run synchronously on the caller's stack, after the value
//!   graph is fully committed.
//! - For one write, each generated event bubbles completely before the next
//!   event is published.
//! - A failing listener never prevents other listeners from running; the
//!   first error of a dispatch pass is surfaced to the caller of the write,
//!   the rest are logged.
//! - Listeners may re-enter the tree, including with new writes; a
//!   re-entrant write runs to completion (its own dispatch included) before
//!   the outer dispatch continues.

use std::{
    cell::Cell,
    fmt,
    rc::{Rc, Weak},
};

pub mod errors;

pub use errors::EventError;

use crate::{
    Result,
    field::{Field, SubscriberEntry, TreeShared, propagate},
    value::Value,
};

/// Event kind published by the propagation algorithm for every visited node.
pub const CHANGE: &str = "change";

/// Wildcard kind: a listener registered for `ANY` receives every event
/// published at (or bubbling through) its node.
pub const ANY: &str = "*";

/// Listener callback signature.
pub type Listener = dyn Fn(&FieldEvent) -> Result<()>;

/// An event delivered to field listeners.
///
/// For change events the payload is the target's previous value;
/// `related_target` is the field whose write produced the event, or `None`
/// when the target is itself the writer.
#[derive(Clone)]
pub struct FieldEvent {
    kind: String,
    target: Field,
    related_target: Option<Field>,
    previous_value: Value,
}

impl FieldEvent {
    /// Creates an event. Plugins use this to publish custom kinds.
    pub fn new(
        kind: impl Into<String>,
        target: Field,
        related_target: Option<Field>,
        previous_value: Value,
    ) -> Self {
        Self {
            kind: kind.into(),
            target,
            related_target,
            previous_value,
        }
    }

    /// The event kind (e.g. [`CHANGE`]).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The field where the change occurred. Stays the same while the event
    /// bubbles through ancestors.
    pub fn target(&self) -> &Field {
        &self.target
    }

    /// The field whose write triggered this event, when that is a different
    /// field than the target.
    pub fn related_target(&self) -> Option<&Field> {
        self.related_target.as_ref()
    }

    /// The target's value before the change.
    pub fn previous_value(&self) -> &Value {
        &self.previous_value
    }
}

impl fmt::Debug for FieldEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldEvent")
            .field("kind", &self.kind)
            .field("target", &self.target.path().to_string())
            .field("previous_value", &self.previous_value)
            .finish()
    }
}

/// Guard for one listener registration.
///
/// Dropping the guard unsubscribes the listener. Call
/// [`Subscription::detach`] to keep the listener registered for the life of
/// the tree, or [`Subscription::unsubscribe`] to remove it explicitly
/// (idempotent).
pub struct Subscription {
    shared: Weak<TreeShared>,
    node_id: usize,
    subscriber_id: u64,
    active: Cell<bool>,
}

impl Subscription {
    pub(crate) fn new(shared: Weak<TreeShared>, node_id: usize, subscriber_id: u64) -> Self {
        Self {
            shared,
            node_id,
            subscriber_id,
            active: Cell::new(true),
        }
    }

    /// Removes the listener. Calling this twice is a no-op.
    pub fn unsubscribe(&self) {
        if !self.active.replace(false) {
            return;
        }
        if let Some(shared) = self.shared.upgrade() {
            shared.remove_subscriber(self.node_id, self.subscriber_id);
        }
    }

    /// Consumes the guard without unsubscribing: the listener stays
    /// registered as long as the tree lives.
    pub fn detach(self) {
        self.active.set(false);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("node_id", &self.node_id)
            .field("subscriber_id", &self.subscriber_id)
            .field("active", &self.active.get())
            .finish()
    }
}

impl Field {
    /// Registers a wildcard listener invoked for every event published at or
    /// bubbling through this node.
    ///
    /// ```
    /// use std::{cell::Cell, rc::Rc};
    /// use fieldtree::{map, new_tree};
    ///
    /// let root = new_tree(map! { "a" => 1 })?;
    /// let seen = Rc::new(Cell::new(0));
    ///
    /// let counter = Rc::clone(&seen);
    /// let _sub = root.subscribe(move |_event| {
    ///     counter.set(counter.get() + 1);
    ///     Ok(())
    /// });
    ///
    /// root.at("a")?.set_value(2)?;
    /// assert!(seen.get() > 0);
    /// # Ok::<(), fieldtree::Error>(())
    /// ```
    pub fn subscribe(&self, listener: impl Fn(&FieldEvent) -> Result<()> + 'static) -> Subscription {
        self.add_subscriber(ANY.to_string(), Rc::new(listener))
    }

    /// Registers a listener for one event kind.
    pub fn on(
        &self,
        kind: impl Into<String>,
        listener: impl Fn(&FieldEvent) -> Result<()> + 'static,
    ) -> Subscription {
        self.add_subscriber(kind.into(), Rc::new(listener))
    }

    fn add_subscriber(&self, kind: String, listener: Rc<Listener>) -> Subscription {
        let shared = self.shared();
        let subscriber_id = shared.next_subscriber_id();
        {
            let mut nodes = shared.nodes.borrow_mut();
            nodes[self.node_id()].subscribers.push(SubscriberEntry {
                id: subscriber_id,
                kind,
                listener,
            });
        }
        Subscription::new(Rc::downgrade(shared), self.node_id(), subscriber_id)
    }

    /// Publishes an event at this node, bubbling it to every ancestor.
    ///
    /// All matching listeners run even when some fail; the first listener
    /// error is returned after the pass completes.
    pub fn publish(&self, event: FieldEvent) -> Result<()> {
        let mut first_error = None;
        propagate::bubble(self.shared(), self.node_id(), &event, &mut first_error);
        match first_error {
            None => Ok(()),
            Some(error) => Err(error),
        }
    }
}
