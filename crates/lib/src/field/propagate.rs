//! The bidirectional value-propagation algorithm.
//!
//! A write commits in two walks, then dispatches events:
//!
//! 1. **Upward**: from the writer, each ancestor's value is rebuilt through
//!    `accessor.set` using the child's key, stopping at the root or at the
//!    first transient ancestor (which absorbs the edit without passing it
//!    on). The highest node reached is the *propagation root*.
//! 2. **Downward**: from the propagation root, every previously derived,
//!    non-transient child is re-derived through `accessor.get`. A branch
//!    whose re-derived value is unchanged is skipped, except along the path
//!    to the original writer, which is always visited so the writer itself
//!    is notified even when its computed value did not change.
//! 3. **Dispatch**: one change event per visited node, generated in
//!    downward-walk order, each fully bubbled to its ancestors before the
//!    next is published. Dispatch starts only after the value graph is
//!    consistent, so listeners observe the committed state and may re-enter
//!    with their own writes.

use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::{
    Error, Result,
    event::{self, FieldEvent},
    value::Value,
};

use super::{Field, TreeShared};

/// Commits a persistent (`transient == false`) or transient write at
/// `field`, then dispatches the resulting events.
///
/// Returns the first listener error, after all listeners have run; the value
/// graph is committed either way.
pub(crate) fn write(field: &Field, new_value: Value, transient: bool) -> Result<()> {
    let shared = field.shared();
    let origin = field.node_id();

    let events = {
        let mut nodes = shared.nodes.borrow_mut();

        // Rewriting the same value in the same mode is a pure no-op.
        {
            let node = &mut nodes[origin];
            if node.value == new_value && node.transient == transient {
                return Ok(());
            }
            node.transient = transient;
        }

        let accessor = Rc::clone(&shared.accessor);

        // Upward walk. Transient writes never leave the writer.
        let mut top = origin;
        let mut top_value = new_value;
        if !transient {
            while let Some(parent_id) = nodes[top].parent {
                if nodes[top].transient {
                    // A transient ancestor absorbs the edit locally.
                    break;
                }
                let Some(key) = nodes[top].key.clone() else {
                    break;
                };
                top_value = accessor.set(&nodes[parent_id].value, &key, top_value);
                top = parent_id;
            }
        }
        debug!(
            origin,
            propagation_root = top,
            transient,
            "committing write"
        );

        // The path from the propagation root to the writer is exempt from
        // unchanged-branch pruning.
        let mut writer_path = vec![origin];
        let mut cursor = origin;
        while cursor != top {
            match nodes[cursor].parent {
                Some(parent_id) => {
                    writer_path.push(parent_id);
                    cursor = parent_id;
                }
                None => break,
            }
        }

        // Downward walk: depth-first from the propagation root, recording
        // (node, previous value) for every visited node.
        let mut events: Vec<(usize, Value)> = Vec::new();
        let mut stack = vec![(top, top_value)];
        while let Some((id, value)) = stack.pop() {
            let previous = std::mem::replace(&mut nodes[id].value, value);
            events.push((id, previous));

            // Reverse so the stack pops children in registration order.
            let children = nodes[id].children.clone();
            for (key, child_id) in children.into_iter().rev() {
                if nodes[child_id].transient {
                    trace!(child = child_id, "skipping transient subtree");
                    continue;
                }
                let derived = accessor
                    .get(&nodes[id].value, &key)
                    .unwrap_or(Value::Null);
                if derived == nodes[child_id].value && !writer_path.contains(&child_id) {
                    trace!(child = child_id, "pruning unchanged subtree");
                    continue;
                }
                stack.push((child_id, derived));
            }
        }
        events
    };

    dispatch(field, origin, events)
}

/// Publishes the collected change events, each bubbling to the root before
/// the next one starts. All listeners run even when some fail; the first
/// failure is returned, the rest are logged.
fn dispatch(field: &Field, origin: usize, events: Vec<(usize, Value)>) -> Result<()> {
    let shared = field.shared();
    let mut first_error: Option<Error> = None;

    for (node_id, previous) in events {
        let target = Field::from_parts(Rc::clone(shared), node_id);
        let related_target = (node_id != origin)
            .then(|| Field::from_parts(Rc::clone(shared), origin));
        let event = FieldEvent::new(event::CHANGE, target, related_target, previous);
        bubble(shared, node_id, &event, &mut first_error);
    }

    match first_error {
        None => Ok(()),
        Some(error) => Err(error),
    }
}

/// Invokes the listeners for `event` at `target_id` and every ancestor up to
/// the root.
///
/// Listener lists are snapshotted before each hop and no arena borrow is
/// held while a listener runs, so listeners may freely re-enter the tree
/// (including starting new writes, which run to completion before this
/// dispatch continues).
pub(crate) fn bubble(
    shared: &Rc<TreeShared>,
    target_id: usize,
    event: &FieldEvent,
    first_error: &mut Option<Error>,
) {
    let mut current = Some(target_id);
    while let Some(id) = current {
        let (listeners, parent) = {
            let nodes = shared.nodes.borrow();
            let node = &nodes[id];
            let listeners: Vec<_> = node
                .subscribers
                .iter()
                .filter(|entry| entry.kind == event.kind() || entry.kind == event::ANY)
                .map(|entry| Rc::clone(&entry.listener))
                .collect();
            (listeners, node.parent)
        };

        for listener in listeners {
            if let Err(error) = listener(event) {
                if first_error.is_none() {
                    *first_error = Some(error);
                } else {
                    warn!(kind = event.kind(), error = %error, "additional listener error (only the first is surfaced)");
                }
            }
        }

        current = parent;
    }
}
