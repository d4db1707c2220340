use std::{cell::RefCell, rc::Rc};

use fieldtree::{Field, Subscription, list, map, new_tree};

/// Shared log that listeners append formatted entries to.
pub type EventLog = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Subscribes a wildcard listener on `field` that appends one line per event:
/// `<label>: <kind> target=<path>` (plus ` from=<path>` when the event
/// carries a related target).
pub fn record(field: &Field, label: &str, log: &EventLog) -> Subscription {
    let log = Rc::clone(log);
    let label = label.to_string();
    field.subscribe(move |event| {
        let mut line = format!("{label}: {} target={}", event.kind(), event.target().path());
        if let Some(related) = event.related_target() {
            line.push_str(&format!(" from={}", related.path()));
        }
        log.borrow_mut().push(line);
        Ok(())
    })
}

/// A small user-profile tree used across the suite.
pub fn profile_tree() -> Field {
    new_tree(map! {
        "user" => map! {
            "name" => "Alice",
            "age" => 30,
            "tags" => list!["admin", "staff"],
        },
        "settings" => map! {
            "theme" => "dark",
        },
    })
    .expect("plain tree construction cannot fail")
}
