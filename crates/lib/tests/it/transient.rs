//! Tests for transient buffering: local edits, shielded subtrees, flushing.

use fieldtree::{Value, map, new_tree, path};

use crate::helpers::{new_log, record};

#[test]
fn form_draft_scenario() {
    // A form edits its fields transiently and commits on "submit".
    let root = new_tree(map! {
        "profile" => map! { "name" => "Alice", "email" => "alice@example.com" },
    })
    .unwrap();
    let name = root.at_path(path!("profile.name")).unwrap();
    let email = root.at_path(path!("profile.email")).unwrap();

    name.set_transient_value("Bob").unwrap();
    email.set_transient_value("bob@example.com").unwrap();

    // Both edits are buffered; the committed state is untouched.
    let committed = root.value();
    let profile = committed.as_map().unwrap().get("profile").unwrap();
    assert_eq!(profile.as_map().unwrap().get("name").unwrap(), "Alice");
    assert_eq!(name.value(), "Bob");
    assert_eq!(email.value(), "bob@example.com");

    // Submit: flush both fields.
    name.flush_transient().unwrap();
    email.flush_transient().unwrap();

    assert!(!name.is_transient());
    assert!(!email.is_transient());
    let committed = root.value();
    let profile = committed.as_map().unwrap().get("profile").unwrap();
    assert_eq!(profile.as_map().unwrap().get("name").unwrap(), "Bob");
    assert_eq!(
        profile.as_map().unwrap().get("email").unwrap(),
        "bob@example.com"
    );
}

#[test]
fn transient_write_propagates_into_its_own_subtree() {
    let root = new_tree(map! { "form" => map! { "a" => 1, "b" => 2 } }).unwrap();
    let form = root.at("form").unwrap();
    let a = form.at("a").unwrap();
    let b = form.at("b").unwrap();

    form.set_transient_value(map! { "a" => 10, "b" => 2 }).unwrap();

    assert_eq!(a.value(), 10);
    // Unchanged branch inside the buffered subtree is still pruned.
    assert_eq!(b.value(), 2);
}

#[test]
fn transient_events_fire_inside_the_subtree_only() {
    let root = new_tree(map! { "form" => map! { "a" => 1 } }).unwrap();
    let form = root.at("form").unwrap();
    let a = form.at("a").unwrap();

    let log = new_log();
    let _root_sub = record(&root, "root", &log);
    let _a_sub = record(&a, "a", &log);

    form.set_transient_value(map! { "a" => 5 }).unwrap();

    let entries = log.borrow().clone();
    // The form- and a-target events bubble through the root listener (the
    // value graph above stays untouched, but bubbling still climbs handles).
    assert!(entries.iter().all(|line| !line.contains("target= ")));
    assert!(entries.iter().any(|line| line.starts_with("a: ")));
    assert!(
        entries
            .iter()
            .any(|line| line.starts_with("root: ") && line.contains("target=form.a"))
    );
}

#[test]
fn nested_transients_flush_one_level_at_a_time() {
    let root = new_tree(map! { "outer" => map! { "inner" => map! { "x" => 1 } } }).unwrap();
    let outer = root.at("outer").unwrap();
    let inner = outer.at("inner").unwrap();
    let x = inner.at("x").unwrap();

    inner.set_transient_value(map! { "x" => 1 }).unwrap();
    x.set_value(2).unwrap();

    // The x write was absorbed by the transient inner node.
    assert_eq!(x.value(), 2);
    let committed = root.value();
    assert_eq!(
        *committed
            .as_map()
            .unwrap()
            .get("outer")
            .unwrap()
            .as_map()
            .unwrap()
            .get("inner")
            .unwrap()
            .as_map()
            .unwrap()
            .get("x")
            .unwrap(),
        1
    );

    inner.flush_transient().unwrap();

    let committed = root.value();
    assert_eq!(
        *committed
            .as_map()
            .unwrap()
            .get("outer")
            .unwrap()
            .as_map()
            .unwrap()
            .get("inner")
            .unwrap()
            .as_map()
            .unwrap()
            .get("x")
            .unwrap(),
        2
    );
}

#[test]
fn ancestor_writes_do_not_disturb_buffered_subtrees() {
    let root = new_tree(map! { "a" => map! { "x" => 1 }, "b" => 2 }).unwrap();
    let a = root.at("a").unwrap();
    let x = a.at("x").unwrap();

    a.set_transient_value(map! { "x" => 100 }).unwrap();
    root.set_value(map! { "a" => map! { "x" => 7 }, "b" => 8 }).unwrap();

    // The buffered subtree kept its edit.
    assert_eq!(x.value(), 100);
    assert!(a.is_transient());

    // Flushing now overwrites the ancestor's version with the buffer.
    a.flush_transient().unwrap();
    let committed = root.value();
    assert_eq!(
        *committed
            .as_map()
            .unwrap()
            .get("a")
            .unwrap()
            .as_map()
            .unwrap()
            .get("x")
            .unwrap(),
        100
    );
    assert_eq!(*committed.as_map().unwrap().get("b").unwrap(), 8);
}

#[test]
fn transient_null_buffer_flushes_cleanly() {
    let root = new_tree(map! { "a" => 1 }).unwrap();
    let a = root.at("a").unwrap();

    a.set_transient_value(Value::Null).unwrap();
    a.flush_transient().unwrap();

    assert_eq!(a.value(), Value::Null);
    assert_eq!(*root.value().as_map().unwrap().get("a").unwrap(), Value::Null);
}
