//! Tests for subscriptions, bubbling, and dispatch guarantees.

use std::{cell::Cell, rc::Rc};

use fieldtree::{
    FieldEvent, Value,
    event::{self, EventError},
    map, new_tree, path,
};

use crate::helpers::{new_log, profile_tree, record};

#[test]
fn change_events_bubble_to_every_ancestor() {
    let root = profile_tree();
    let user = root.at("user").unwrap();
    let name = user.at("name").unwrap();

    let log = new_log();
    let _root_sub = record(&root, "root", &log);
    let _user_sub = record(&user, "user", &log);
    let _name_sub = record(&name, "name", &log);

    name.set_value("Bob").unwrap();

    let entries = log.borrow().clone();
    // The name-target event reaches all three listeners.
    assert_eq!(
        entries
            .iter()
            .filter(|line| line.contains("target=user.name"))
            .count(),
        3
    );
    // The root-target event reaches only the root listener.
    assert_eq!(
        entries
            .iter()
            .filter(|line| line.ends_with("target=") || line.contains("target= "))
            .count(),
        1
    );
}

#[test]
fn each_event_bubbles_fully_before_the_next() {
    let root = new_tree(map! { "a" => map! { "b" => 1 } }).unwrap();
    let a = root.at("a").unwrap();
    let b = a.at("b").unwrap();

    let log = new_log();
    let _root_sub = record(&root, "root", &log);
    let _a_sub = record(&a, "a", &log);

    b.set_value(2).unwrap();

    // Per event, listeners fire target-first then upward; events themselves
    // arrive top-down. So the "a"-target event hits the a listener before
    // the root listener, and both before anything about "a.b".
    let entries = log.borrow().clone();
    let expected = vec![
        "root: change target= from=a.b".to_string(),
        "a: change target=a from=a.b".to_string(),
        "root: change target=a from=a.b".to_string(),
        "a: change target=a.b".to_string(),
        "root: change target=a.b".to_string(),
    ];
    assert_eq!(entries, expected);
}

#[test]
fn related_target_is_the_writer() {
    let root = profile_tree();
    let name = root.at_path(path!("user.name")).unwrap();

    let writer = name.clone();
    let _sub = root.subscribe(move |event| {
        if event.target().is_root() {
            assert_eq!(event.related_target(), Some(&writer));
        }
        if *event.target() == writer {
            assert!(event.related_target().is_none());
        }
        Ok(())
    });

    name.set_value("Bob").unwrap();
}

#[test]
fn previous_value_carries_the_pre_write_state() {
    let root = new_tree(map! { "a" => 1 }).unwrap();
    let a = root.at("a").unwrap();

    let seen = Rc::new(Cell::new(false));
    let flag = Rc::clone(&seen);
    let _sub = a.subscribe(move |event| {
        assert_eq!(*event.previous_value(), 1);
        assert_eq!(event.target().value(), 2);
        flag.set(true);
        Ok(())
    });

    a.set_value(2).unwrap();
    assert!(seen.get());
}

#[test]
fn on_filters_by_kind() {
    let root = new_tree(1).unwrap();

    let changes = Rc::new(Cell::new(0));
    let customs = Rc::new(Cell::new(0));

    let counter = Rc::clone(&changes);
    let _change_sub = root.on(event::CHANGE, move |_| {
        counter.set(counter.get() + 1);
        Ok(())
    });
    let counter = Rc::clone(&customs);
    let _custom_sub = root.on("validated", move |_| {
        counter.set(counter.get() + 1);
        Ok(())
    });

    root.set_value(2).unwrap();
    assert_eq!(changes.get(), 1);
    assert_eq!(customs.get(), 0);

    root.publish(FieldEvent::new("validated", root.clone(), None, Value::Null))
        .unwrap();
    assert_eq!(changes.get(), 1);
    assert_eq!(customs.get(), 1);
}

#[test]
fn published_events_bubble_like_change_events() {
    let root = new_tree(map! { "a" => 1 }).unwrap();
    let a = root.at("a").unwrap();

    let seen = Rc::new(Cell::new(0));
    let counter = Rc::clone(&seen);
    let _sub = root.on("touched", move |event| {
        assert_eq!(event.kind(), "touched");
        counter.set(counter.get() + 1);
        Ok(())
    });

    a.publish(FieldEvent::new("touched", a.clone(), None, Value::Null))
        .unwrap();
    assert_eq!(seen.get(), 1);
}

#[test]
fn all_listeners_run_and_first_error_is_surfaced() {
    let root = new_tree(1).unwrap();

    let ran = Rc::new(Cell::new(0));

    let counter = Rc::clone(&ran);
    let _first = root.subscribe(move |_| {
        counter.set(counter.get() + 1);
        Err(EventError::ListenerFailed {
            kind: event::CHANGE.to_string(),
            reason: "first".to_string(),
        }
        .into())
    });
    let counter = Rc::clone(&ran);
    let _second = root.subscribe(move |_| {
        counter.set(counter.get() + 1);
        Err(EventError::ListenerFailed {
            kind: event::CHANGE.to_string(),
            reason: "second".to_string(),
        }
        .into())
    });
    let counter = Rc::clone(&ran);
    let _third = root.subscribe(move |_| {
        counter.set(counter.get() + 1);
        Ok(())
    });

    let error = root.set_value(2).unwrap_err();
    assert_eq!(ran.get(), 3);
    assert!(error.is_listener_error());
    assert!(error.to_string().contains("first"));

    // The write committed regardless of the listener failures.
    assert_eq!(root.value(), 2);
}

#[test]
fn listeners_may_write_reentrantly() {
    let root = new_tree(map! { "celsius" => 0, "fahrenheit" => 32 }).unwrap();
    let celsius = root.at("celsius").unwrap();
    let fahrenheit = root.at("fahrenheit").unwrap();

    // Keep fahrenheit in sync from a celsius listener.
    let mirror = fahrenheit.clone();
    let _sub = celsius
        .on(event::CHANGE, move |event| {
            let degrees = event.target().value().as_int().unwrap_or(0);
            mirror.set_value(degrees * 9 / 5 + 32)
        });

    celsius.set_value(100).unwrap();

    assert_eq!(celsius.value(), 100);
    assert_eq!(fahrenheit.value(), 212);
}

#[test]
fn dropping_the_subscription_unsubscribes() {
    let root = new_tree(1).unwrap();

    let seen = Rc::new(Cell::new(0));
    let counter = Rc::clone(&seen);
    let sub = root.subscribe(move |_| {
        counter.set(counter.get() + 1);
        Ok(())
    });

    root.set_value(2).unwrap();
    assert_eq!(seen.get(), 1);

    drop(sub);
    root.set_value(3).unwrap();
    assert_eq!(seen.get(), 1);
}

#[test]
fn unsubscribe_is_idempotent() {
    let root = new_tree(1).unwrap();

    let seen = Rc::new(Cell::new(0));
    let counter = Rc::clone(&seen);
    let sub = root.subscribe(move |_| {
        counter.set(counter.get() + 1);
        Ok(())
    });

    sub.unsubscribe();
    sub.unsubscribe();
    drop(sub);

    root.set_value(2).unwrap();
    assert_eq!(seen.get(), 0);
}

#[test]
fn detached_subscriptions_outlive_the_guard() {
    let root = new_tree(1).unwrap();

    let seen = Rc::new(Cell::new(0));
    let counter = Rc::clone(&seen);
    root.subscribe(move |_| {
        counter.set(counter.get() + 1);
        Ok(())
    })
    .detach();

    root.set_value(2).unwrap();
    root.set_value(3).unwrap();
    assert_eq!(seen.get(), 2);
}

#[test]
fn unsubscribing_during_dispatch_affects_later_events_only() {
    let root = new_tree(map! { "a" => 1, "b" => 2 }).unwrap();
    // Derive both children so the write below generates three events.
    root.at("a").unwrap();
    root.at("b").unwrap();

    // The listener unsubscribes itself on first delivery; the snapshot taken
    // for the current event still runs it exactly once.
    let seen = Rc::new(Cell::new(0));
    let slot: Rc<std::cell::RefCell<Option<fieldtree::Subscription>>> =
        Rc::new(std::cell::RefCell::new(None));

    let counter = Rc::clone(&seen);
    let guard = Rc::clone(&slot);
    let sub = root.subscribe(move |_| {
        counter.set(counter.get() + 1);
        if let Some(sub) = guard.borrow_mut().take() {
            sub.unsubscribe();
        }
        Ok(())
    });
    *slot.borrow_mut() = Some(sub);

    root.set_value(map! { "a" => 10, "b" => 20 }).unwrap();
    assert_eq!(seen.get(), 1);
}
