//! Tests for accessors driving derivation and updates, including a custom
//! accessor installed through the builder.

use fieldtree::{
    Accessor, TreeBuilder, Value,
    value::{Key, Set},
    list, map, new_tree,
};

/// Map lookups fall back to a case-insensitive match when the exact key is
/// absent; writes normalize the key to lowercase.
struct FoldedAccessor;

impl Accessor for FoldedAccessor {
    fn get(&self, container: &Value, key: &Key) -> Option<Value> {
        let map = container.as_map()?;
        let text = key.to_text();
        if let Some(value) = map.get(&text) {
            return Some(value.clone());
        }
        map.iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&text))
            .map(|(_, value)| value.clone())
    }

    fn set(&self, container: &Value, key: &Key, value: Value) -> Value {
        let folded = key.to_text().to_ascii_lowercase();
        match container.as_map() {
            Some(map) => {
                if map.get(&folded) == Some(&value) {
                    return container.clone();
                }
                let mut updated = map.clone();
                updated.insert(folded, value);
                Value::Map(updated)
            }
            None => {
                let mut map = fieldtree::value::Map::new();
                map.insert(folded, value);
                Value::Map(map)
            }
        }
    }
}

#[test]
fn custom_accessor_drives_derivation() {
    let root = TreeBuilder::new()
        .accessor(FoldedAccessor)
        .build(map! { "Name" => "Alice" })
        .unwrap();

    // The exact spelling is absent, but the folded lookup finds it.
    assert_eq!(root.at("name").unwrap().value(), "Alice");
}

#[test]
fn custom_accessor_drives_upward_writes() {
    let root = TreeBuilder::new()
        .accessor(FoldedAccessor)
        .build(map! {})
        .unwrap();

    root.at("NAME").unwrap().set_value("Bob").unwrap();

    let top = root.value();
    assert_eq!(top.as_map().unwrap().get("name").unwrap(), "Bob");
}

#[test]
fn default_accessor_indexes_maps_by_decimal_text() {
    let root = new_tree(map! { "0" => "zero" }).unwrap();
    assert_eq!(root.at(0usize).unwrap().value(), "zero");
}

#[test]
fn default_accessor_rejects_text_keys_on_lists() {
    let root = new_tree(map! { "items" => list![1, 2] }).unwrap();
    let child = root.at("items").unwrap().at("first").unwrap();
    assert_eq!(child.value(), Value::Null);
}

#[test]
fn set_elements_are_addressed_by_iteration_order() {
    let set = Set::from(vec![Value::from("a"), Value::from("b"), Value::from("c")]);
    let root = new_tree(map! { "tags" => set }).unwrap();

    let second = root.at("tags").unwrap().at(1usize).unwrap();
    assert_eq!(second.value(), "b");

    second.set_value("z").unwrap();
    let tags = root.at("tags").unwrap().value();
    let tags = tags.as_set().unwrap();
    assert_eq!(tags.index_of(&Value::from("z")), Some(1));
}

#[test]
fn replacing_a_set_element_with_a_duplicate_collapses_it() {
    let set = Set::from(vec![Value::from("a"), Value::from("b")]);
    let root = new_tree(map! { "tags" => set }).unwrap();

    // Rewriting "b" as "a" leaves a single "a".
    root.at("tags").unwrap().at(1usize).unwrap().set_value("a").unwrap();

    let tags = root.at("tags").unwrap().value();
    let tags = tags.as_set().unwrap();
    assert_eq!(tags.len(), 1);
    assert!(tags.contains(&Value::from("a")));
}
