//! JSON interop for [`Value`].
//!
//! Conversions between [`Value`] and [`serde_json::Value`] for exchanging
//! state with JSON-speaking collaborators. Sets become arrays (iteration
//! order preserved); non-finite floats become `null`; JSON numbers become
//! [`Value::Int`] when they fit an `i64`, otherwise [`Value::Float`].

use super::{List, Map, Set, Value};

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect::<Map>(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(n) => serde_json::Value::from(n),
            Value::Float(x) => serde_json::Number::from_f64(x)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s),
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), serde_json::Value::from(value.clone())))
                    .collect(),
            ),
            Value::List(list) => serde_json::Value::Array(
                list.iter()
                    .map(|item| serde_json::Value::from(item.clone()))
                    .collect(),
            ),
            Value::Set(set) => serde_json::Value::Array(
                set.iter()
                    .map(|item| serde_json::Value::from(item.clone()))
                    .collect(),
            ),
        }
    }
}

impl Value {
    /// Parses a JSON string into a `Value`.
    ///
    /// Objects become maps and arrays become lists; there is no JSON spelling
    /// for sets.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fieldtree::value::Value;
    /// let value = Value::from_json_str(r#"{"name": "Alice", "age": 30}"#).unwrap();
    /// let map = value.as_map().unwrap();
    /// assert_eq!(map.get("age").and_then(|v| v.as_int()), Some(30));
    /// ```
    pub fn from_json_str(json: &str) -> crate::Result<Value> {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        Ok(Value::from(parsed))
    }
}
