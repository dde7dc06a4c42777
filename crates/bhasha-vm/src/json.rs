//! `json_parse`/`json_stringify` conversion between [`serde_json::Value`] and
//! [`bhasha_value::Value`] (SPEC_FULL.md §6.5.1).

use std::rc::Rc;

use bhasha_value::{HashValue, Value};
use indexmap::IndexMap;

pub fn parse(text: &str) -> Result<Value, String> {
    let parsed: serde_json::Value =
        serde_json::from_str(text).map_err(|e| format!("json_parse: {e}"))?;
    Ok(from_json(parsed))
}

fn from_json(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else {
                Value::Double(n.as_f64().unwrap_or(0.0))
            }
        }
        serde_json::Value::String(s) => Value::String(Rc::from(s.as_str())),
        serde_json::Value::Array(items) => {
            Value::Array(Rc::new(items.into_iter().map(from_json).collect()))
        }
        serde_json::Value::Object(map) => {
            let mut entries = IndexMap::new();
            for (key, value) in map {
                let key_value = Value::String(Rc::from(key.as_str()));
                let hash_key = key_value
                    .hash_key()
                    .expect("a String value is always hashable");
                entries.insert(hash_key, (key_value, from_json(value)));
            }
            Value::Hash(Rc::new(HashValue(entries)))
        }
    }
}

/// Always succeeds: a value with no natural JSON shape (a closure, a
/// built-in, ...) renders as its `inspect()` text, same as `to_string`.
pub fn stringify(value: &Value) -> String {
    to_json(value).to_string()
}

fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Integer(n) | Value::Long(n) => serde_json::Value::from(*n),
        Value::Byte(n) => serde_json::Value::from(*n),
        Value::Short(n) => serde_json::Value::from(*n),
        Value::Int(n) => serde_json::Value::from(*n),
        Value::Float(n) => serde_json::Number::from_f64(*n as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Double(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Char(c) => serde_json::Value::String(c.to_string()),
        Value::String(s) => serde_json::Value::String(s.to_string()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Hash(map) => {
            let object = map
                .0
                .values()
                .map(|(k, v)| (k.inspect(), to_json(v)))
                .collect();
            serde_json::Value::Object(object)
        }
        other => serde_json::Value::String(other.inspect()),
    }
}
