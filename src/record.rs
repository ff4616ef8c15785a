//! Record access: dotted-path lookup and scalar field discovery.
use crate::error::{FuzzrankError, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// A record the engine can score.
///
/// The engine knows nothing about field semantics; it only asks for
/// stringified values at dotted paths and, when no field list is configured,
/// for the paths worth scanning.
pub trait Searchable {
    /// Stable unique identifier.
    fn record_id(&self) -> String;

    /// Stringified scalar at `path`, `None` when missing, null or not a scalar.
    fn field_value(&self, path: &str) -> Option<String>;

    /// Dotted paths of every string or number leaf, in document order.
    fn scalar_field_paths(&self) -> Vec<String>;
}

impl Searchable for Value {
    fn record_id(&self) -> String {
        self.get("id")
            .and_then(stringify_scalar)
            .unwrap_or_default()
    }

    fn field_value(&self, path: &str) -> Option<String> {
        resolve_path(self, path).and_then(stringify_scalar)
    }

    fn scalar_field_paths(&self) -> Vec<String> {
        discover_scalar_paths(self)
    }
}

/// Walks `path` segment by segment. Missing keys, empty segments and
/// non-object intermediates resolve to `None`.
pub fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        if segment.is_empty() {
            return None;
        }
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Renders a scalar as text. Arrays of scalars are joined with `,`.
pub fn stringify_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Object(_) => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::Array(_) | Value::Object(_) => None,
                    other => stringify_scalar(other),
                })
                .collect();
            Some(parts.join(","))
        }
    }
}

pub fn discover_scalar_paths(value: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    if let Value::Object(map) = value {
        collect_paths(map, "", &mut paths);
    }
    paths
}

fn collect_paths(map: &serde_json::Map<String, Value>, prefix: &str, out: &mut Vec<String>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::String(_) | Value::Number(_) => out.push(path),
            Value::Object(nested) => collect_paths(nested, &path, out),
            _ => {}
        }
    }
}

/// Loads records from a JSON file holding either an array or an object with
/// an `items` array.
pub fn load_records(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&content)?;
    match document {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(FuzzrankError::InvalidRecords {
                path: path.to_path_buf(),
                reason: "expected an array or an object with an `items` array".to_string(),
            }),
        },
        _ => Err(FuzzrankError::InvalidRecords {
            path: path.to_path_buf(),
            reason: "top-level value is not an array".to_string(),
        }),
    }
}
