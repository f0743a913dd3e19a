//! Helpers for the open-ended part of a record.
//!
//! Pets and orders have a typed core, but clients may send any other fields
//! and expect them back verbatim. Those land in an extension [`Document`]
//! that is flattened into the JSON representation.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::ModelError;

pub type Document = Map<String, Value>;

/// Keys owned by the server on every collection.
pub const SERVER_FIELDS: [&str; 2] = ["_id", "date"];

/// Request bodies must be JSON objects.
pub fn into_object(body: Value) -> Result<Document, ModelError> {
    match body {
        Value::Object(map) => Ok(map),
        other => Err(ModelError::validation(format!(
            "request body must be a JSON object, got {}",
            kind(&other)
        ))),
    }
}

pub fn strip_keys(doc: &mut Document, keys: &[&str]) {
    for key in keys {
        doc.remove(*key);
    }
}

/// Partial updates may not touch `_id` or `date`.
pub fn reject_server_fields(doc: &Document) -> Result<(), ModelError> {
    match SERVER_FIELDS.iter().find(|k| doc.contains_key(**k)) {
        Some(key) => Err(ModelError::validation(format!("{key} is managed by the server and cannot be updated"))),
        None => Ok(()),
    }
}

/// Extension map stored in a JSON column; anything that is not an object reads back empty.
pub fn from_column(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

/// Merge `patch` into `target`; true if any value changed.
pub fn merge_extra(target: &mut Document, patch: &Document) -> bool {
    let mut changed = false;
    for (k, v) in patch {
        if target.get(k) != Some(v) {
            target.insert(k.clone(), v.clone());
            changed = true;
        }
    }
    changed
}

pub fn set_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Remove `key` from a patch body.
/// `None` = absent, `Some(None)` = explicit null, `Some(Some(v))` = value.
pub fn take_field<T>(
    doc: &mut Document,
    key: &str,
    parse: fn(&str, Value) -> Result<T, ModelError>,
) -> Result<Option<Option<T>>, ModelError> {
    match doc.remove(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(v) => parse(key, v).map(|t| Some(Some(t))),
    }
}

/// Like [`take_field`] for fields that must always hold a value.
pub fn take_required<T>(
    doc: &mut Document,
    key: &str,
    parse: fn(&str, Value) -> Result<T, ModelError>,
) -> Result<Option<T>, ModelError> {
    match take_field(doc, key, parse)? {
        None => Ok(None),
        Some(None) => Err(ModelError::validation(format!("{key} cannot be null"))),
        Some(Some(v)) => Ok(Some(v)),
    }
}

pub fn as_string(key: &str, value: Value) -> Result<String, ModelError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(type_error(key, "a string", &other)),
    }
}

/// Strings for fields that may never be blank.
pub fn as_non_blank(key: &str, value: Value) -> Result<String, ModelError> {
    let s = as_string(key, value)?;
    if s.trim().is_empty() {
        return Err(ModelError::validation(format!("{key} cannot be empty")));
    }
    Ok(s)
}

pub fn as_f64(key: &str, value: Value) -> Result<f64, ModelError> {
    match value.as_f64() {
        Some(n) => Ok(n),
        None => Err(type_error(key, "a number", &value)),
    }
}

pub fn as_i64(key: &str, value: Value) -> Result<i64, ModelError> {
    match value.as_i64() {
        Some(n) => Ok(n),
        None => Err(type_error(key, "an integer", &value)),
    }
}

pub fn as_uuid(key: &str, value: Value) -> Result<Uuid, ModelError> {
    let s = as_string(key, value)?;
    Uuid::parse_str(s.trim()).map_err(|_| ModelError::validation(format!("{key} must be a valid id")))
}

fn type_error(key: &str, expected: &str, got: &Value) -> ModelError {
    ModelError::validation(format!("{key} must be {expected}, got {}", kind(got)))
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Treat blank strings as "not supplied".
pub fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}
