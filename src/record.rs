//! Configuration records.
//!
//! A configuration record is a nested string-keyed mapping of plain data
//! values, the in-memory form of one block of an experiment config. Records
//! are what the merge, registry, and build layers all operate on.

use serde_json::{Map, Value};

/// A nested string-keyed configuration mapping.
///
/// Values are plain data (null, bool, number, string, sequence, mapping)
/// with no object references, so records can be loaded from YAML, TOML, or
/// JSON documents interchangeably.
pub type ConfigRecord = Map<String, Value>;

/// Reserved key naming the registered factory that builds the record.
pub const TYPE_KEY: &str = "type";

/// Sentinel marking a value that must be filled in before building.
///
/// Scaffolded configs ship with required parameters set to this marker so
/// that an unedited config fails loudly instead of running with an
/// accidental default.
pub const PLACEHOLDER: &str = "???";

/// Errors raised while validating a configuration record.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The record still contains placeholder values.
    #[error("config contains unresolved placeholders at: {}", .paths.join(", "))]
    Incomplete { paths: Vec<String> },
}

/// The record's declared `type`, if present and a string.
pub fn type_name(record: &ConfigRecord) -> Option<&str> {
    record.get(TYPE_KEY).and_then(Value::as_str)
}

/// Dotted paths of every [`PLACEHOLDER`] value in the record.
///
/// Sequence elements are reported as `key[index]`. Paths come back in
/// key order, ready for an error message.
pub fn placeholder_paths(record: &ConfigRecord) -> Vec<String> {
    let mut paths = Vec::new();
    for (key, value) in record {
        collect_placeholders(value, key, &mut paths);
    }
    paths
}

fn collect_placeholders(value: &Value, path: &str, paths: &mut Vec<String>) {
    match value {
        Value::String(s) if s == PLACEHOLDER => paths.push(path.to_string()),
        Value::Object(map) => {
            for (key, nested) in map {
                collect_placeholders(nested, &format!("{}.{}", path, key), paths);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                collect_placeholders(item, &format!("{}[{}]", path, index), paths);
            }
        }
        _ => {}
    }
}

/// Fail with [`RecordError::Incomplete`] if the record still contains
/// placeholder values.
pub fn ensure_complete(record: &ConfigRecord) -> Result<(), RecordError> {
    let paths = placeholder_paths(record);
    if paths.is_empty() {
        Ok(())
    } else {
        Err(RecordError::Incomplete { paths })
    }
}
