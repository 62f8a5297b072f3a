//! Configuration document loading
//!
//! Parses nested key/value documents into [`ConfigRecord`]s. YAML is the
//! native format of experiment configs; TOML and JSON documents load to the
//! same record representation, so merge and build never care where a config
//! came from.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::record::ConfigRecord;

/// Errors raised while loading configuration documents.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The document path does not exist.
    #[error("config document not found: {0}")]
    NotFound(PathBuf),

    /// The document could not be read.
    #[error("failed to read config document: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid YAML.
    #[error("failed to parse YAML config: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// The document is not valid TOML.
    #[error("failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// The document is not valid JSON.
    #[error("failed to parse JSON config: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The path has no extension to detect the format from.
    #[error("config document has no extension: {0}")]
    NoExtension(PathBuf),

    /// The extension does not name a supported format.
    #[error("unsupported config format '{0}' (expected yaml, yml, toml, or json)")]
    UnsupportedFormat(String),

    /// The document parsed, but its top level is not a mapping.
    #[error("config document root is not a mapping")]
    NotAMapping,
}

/// Parse a YAML document into a config record.
pub fn from_yaml_str(content: &str) -> Result<ConfigRecord, DocumentError> {
    let value: Value = serde_yaml::from_str(content)?;
    into_record(value)
}

/// Parse a TOML document into a config record.
pub fn from_toml_str(content: &str) -> Result<ConfigRecord, DocumentError> {
    let value: toml::Value = toml::from_str(content)?;
    into_record(toml_to_json(value))
}

/// Parse a JSON document into a config record.
pub fn from_json_str(content: &str) -> Result<ConfigRecord, DocumentError> {
    let value: Value = serde_json::from_str(content)?;
    into_record(value)
}

/// Load a config record from a file, detecting the format from the
/// extension (`yaml`/`yml`, `toml`, `json`).
pub fn load_record(path: &Path) -> Result<ConfigRecord, DocumentError> {
    if !path.exists() {
        return Err(DocumentError::NotFound(path.to_path_buf()));
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| DocumentError::NoExtension(path.to_path_buf()))?
        .to_lowercase();

    debug!("loading config document from {}", path.display());
    let content = fs::read_to_string(path)?;
    match extension.as_str() {
        "yaml" | "yml" => from_yaml_str(&content),
        "toml" => from_toml_str(&content),
        "json" => from_json_str(&content),
        other => Err(DocumentError::UnsupportedFormat(other.to_string())),
    }
}

fn into_record(value: Value) -> Result<ConfigRecord, DocumentError> {
    match value {
        Value::Object(record) => Ok(record),
        _ => Err(DocumentError::NotAMapping),
    }
}

/// Convert a TOML value to its JSON equivalent.
///
/// Floats outside JSON's representable range become null; datetimes become
/// their string form.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, item)| (key, toml_to_json(item)))
                .collect(),
        ),
    }
}
