//! Loading YAML sources into the interpreter's value model.
//!
//! The interpreter itself never sees YAML text; it works on [`Value`]
//! trees. This module is the boundary: it parses a YAML document with
//! `serde_yaml` and converts the result into the value model, preserving
//! mapping key order. Serialization back to YAML lives in [`crate::output`].

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use indexmap::IndexMap;

use crate::value::Value;

/// Errors raised while loading a document.
#[derive(Debug)]
pub enum DocumentError {
    /// The source could not be read
    Io(io::Error),
    /// The source is not valid YAML
    Yaml(serde_yaml::Error),
    /// A mapping key is not a scalar
    UnsupportedKey(String),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::Io(e) => write!(f, "cannot read document: {}", e),
            DocumentError::Yaml(e) => write!(f, "invalid YAML: {}", e),
            DocumentError::UnsupportedKey(kind) => {
                write!(f, "unsupported mapping key of type {}", kind)
            }
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentError::Io(e) => Some(e),
            DocumentError::Yaml(e) => Some(e),
            DocumentError::UnsupportedKey(_) => None,
        }
    }
}

impl From<io::Error> for DocumentError {
    fn from(e: io::Error) -> Self {
        DocumentError::Io(e)
    }
}

impl From<serde_yaml::Error> for DocumentError {
    fn from(e: serde_yaml::Error) -> Self {
        DocumentError::Yaml(e)
    }
}

/// Parse YAML text into a document root.
///
/// Empty input loads as null, the same way an empty file round-trips
/// through a YAML parser.
pub fn load_str(source: &str) -> Result<Value, DocumentError> {
    if source.trim().is_empty() {
        return Ok(Value::Null);
    }
    let parsed: serde_yaml::Value = serde_yaml::from_str(source)?;
    from_yaml(parsed)
}

/// Read and parse a YAML file.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Value, DocumentError> {
    let content = fs::read_to_string(path)?;
    load_str(&content)
}

fn from_yaml(value: serde_yaml::Value) -> Result<Value, DocumentError> {
    match value {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Boolean(b)),
        serde_yaml::Value::Number(n) => Ok(Value::Number(n.as_f64().unwrap_or_default())),
        serde_yaml::Value::String(s) => Ok(Value::String(s)),
        serde_yaml::Value::Sequence(items) => {
            let mut sequence = Vec::with_capacity(items.len());
            for item in items {
                sequence.push(from_yaml(item)?);
            }
            Ok(Value::Sequence(sequence))
        }
        serde_yaml::Value::Mapping(entries) => {
            let mut mapping = IndexMap::with_capacity(entries.len());
            for (key, value) in entries {
                mapping.insert(key_string(key)?, from_yaml(value)?);
            }
            Ok(Value::Mapping(mapping))
        }
        // Tags carry no meaning in the value model; keep the tagged value
        serde_yaml::Value::Tagged(tagged) => from_yaml(tagged.value),
    }
}

/// Mapping keys are flattened to strings; scalar keys only.
fn key_string(key: serde_yaml::Value) -> Result<String, DocumentError> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        other => Err(DocumentError::UnsupportedKey(
            match other {
                serde_yaml::Value::Sequence(_) => "sequence",
                serde_yaml::Value::Mapping(_) => "mapping",
                _ => "tag",
            }
            .to_string(),
        )),
    }
}
