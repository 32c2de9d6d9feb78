//! Ordered string-keyed YAML documents with shallow merge
//!
//! ## Shallow merge
//!
//! Top-level keys of the incoming document override matching keys in the
//! existing one; everything else is kept. Nested mappings are replaced whole,
//! not merged recursively. Existing keys keep their position, new keys are
//! appended in the order they were inserted.
//!
//! ```text
//! Existing: {a: 1, b: {x: 1}}
//! New:      {b: {y: 2}, c: 3}
//! Result:   {a: 1, b: {y: 2}, c: 3}
//! ```

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{Result, document};

/// A YAML mapping persisted as a configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(Mapping);

impl ConfigDocument {
    pub fn new() -> Self {
        Self(Mapping::new())
    }

    /// Parse a document, treating an empty (or comment-only) file as empty.
    ///
    /// Anything that is not a mapping at the top level is rejected.
    pub fn from_yaml(content: &str, source_name: &str) -> Result<Self> {
        let has_content = content.lines().map(str::trim).any(|line| {
            !line.is_empty() && !line.starts_with('#') && line != "---" && line != "..."
        });
        if !has_content {
            return Ok(Self::new());
        }

        let value: Value =
            serde_yaml::from_str(content).map_err(|e| document::parse_failed(source_name, e))?;

        match value {
            Value::Null => Ok(Self::new()),
            Value::Mapping(mapping) => Ok(Self(mapping)),
            other => Err(document::parse_failed(
                source_name,
                format!("expected a mapping, found {}", value_kind(&other)),
            )),
        }
    }

    /// Render the document as YAML text
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.0)?)
    }

    /// Set a top-level key, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(Value::String(key.into()), value.into())
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Shallow-merge `other` on top of this document
    pub fn merge_shallow(&mut self, other: ConfigDocument) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }

    /// Shallow-merge `other` into the mapping stored under `key`.
    ///
    /// A missing or null entry starts out as an empty mapping. Sibling
    /// top-level keys are untouched.
    pub fn merge_nested(&mut self, key: &str, other: ConfigDocument) -> Result<()> {
        let slot = self
            .0
            .entry(Value::String(key.to_string()))
            .or_insert(Value::Null);
        if slot.is_null() {
            *slot = Value::Mapping(Mapping::new());
        }

        match slot {
            Value::Mapping(nested) => {
                for (nested_key, value) in other.0 {
                    nested.insert(nested_key, value);
                }
                Ok(())
            }
            section => Err(document::parse_failed(
                format!("'{key}' section"),
                format!("expected a mapping, found {}", value_kind(section)),
            )),
        }
    }
}

impl From<Mapping> for ConfigDocument {
    fn from(mapping: Mapping) -> Self {
        Self(mapping)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ConfigDocument {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut document = Self::new();
        for (key, value) in iter {
            document.insert(key, value);
        }
        document
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
