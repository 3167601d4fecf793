//! Configuration documents
//!
//! Settings files and presets share one recursive shape. The merge engine
//! matches over exactly these four variants.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// A settings file, a preset, or any nested part of one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Document {
    Mapping(BTreeMap<String, Document>),
    Sequence(Vec<Document>),
    Scalar(Scalar),
    Null,
}

/// Leaf values
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(Number),
    Bool(bool),
}

impl Document {
    /// The empty mapping, which is what an absent settings file reads as
    pub fn empty() -> Self {
        Document::Mapping(BTreeMap::new())
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, Document>> {
        match self {
            Document::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Document]> {
        match self {
            Document::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Look up a key of a mapping
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_mapping()?.get(key)
    }

    /// Follow a chain of mapping keys
    pub fn pointer(&self, keys: &[&str]) -> Option<&Document> {
        keys.iter().try_fold(self, |doc, key| doc.get(key))
    }

    /// Top-level keys, empty for anything but a mapping
    pub fn keys(&self) -> Vec<String> {
        self.as_mapping()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_empty_mapping(&self) -> bool {
        self.as_mapping().is_some_and(BTreeMap::is_empty)
    }

    /// Number of entries under `permissions.allow`
    pub fn allow_rule_count(&self) -> usize {
        self.pointer(&["permissions", "allow"])
            .and_then(Document::as_sequence)
            .map_or(0, <[Document]>::len)
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::empty()
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Document::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, Document::from(value)))
                    .collect(),
            ),
            Value::Array(items) => {
                Document::Sequence(items.into_iter().map(Document::from).collect())
            }
            Value::String(s) => Document::Scalar(Scalar::String(s)),
            Value::Number(n) => Document::Scalar(Scalar::Number(n)),
            Value::Bool(b) => Document::Scalar(Scalar::Bool(b)),
            Value::Null => Document::Null,
        }
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        match doc {
            Document::Mapping(map) => Value::Object(
                map.into_iter()
                    .map(|(key, doc)| (key, Value::from(doc)))
                    .collect(),
            ),
            Document::Sequence(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            Document::Scalar(Scalar::String(s)) => Value::String(s),
            Document::Scalar(Scalar::Number(n)) => Value::Number(n),
            Document::Scalar(Scalar::Bool(b)) => Value::Bool(b),
            Document::Null => Value::Null,
        }
    }
}

impl From<&str> for Document {
    fn from(s: &str) -> Self {
        Document::Scalar(Scalar::String(s.to_string()))
    }
}
