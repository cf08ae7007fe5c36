//! Document formats and their (de)serialization.

use std::collections::HashMap;

use thiserror::Error;

use crate::tree::{
    Node,
    SortedDocument,
};

/// Errors raised while reading or writing documents.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A document could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A document is not valid YAML.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// A document is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialization format of the persisted documents, chosen by the
/// configured file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML documents (`.yml` / `.yaml`).
    Yaml,
    /// JSON documents (`.json`).
    Json,
}

impl DocumentFormat {
    /// Resolves a file extension to its format, `None` when unsupported.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "yml" | "yaml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Serializes a document tree with canonically ordered keys.
    ///
    /// # Errors
    /// [`StoreError`] when the underlying serializer fails.
    pub fn serialize(self, tree: &Node<String>) -> Result<Vec<u8>, StoreError> {
        let document = SortedDocument(tree);
        match self {
            Self::Yaml => Ok(serde_yaml::to_string(&document)?.into_bytes()),
            Self::Json => {
                let mut bytes = serde_json::to_vec_pretty(&document)?;
                bytes.push(b'\n');
                Ok(bytes)
            }
        }
    }

    /// Parses a persisted document back into a tree.
    ///
    /// Non-string scalars are stringified; sequences have no meaning in
    /// a translation tree and are skipped with a warning.
    ///
    /// # Errors
    /// [`StoreError`] when the content is not valid for the format.
    pub fn parse(self, content: &str) -> Result<Node<String>, StoreError> {
        match self {
            Self::Yaml => {
                let value: serde_yaml::Value = serde_yaml::from_str(content)?;
                Ok(node_from_yaml(value).unwrap_or_else(Node::container))
            }
            Self::Json => {
                let value: serde_json::Value = serde_json::from_str(content)?;
                Ok(node_from_json(value).unwrap_or_else(Node::container))
            }
        }
    }
}

/// Converts a YAML value into a tree node; `None` for values without a
/// translation-tree meaning.
fn node_from_yaml(value: serde_yaml::Value) -> Option<Node<String>> {
    match value {
        serde_yaml::Value::Mapping(mapping) => {
            let children: HashMap<String, Node<String>> = mapping
                .into_iter()
                .filter_map(|(key, value)| {
                    let key = yaml_key_to_string(&key)?;
                    node_from_yaml(value).map(|node| (key, node))
                })
                .collect();
            Some(Node::Container(children))
        }
        serde_yaml::Value::String(text) => Some(Node::Leaf(text)),
        serde_yaml::Value::Bool(flag) => Some(Node::Leaf(flag.to_string())),
        serde_yaml::Value::Number(number) => Some(Node::Leaf(number.to_string())),
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Tagged(_) => {
            tracing::warn!("Skipping a list entry in an existing translation document");
            None
        }
        serde_yaml::Value::Null => None,
    }
}

/// Stringifies a YAML mapping key, skipping keys that are not scalars.
fn yaml_key_to_string(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(text) => Some(text.clone()),
        serde_yaml::Value::Bool(flag) => Some(flag.to_string()),
        serde_yaml::Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Converts a JSON value into a tree node; same rules as YAML.
fn node_from_json(value: serde_json::Value) -> Option<Node<String>> {
    match value {
        serde_json::Value::Object(object) => {
            let children: HashMap<String, Node<String>> = object
                .into_iter()
                .filter_map(|(key, value)| node_from_json(value).map(|node| (key, node)))
                .collect();
            Some(Node::Container(children))
        }
        serde_json::Value::String(text) => Some(Node::Leaf(text)),
        serde_json::Value::Bool(flag) => Some(Node::Leaf(flag.to_string())),
        serde_json::Value::Number(number) => Some(Node::Leaf(number.to_string())),
        serde_json::Value::Array(_) => {
            tracing::warn!("Skipping a list entry in an existing translation document");
            None
        }
        serde_json::Value::Null => None,
    }
}
