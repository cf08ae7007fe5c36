//! Translation tree nodes and key-path assignment.

use std::collections::HashMap;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// Locale → translated text, held at each leaf until the per-locale split.
pub type LocaleValues = HashMap<String, String>;

/// Errors raised while splitting keys or assigning values into a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The translation key was empty.
    #[error("Translation key is empty")]
    EmptyKey,
    /// A key contained an empty segment (e.g. `"a..b"`).
    #[error("Translation key '{key}' contains an empty segment")]
    EmptySegment {
        /// The offending key, as read from the input.
        key: String,
    },
    /// A value and a group of sub-keys collided at the same path.
    #[error("Structural conflict at '{path}': a value and a key group share the same path")]
    StructuralConflict {
        /// Path of the colliding node, segments joined with `.`.
        path: String,
    },
}

/// What to do when an assignment collides with an existing node of the
/// other shape (leaf where a container is needed, or vice versa).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Replace the existing node and log a warning.
    #[default]
    Overwrite,
    /// Fail the assignment with [`TreeError::StructuralConflict`].
    Reject,
}

/// A node of a translation tree: either a terminal value or a container
/// of named children, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<V> {
    /// Terminal value.
    Leaf(V),
    /// Named children.
    Container(HashMap<String, Node<V>>),
}

/// Splits a delimited key into its path segments.
///
/// The escape character makes an immediately following separator (or
/// escape) literal; before any other character it is kept as-is.
///
/// # Errors
/// [`TreeError::EmptyKey`] for an empty key, [`TreeError::EmptySegment`]
/// when splitting produces an empty segment.
pub fn split_key(key: &str, separator: char, escape: char) -> Result<Vec<String>, TreeError> {
    if key.is_empty() {
        return Err(TreeError::EmptyKey);
    }

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = key.chars();
    while let Some(c) = chars.next() {
        if c == escape {
            match chars.next() {
                Some(next) if next == separator || next == escape => current.push(next),
                Some(next) => {
                    current.push(c);
                    current.push(next);
                }
                None => current.push(c),
            }
        } else if c == separator {
            segments.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    segments.push(current);

    if segments.iter().any(String::is_empty) {
        return Err(TreeError::EmptySegment { key: key.to_string() });
    }
    Ok(segments)
}

impl<V> Node<V> {
    /// Creates an empty container node.
    #[must_use]
    pub fn container() -> Self {
        Self::Container(HashMap::new())
    }

    /// Whether this node is a terminal value.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Whether this node is a container without any children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Leaf(_) => false,
            Self::Container(children) => children.is_empty(),
        }
    }

    /// Looks up a direct child by segment name. `None` for leaves.
    #[must_use]
    pub fn child(&self, segment: &str) -> Option<&Self> {
        match self {
            Self::Leaf(_) => None,
            Self::Container(children) => children.get(segment),
        }
    }

    /// Stores `value` as a leaf at the path given by `segments`,
    /// creating intermediate containers as needed.
    ///
    /// When a traversed node already holds a value, or the final segment
    /// already holds a container, the assignment is structurally
    /// ambiguous and `policy` decides between replacing the node (logged
    /// at warn level) and failing.
    ///
    /// # Errors
    /// [`TreeError::EmptyKey`] when `segments` is empty,
    /// [`TreeError::StructuralConflict`] under [`ConflictPolicy::Reject`].
    pub fn assign(
        &mut self,
        segments: &[String],
        value: V,
        policy: ConflictPolicy,
    ) -> Result<(), TreeError> {
        let Some((last, inner)) = segments.split_last() else {
            return Err(TreeError::EmptyKey);
        };

        let mut node = self;
        let mut walked: Vec<&str> = Vec::with_capacity(segments.len());
        for segment in inner {
            let children = node.as_container_mut(policy, &walked)?;
            node = children.entry(segment.clone()).or_insert_with(Self::container);
            walked.push(segment);
        }

        let children = node.as_container_mut(policy, &walked)?;
        walked.push(last);
        if let Some(Self::Container(_)) = children.get(last) {
            resolve_conflict(policy, &walked)?;
        }
        children.insert(last.clone(), Self::Leaf(value));
        Ok(())
    }

    /// Returns the children map, converting a leaf into an empty
    /// container first when `policy` allows it.
    fn as_container_mut(
        &mut self,
        policy: ConflictPolicy,
        walked: &[&str],
    ) -> Result<&mut HashMap<String, Self>, TreeError> {
        if self.is_leaf() {
            resolve_conflict(policy, walked)?;
            *self = Self::container();
        }
        match self {
            Self::Container(children) => Ok(children),
            Self::Leaf(_) => Err(TreeError::StructuralConflict { path: walked.join(".") }),
        }
    }
}

/// Applies the conflict policy at the given path: `Ok` to overwrite,
/// `Err` to reject.
fn resolve_conflict(policy: ConflictPolicy, walked: &[&str]) -> Result<(), TreeError> {
    let path = walked.join(".");
    match policy {
        ConflictPolicy::Overwrite => {
            tracing::warn!(path = %path, "Structural conflict, existing entry is overwritten");
            Ok(())
        }
        ConflictPolicy::Reject => Err(TreeError::StructuralConflict { path }),
    }
}

impl Node<String> {
    /// Rewraps a single-locale document tree into a locale-keyed tree,
    /// turning each leaf into a one-entry locale map.
    #[must_use]
    pub fn into_locale_tree(self, locale: &str) -> Node<LocaleValues> {
        match self {
            Self::Leaf(text) => Node::Leaf(HashMap::from([(locale.to_string(), text)])),
            Self::Container(children) => Node::Container(
                children
                    .into_iter()
                    .map(|(segment, child)| (segment, child.into_locale_tree(locale)))
                    .collect(),
            ),
        }
    }
}

impl Node<LocaleValues> {
    /// Projects the tree onto a single locale.
    ///
    /// Leaves without a value for `locale` produce no entry, and groups
    /// left without entries are dropped entirely; `None` means the whole
    /// document would be empty.
    #[must_use]
    pub fn project_locale(&self, locale: &str) -> Option<Node<String>> {
        match self {
            Self::Leaf(values) => values.get(locale).cloned().map(Node::Leaf),
            Self::Container(children) => {
                let projected: HashMap<String, Node<String>> = children
                    .iter()
                    .filter_map(|(segment, child)| {
                        child.project_locale(locale).map(|node| (segment.clone(), node))
                    })
                    .collect();
                if projected.is_empty() { None } else { Some(Node::Container(projected)) }
            }
        }
    }
}
