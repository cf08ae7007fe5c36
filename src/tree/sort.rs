//! Canonical ordering of translation documents.

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{
    Serialize,
    Serializer,
};

use super::node::Node;

/// A lexicographically ordered serialization view of a document tree.
///
/// Serializing the same tree through this view always emits container
/// keys in ascending byte order, recursively, so two semantically equal
/// trees produce identical bytes regardless of insertion order. That
/// determinism is what makes the content fingerprints comparable.
#[derive(Debug, Clone, Copy)]
pub struct SortedDocument<'a>(pub &'a Node<String>);

impl Serialize for SortedDocument<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            Node::Leaf(text) => serializer.serialize_str(text),
            Node::Container(children) => {
                let mut map = serializer.serialize_map(Some(children.len()))?;
                for key in sorted_keys(children) {
                    if let Some(child) = children.get(key) {
                        map.serialize_entry(key, &SortedDocument(child))?;
                    }
                }
                map.end()
            }
        }
    }
}

/// Keys of a container in ascending byte order.
#[must_use]
pub fn sorted_keys<V>(children: &HashMap<String, Node<V>>) -> Vec<&String> {
    let mut keys: Vec<&String> = children.keys().collect();
    keys.sort_unstable();
    keys
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::tree::node::{
        ConflictPolicy,
        split_key,
    };

    fn tree(entries: &[(&str, &str)]) -> Node<String> {
        let mut tree = Node::container();
        for (key, value) in entries {
            let segments = split_key(key, '.', '\\').unwrap();
            tree.assign(&segments, (*value).to_string(), ConflictPolicy::Overwrite).unwrap();
        }
        tree
    }

    #[googletest::test]
    fn test_sorted_keys_ascending() {
        let tree = tree(&[("zebra", "1"), ("apple", "2"), ("mango", "3")]);

        let Node::Container(children) = &tree else {
            panic!("expected container");
        };
        let keys = sorted_keys(children);

        expect_that!(keys, elements_are![eq("apple"), eq("mango"), eq("zebra")]);
    }

    #[googletest::test]
    fn test_serialization_orders_nested_keys() {
        let tree = tree(&[("b.z", "1"), ("b.a", "2"), ("a", "3")]);

        let yaml = serde_yaml::to_string(&SortedDocument(&tree)).unwrap();

        assert_eq!(yaml, "a: '3'\nb:\n  a: '2'\n  z: '1'\n");
    }

    #[googletest::test]
    fn test_serialization_is_insertion_order_independent() {
        let first = tree(&[("user.name", "Name"), ("user.email", "Email"), ("title", "T")]);
        let second = tree(&[("title", "T"), ("user.email", "Email"), ("user.name", "Name")]);

        let first_yaml = serde_yaml::to_string(&SortedDocument(&first)).unwrap();
        let second_yaml = serde_yaml::to_string(&SortedDocument(&second)).unwrap();

        assert_eq!(first_yaml, second_yaml);
    }

    #[googletest::test]
    fn test_serialization_is_stable_across_calls() {
        let tree = tree(&[("b", "1"), ("a", "2"), ("c.d", "3"), ("c.b", "4")]);

        let once = serde_yaml::to_string(&SortedDocument(&tree)).unwrap();
        let again = serde_yaml::to_string(&SortedDocument(&tree)).unwrap();

        assert_eq!(once, again);
    }
}
