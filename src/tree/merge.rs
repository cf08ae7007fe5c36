//! Deep merge of translation trees.

use super::node::{
    LocaleValues,
    Node,
};

/// Merges two trees, the incoming side winning on every conflict.
///
/// Containers merge recursively, a leaf meeting a leaf is replaced by the
/// incoming one, and a shape mismatch (leaf vs. container) is resolved by
/// taking the incoming node outright. Merging the result with the same
/// incoming tree again is a no-op.
#[must_use]
pub fn merge<V>(base: Node<V>, incoming: Node<V>) -> Node<V> {
    merge_at("", base, incoming, &|_, incoming| incoming)
}

/// Merges two locale-keyed trees.
///
/// Same recursion as [`merge`], except that two locale-map leaves are
/// combined per locale (incoming wins per locale), so an import carrying
/// only one locale never discards another locale's existing value.
#[must_use]
pub fn merge_locales(base: Node<LocaleValues>, incoming: Node<LocaleValues>) -> Node<LocaleValues> {
    merge_at("", base, incoming, &|mut base, incoming| {
        base.extend(incoming);
        base
    })
}

/// Recursive merge worker; `path` is only used for conflict diagnostics.
fn merge_at<V>(
    path: &str,
    base: Node<V>,
    incoming: Node<V>,
    leaves: &impl Fn(V, V) -> V,
) -> Node<V> {
    match (base, incoming) {
        (Node::Container(mut base_children), Node::Container(incoming_children)) => {
            for (segment, incoming_child) in incoming_children {
                let child_path = if path.is_empty() {
                    segment.clone()
                } else {
                    format!("{path}.{segment}")
                };
                let merged = match base_children.remove(&segment) {
                    Some(base_child) => merge_at(&child_path, base_child, incoming_child, leaves),
                    None => incoming_child,
                };
                base_children.insert(segment, merged);
            }
            Node::Container(base_children)
        }
        (Node::Leaf(base_value), Node::Leaf(incoming_value)) => {
            Node::Leaf(leaves(base_value, incoming_value))
        }
        (_, incoming) => {
            tracing::warn!(path = %path, "Merge shape conflict, imported entry replaces the existing subtree");
            incoming
        }
    }
}
