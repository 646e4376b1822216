//! Descendant Guard
//!
//! Answers "is B a descendant of A?" by walking parent pointers upward from B.
//! The walk is bounded by the snapshot's node count, so a corrupted snapshot
//! containing a parent cycle cannot hang the caller.

use crate::models::{CategoryNode, CategorySnapshot};

/// Check whether `node_id` is a (strict) descendant of `candidate_ancestor_id`
///
/// Returns `false` when either id is missing, when the walk reaches a root, or
/// when the walk exceeds the number of nodes in the snapshot. A node is not
/// its own descendant.
///
/// # Examples
///
/// ```rust
/// use catalog_core::models::{CategoryNode, CategorySnapshot};
/// use catalog_core::operations::is_descendant;
/// use serde_json::json;
///
/// let snapshot = CategorySnapshot::from_nodes(
///     "tenant",
///     vec![
///         CategoryNode::with_id("a", "tenant", None, 0, json!({})),
///         CategoryNode::with_id("b", "tenant", Some("a".to_string()), 0, json!({})),
///     ],
/// );
/// assert!(is_descendant(&snapshot, "a", "b"));
/// assert!(!is_descendant(&snapshot, "b", "a"));
/// ```
pub fn is_descendant(snapshot: &CategorySnapshot, candidate_ancestor_id: &str, node_id: &str) -> bool {
    if !snapshot.contains(candidate_ancestor_id) {
        return false;
    }

    ancestor_ids(snapshot, node_id).any(|id| id == candidate_ancestor_id)
}

/// Ancestors of `node_id`, nearest first
///
/// Stops at a root, at a dangling parent reference, or after `snapshot.len()`
/// steps.
pub fn ancestors<'a>(snapshot: &'a CategorySnapshot, node_id: &str) -> Vec<&'a CategoryNode> {
    ancestor_ids(snapshot, node_id)
        .map_while(|id| snapshot.get(id))
        .collect()
}

/// Number of ancestors above `node_id` (0 for roots), `None` if the node is unknown
pub fn depth(snapshot: &CategorySnapshot, node_id: &str) -> Option<usize> {
    snapshot
        .get(node_id)
        .map(|_| ancestors(snapshot, node_id).len())
}

fn ancestor_ids<'a>(snapshot: &'a CategorySnapshot, node_id: &str) -> AncestorIds<'a> {
    AncestorIds {
        snapshot,
        next: snapshot.get(node_id).and_then(|n| n.parent_id.as_deref()),
        remaining: snapshot.len(),
    }
}

struct AncestorIds<'a> {
    snapshot: &'a CategorySnapshot,
    next: Option<&'a str>,
    remaining: usize,
}

impl<'a> Iterator for AncestorIds<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let current = self.next?;

        if self.remaining == 0 {
            tracing::warn!(
                "Parent walk exceeded {} steps at category '{}'; snapshot contains a cycle",
                self.snapshot.len(),
                current
            );
            self.next = None;
            return None;
        }
        self.remaining -= 1;

        self.next = self
            .snapshot
            .get(current)
            .and_then(|n| n.parent_id.as_deref());
        Some(current)
    }
}
