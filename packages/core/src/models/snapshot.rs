//! Immutable Category Snapshot
//!
//! A `CategorySnapshot` is a flat arena of categories keyed by id. Parent and
//! child relationships are derived by filtering on `parent_id`, which keeps
//! the structure free of ownership cycles and lets the descendant guard walk
//! upward iteratively.
//!
//! Snapshots are never mutated in place once shared. Applying patches
//! produces a new snapshot (`with_patches`), and the node store swaps whole
//! snapshots behind an `Arc`.

use crate::models::{CategoryNode, NodePatch};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Point-in-time view of a tenant's categories
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySnapshot {
    tenant_id: String,
    nodes: HashMap<String, CategoryNode>,
}

impl CategorySnapshot {
    /// Create an empty snapshot for `tenant_id`
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            nodes: HashMap::new(),
        }
    }

    /// Build a snapshot from a node list
    ///
    /// Later entries replace earlier ones with the same id. Nodes of other
    /// tenants are kept; the planner scopes every operation by the dragged
    /// node's tenant.
    pub fn from_nodes(
        tenant_id: impl Into<String>,
        nodes: impl IntoIterator<Item = CategoryNode>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn get(&self, id: &str) -> Option<&CategoryNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in arbitrary order
    pub fn nodes(&self) -> impl Iterator<Item = &CategoryNode> {
        self.nodes.values()
    }

    /// Members of one sibling group, sorted by `(order, id)`
    ///
    /// The id tie-break only matters for snapshots that already violate order
    /// density; it keeps planning deterministic for them.
    pub fn siblings(&self, tenant_id: &str, parent_id: Option<&str>) -> Vec<&CategoryNode> {
        let mut group: Vec<&CategoryNode> = self
            .nodes
            .values()
            .filter(|n| n.tenant_id == tenant_id && n.parent_id.as_deref() == parent_id)
            .collect();
        group.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        group
    }

    /// Root-level categories of the snapshot's tenant, in order
    pub fn roots(&self) -> Vec<&CategoryNode> {
        self.siblings(&self.tenant_id, None)
    }

    /// Direct children of `parent_id`, in order
    pub fn children(&self, parent_id: &str) -> Vec<&CategoryNode> {
        match self.nodes.get(parent_id) {
            Some(parent) => self.siblings(&parent.tenant_id, Some(parent_id)),
            None => Vec::new(),
        }
    }

    /// Return a new snapshot with `patches` applied
    ///
    /// Patches naming unknown ids are skipped; validating them is the commit
    /// gateway's job.
    pub fn with_patches(&self, patches: &[NodePatch], now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        for patch in patches {
            if let Some(node) = next.nodes.get_mut(&patch.id) {
                node.apply_patch(patch, now);
            }
        }
        next
    }

    /// All nodes sorted by `(tenant_id, parent_id, order, id)`
    pub fn to_sorted_vec(&self) -> Vec<CategoryNode> {
        let mut nodes: Vec<CategoryNode> = self.nodes.values().cloned().collect();
        sort_nodes(&mut nodes);
        nodes
    }
}

/// Canonical ordering for node lists returned to callers
pub fn sort_nodes(nodes: &mut [CategoryNode]) {
    nodes.sort_by(|a, b| {
        a.tenant_id
            .cmp(&b.tenant_id)
            .then_with(|| a.parent_id.cmp(&b.parent_id))
            .then_with(|| a.order.cmp(&b.order))
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: &str, parent: Option<&str>, order: u32) -> CategoryNode {
        CategoryNode::with_id(id, "tenant", parent.map(str::to_string), order, json!({}))
    }

    #[test]
    fn test_siblings_sorted_by_order() {
        let snapshot = CategorySnapshot::from_nodes(
            "tenant",
            vec![
                node("r2", None, 1),
                node("r1", None, 0),
                node("c2", Some("r1"), 1),
                node("c1", Some("r1"), 0),
            ],
        );

        let roots: Vec<&str> = snapshot.roots().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(roots, vec!["r1", "r2"]);

        let children: Vec<&str> = snapshot
            .children("r1")
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(children, vec!["c1", "c2"]);
        assert!(snapshot.children("missing").is_empty());
    }

    #[test]
    fn test_siblings_ignore_other_tenants() {
        let mut foreign = node("x", None, 0);
        foreign.tenant_id = "other".to_string();
        let snapshot = CategorySnapshot::from_nodes("tenant", vec![node("r1", None, 0), foreign]);

        assert_eq!(snapshot.roots().len(), 1);
        assert_eq!(snapshot.siblings("other", None).len(), 1);
    }

    #[test]
    fn test_with_patches_leaves_original_untouched() {
        let snapshot =
            CategorySnapshot::from_nodes("tenant", vec![node("r1", None, 0), node("r2", None, 1)]);
        let patched = snapshot.with_patches(
            &[
                NodePatch::new("r2", Some("r1".to_string()), 0),
                NodePatch::new("ghost", None, 0),
            ],
            Utc::now(),
        );

        assert!(snapshot.get("r2").unwrap().is_root());
        assert_eq!(
            patched.get("r2").unwrap().parent_id.as_deref(),
            Some("r1")
        );
        assert_eq!(patched.len(), 2);
    }
}
