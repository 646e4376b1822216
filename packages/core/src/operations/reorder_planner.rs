//! Reorder Planner
//!
//! Turns a drag gesture `(dragged_id, target_id)` into the smallest list of
//! `NodePatch` values that moves the dragged category and keeps every touched
//! sibling group dense.
//!
//! # Drop Semantics
//!
//! - Target is a child: the dragged category becomes its sibling and lands
//!   immediately before it.
//! - Target is a root: the dragged category becomes its child and is appended
//!   to the end of its children.
//!
//! # Patch Construction
//!
//! The destination group is rebuilt with the dragged category inserted and
//! renumbered `0..n`. When the move crosses groups, the source group is
//! renumbered as a whole to close the gap. Only members whose `parent_id` or
//! `order` actually change are emitted, destination first.

use crate::models::{CategoryNode, CategorySnapshot, NodePatch};
use crate::operations::descendant_guard::is_descendant;
use crate::operations::error::RejectReason;

/// Result of planning one drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    /// Tenant of the dragged category; the commit is scoped to it
    pub tenant_id: String,

    /// The category being moved
    pub dragged_id: String,

    /// Parent the dragged category ends up under (`None` = root-level)
    pub target_parent_id: Option<String>,

    /// Changed positions, destination group first
    pub patches: Vec<NodePatch>,
}

impl ReorderPlan {
    /// True when the drop leaves every category where it is
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }
}

/// Plan moving `dragged_id` relative to `target_id`
///
/// # Errors
///
/// - `NoOp` if both ids are equal
/// - `UnknownNode` if either id is missing from `snapshot`
/// - `CrossTenant` if the target belongs to another tenant
/// - `CycleWouldForm` if the target is a descendant of the dragged category
///
/// # Examples
///
/// ```rust
/// use catalog_core::models::{CategoryNode, CategorySnapshot, NodePatch};
/// use catalog_core::operations::plan;
/// use serde_json::json;
///
/// let snapshot = CategorySnapshot::from_nodes(
///     "tenant",
///     vec![
///         CategoryNode::with_id("r1", "tenant", None, 0, json!({})),
///         CategoryNode::with_id("r2", "tenant", None, 1, json!({})),
///     ],
/// );
///
/// // Dropping onto a root nests the dragged category under it.
/// let plan = plan("r2", "r1", &snapshot).unwrap();
/// assert_eq!(plan.patches, vec![NodePatch::new("r2", Some("r1".to_string()), 0)]);
/// ```
pub fn plan(
    dragged_id: &str,
    target_id: &str,
    snapshot: &CategorySnapshot,
) -> Result<ReorderPlan, RejectReason> {
    if dragged_id == target_id {
        return Err(RejectReason::no_op(dragged_id.to_string()));
    }

    let dragged = snapshot
        .get(dragged_id)
        .ok_or_else(|| RejectReason::unknown_node(dragged_id.to_string()))?;
    let target = snapshot
        .get(target_id)
        .ok_or_else(|| RejectReason::unknown_node(target_id.to_string()))?;

    if dragged.tenant_id != target.tenant_id {
        return Err(RejectReason::cross_tenant(
            target.id.clone(),
            dragged.tenant_id.clone(),
            target.tenant_id.clone(),
        ));
    }

    if is_descendant(snapshot, dragged_id, target_id) {
        return Err(RejectReason::cycle_would_form(
            dragged_id.to_string(),
            target_id.to_string(),
        ));
    }

    let target_parent_id = resolve_target_parent(dragged, target);
    let tenant_id = dragged.tenant_id.as_str();

    let mut destination = group_without(snapshot, tenant_id, target_parent_id.as_deref(), dragged_id);
    let insert_at = destination
        .iter()
        .position(|n| n.id == target.id)
        .unwrap_or(destination.len());
    destination.insert(insert_at, dragged);

    let mut patches = renumber(&destination, target_parent_id.as_deref());

    if dragged.parent_id != target_parent_id {
        let source = group_without(snapshot, tenant_id, dragged.parent_id.as_deref(), dragged_id);
        patches.extend(renumber(&source, dragged.parent_id.as_deref()));
    }

    tracing::debug!(
        "Planned move of '{}' onto '{}': parent {:?}, {} patch(es)",
        dragged_id,
        target_id,
        target_parent_id,
        patches.len()
    );

    Ok(ReorderPlan {
        tenant_id: tenant_id.to_string(),
        dragged_id: dragged_id.to_string(),
        target_parent_id,
        patches,
    })
}

/// Child targets take a sibling, root targets take a child.
fn resolve_target_parent(dragged: &CategoryNode, target: &CategoryNode) -> Option<String> {
    let resolved = match &target.parent_id {
        Some(parent_id) => parent_id.clone(),
        None => target.id.clone(),
    };

    // Unreachable after the no-op and cycle checks; promote rather than self-parent.
    if resolved == dragged.id {
        None
    } else {
        Some(resolved)
    }
}

fn group_without<'a>(
    snapshot: &'a CategorySnapshot,
    tenant_id: &str,
    parent_id: Option<&str>,
    excluded_id: &str,
) -> Vec<&'a CategoryNode> {
    snapshot
        .siblings(tenant_id, parent_id)
        .into_iter()
        .filter(|n| n.id != excluded_id)
        .collect()
}

fn renumber(group: &[&CategoryNode], parent_id: Option<&str>) -> Vec<NodePatch> {
    group
        .iter()
        .enumerate()
        .filter_map(|(idx, node)| {
            let patch = NodePatch::new(node.id.clone(), parent_id.map(str::to_string), idx as u32);
            node.differs_from(&patch).then_some(patch)
        })
        .collect()
}

// Scenario tests in separate module
#[cfg(test)]
#[path = "reorder_planner_test.rs"]
mod reorder_planner_test;
