//! Tree Integrity Verification
//!
//! Checks the three invariants every committed tree must satisfy:
//!
//! 1. Acyclicity: no parent chain revisits a node
//! 2. Order density: each sibling group holds exactly the orders `0..n`
//! 3. Tenant scope: every parent resolves within the child's tenant
//!
//! Commit gateways call `verify_tree` on the patched view before swapping it
//! in, so a stale or hand-built patch list can never corrupt stored state.

use crate::models::{CategoryNode, CategorySnapshot};
use crate::operations::descendant_guard::is_descendant;
use crate::operations::error::IntegrityError;
use std::collections::BTreeMap;

/// Verify all invariants over every node in `snapshot`
///
/// Errors are reported in a stable order: parent references first, then
/// cycles, then order density, each scanning ids lexicographically.
pub fn verify_tree(snapshot: &CategorySnapshot) -> Result<(), IntegrityError> {
    let mut nodes: Vec<&CategoryNode> = snapshot.nodes().collect();
    nodes.sort_by(|a, b| a.id.cmp(&b.id));

    for node in &nodes {
        let Some(parent_id) = node.parent_id.as_deref() else {
            continue;
        };
        match snapshot.get(parent_id) {
            None => {
                return Err(IntegrityError::DanglingParent {
                    node_id: node.id.clone(),
                    parent_id: parent_id.to_string(),
                })
            }
            Some(parent) if parent.tenant_id != node.tenant_id => {
                return Err(IntegrityError::CrossTenantParent {
                    node_id: node.id.clone(),
                    parent_id: parent_id.to_string(),
                })
            }
            Some(_) => {}
        }
    }

    // A node that shows up among its own ancestors sits on a cycle.
    if let Some(node) = nodes.iter().find(|n| is_descendant(snapshot, &n.id, &n.id)) {
        return Err(IntegrityError::Cycle {
            node_id: node.id.clone(),
        });
    }

    let mut groups: BTreeMap<(&str, Option<&str>), Vec<u32>> = BTreeMap::new();
    for node in &nodes {
        groups
            .entry((node.tenant_id.as_str(), node.parent_id.as_deref()))
            .or_default()
            .push(node.order);
    }

    for ((_, parent_id), mut orders) in groups {
        orders.sort_unstable();
        let dense = orders
            .iter()
            .enumerate()
            .all(|(idx, order)| *order as usize == idx);
        if !dense {
            return Err(IntegrityError::OrderGap {
                parent_id: parent_id.map(str::to_string),
                orders,
            });
        }
    }

    Ok(())
}
