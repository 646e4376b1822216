//! Error types for the reordering operations
//!
//! This module defines the two families of structural errors:
//!
//! - `RejectReason`: a drag gesture the planner refuses before building any
//!   patch. Rejections never reach a commit gateway.
//! - `IntegrityError`: a tree that breaks acyclicity, order density or tenant
//!   scope. Gateways use it to refuse patch lists that would corrupt a tree.

use thiserror::Error;

/// Why the planner refused a move
///
/// # Examples
///
/// ```rust
/// use catalog_core::operations::RejectReason;
///
/// let err = RejectReason::cycle_would_form("brands".to_string(), "shoes".to_string());
/// assert_eq!(
///     err.to_string(),
///     "Cannot move category 'brands' under its descendant 'shoes'"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The category was dropped onto itself
    #[error("Category '{node_id}' was dropped onto itself")]
    NoOp { node_id: String },

    /// The target is a descendant of the dragged category
    #[error("Cannot move category '{dragged_id}' under its descendant '{target_id}'")]
    CycleWouldForm {
        dragged_id: String,
        target_id: String,
    },

    /// One of the ids is absent from the snapshot the plan was built on
    #[error("Category '{node_id}' does not exist in the current snapshot")]
    UnknownNode { node_id: String },

    /// The target belongs to another tenant
    #[error("Category '{target_id}' belongs to tenant '{target_tenant}', not '{dragged_tenant}'")]
    CrossTenant {
        target_id: String,
        dragged_tenant: String,
        target_tenant: String,
    },
}

impl RejectReason {
    /// Create a NoOp rejection
    pub fn no_op(node_id: String) -> Self {
        Self::NoOp { node_id }
    }

    /// Create a CycleWouldForm rejection
    pub fn cycle_would_form(dragged_id: String, target_id: String) -> Self {
        Self::CycleWouldForm {
            dragged_id,
            target_id,
        }
    }

    /// Create an UnknownNode rejection
    pub fn unknown_node(node_id: String) -> Self {
        Self::UnknownNode { node_id }
    }

    /// Create a CrossTenant rejection
    pub fn cross_tenant(target_id: String, dragged_tenant: String, target_tenant: String) -> Self {
        Self::CrossTenant {
            target_id,
            dragged_tenant,
            target_tenant,
        }
    }
}

/// A violated tree invariant
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    /// Following parent pointers from the node revisits it
    #[error("Cycle detected through category '{node_id}'")]
    Cycle { node_id: String },

    /// A sibling group's orders are not exactly `0..n`
    #[error("Sibling group under {} has orders {orders:?}, expected 0..{}", parent_label(.parent_id), .orders.len())]
    OrderGap {
        parent_id: Option<String>,
        orders: Vec<u32>,
    },

    /// The parent reference does not resolve
    #[error("Category '{node_id}' references missing parent '{parent_id}'")]
    DanglingParent { node_id: String, parent_id: String },

    /// The parent belongs to another tenant
    #[error("Category '{node_id}' references parent '{parent_id}' of another tenant")]
    CrossTenantParent { node_id: String, parent_id: String },
}

fn parent_label(parent_id: &Option<String>) -> String {
    match parent_id {
        Some(id) => format!("'{}'", id),
        None => "root".to_string(),
    }
}
