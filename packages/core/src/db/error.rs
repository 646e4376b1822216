//! Commit Gateway Error Types
//!
//! This module defines the typed failures a commit gateway reports back to a
//! drag session. Validation failures mean the caller's snapshot was stale;
//! transport failures are opaque.

use crate::models::ValidationError;
use crate::operations::IntegrityError;
use thiserror::Error;

/// Gateway operation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Patched or deleted categories do not exist
    #[error("Categories not found: {}", .ids.join(", "))]
    NodeNotFound { ids: Vec<String> },

    /// Requested parents do not exist
    #[error("Parent categories not found: {}", .ids.join(", "))]
    ParentNotFound { ids: Vec<String> },

    /// Ids or parents resolve to another tenant
    #[error("References cross the tenant boundary: {}", .ids.join(", "))]
    CrossTenantReference { ids: Vec<String> },

    /// The same category appears twice in one patch list
    #[error("Category '{id}' appears more than once in the patch list")]
    DuplicatePatch { id: String },

    /// Applying the patches would break a tree invariant
    #[error("Patch list would corrupt the tree: {0}")]
    IntegrityViolation(#[from] IntegrityError),

    /// A category record failed validation
    #[error("Invalid category: {0}")]
    InvalidNode(#[from] ValidationError),

    /// Connectivity or endpoint failure
    #[error("Transport failure: {0}")]
    Transport(String),
}

impl GatewayError {
    /// Create a NodeNotFound error
    pub fn node_not_found(ids: Vec<String>) -> Self {
        Self::NodeNotFound { ids }
    }

    /// Create a ParentNotFound error
    pub fn parent_not_found(ids: Vec<String>) -> Self {
        Self::ParentNotFound { ids }
    }

    /// Create a CrossTenantReference error
    pub fn cross_tenant_reference(ids: Vec<String>) -> Self {
        Self::CrossTenantReference { ids }
    }

    /// Create a Transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// True for failures caused by an outdated local snapshot
    ///
    /// The remedy is refreshing the node store and letting the user retry;
    /// nothing is retried automatically.
    pub fn is_stale_snapshot(&self) -> bool {
        matches!(
            self,
            Self::NodeNotFound { .. }
                | Self::ParentNotFound { .. }
                | Self::CrossTenantReference { .. }
                | Self::IntegrityViolation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_not_found_message() {
        let err = GatewayError::node_not_found(vec!["c1".to_string(), "c2".to_string()]);
        assert_eq!(format!("{}", err), "Categories not found: c1, c2");
        assert!(err.is_stale_snapshot());
    }

    #[test]
    fn test_transport_is_not_stale() {
        let err = GatewayError::transport("connection reset");
        assert_eq!(format!("{}", err), "Transport failure: connection reset");
        assert!(!err.is_stale_snapshot());
    }

    #[test]
    fn test_integrity_error_converts() {
        let err: GatewayError = IntegrityError::Cycle {
            node_id: "a".to_string(),
        }
        .into();
        assert_eq!(
            format!("{}", err),
            "Patch list would corrupt the tree: Cycle detected through category 'a'"
        );
    }
}
