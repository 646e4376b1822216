//! Category Data Structures
//!
//! This module defines `CategoryNode`, the single record type of a tenant's
//! category tree, and `NodePatch`, the unit of mutation produced by the
//! reorder planner and consumed by a commit gateway.
//!
//! # Tree Shape
//!
//! - **Flat storage**: nodes reference their parent through `parent_id`; there
//!   is no nested structure and no child list.
//! - **Sibling groups**: all nodes sharing a `parent_id` (including `None` for
//!   roots) form one group whose `order` values are exactly `0..n`.
//! - **Tenant scope**: a parent reference never crosses `tenant_id`.
//!
//! # Examples
//!
//! ```rust
//! use catalog_core::models::CategoryNode;
//! use serde_json::json;
//!
//! let brands = CategoryNode::new("tenant-a", None, 0, json!({ "name": "Brands" }));
//! let shoes = CategoryNode::new(
//!     "tenant-a",
//!     Some(brands.id.clone()),
//!     0,
//!     json!({ "name": "Shoes" }),
//! );
//! assert!(brands.is_root());
//! assert_eq!(shoes.parent_id.as_deref(), Some(brands.id.as_str()));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for category records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid parent reference: {0}")]
    InvalidParent(String),

    #[error("Properties validation failed: {0}")]
    InvalidProperties(String),
}

/// One category in a tenant's tree.
///
/// # Fields
///
/// - `id`: Opaque identifier, stable for the node's lifetime
/// - `parent_id`: Parent category, `None` for root-level categories
/// - `order`: Rank inside the sibling group, dense and zero-based
/// - `tenant_id`: Scoping key shared by the node and its parent
/// - `created_at` / `modified_at`: Maintained by the store
/// - `properties`: Display fields (name, color, translations) carried opaquely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    /// Unique identifier
    pub id: String,

    /// Parent category ID (`None` = root-level)
    pub parent_id: Option<String>,

    /// Rank within the sibling group
    pub order: u32,

    /// Tenant that owns this category
    pub tenant_id: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp (bumped when a commit moves the node)
    pub modified_at: DateTime<Utc>,

    /// Display fields, never inspected by the reordering engine
    #[serde(default = "empty_properties")]
    pub properties: serde_json::Value,
}

fn empty_properties() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl CategoryNode {
    /// Create a new category with an auto-generated UUID
    ///
    /// The caller chooses `order`; stores that append nodes use the current
    /// size of the sibling group.
    pub fn new(
        tenant_id: impl Into<String>,
        parent_id: Option<String>,
        order: u32,
        properties: serde_json::Value,
    ) -> Self {
        Self::with_id(
            Uuid::new_v4().to_string(),
            tenant_id,
            parent_id,
            order,
            properties,
        )
    }

    /// Create a new category with an explicit ID
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use catalog_core::models::CategoryNode;
    /// # use serde_json::json;
    /// let node = CategoryNode::with_id("shoes", "tenant-a", Some("brands".to_string()), 2, json!({}));
    /// assert_eq!(node.id, "shoes");
    /// assert_eq!(node.order, 2);
    /// ```
    pub fn with_id(
        id: impl Into<String>,
        tenant_id: impl Into<String>,
        parent_id: Option<String>,
        order: u32,
        properties: serde_json::Value,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: id.into(),
            parent_id,
            order,
            tenant_id: tenant_id.into(),
            created_at: now,
            modified_at: now,
            properties,
        }
    }

    /// True when the node sits in the root sibling group
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// True when `patch` would change this node's position
    pub fn differs_from(&self, patch: &NodePatch) -> bool {
        self.parent_id != patch.parent_id || self.order != patch.order
    }

    /// Move this node to the position described by `patch`
    pub fn apply_patch(&mut self, patch: &NodePatch, now: DateTime<Utc>) {
        self.parent_id = patch.parent_id.clone();
        self.order = patch.order;
        self.modified_at = now;
    }

    /// Validate record structure
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - `id` or `tenant_id` is empty
    /// - `properties` is not a JSON object
    /// - The node references itself as parent
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingField("id".to_string()));
        }

        if self.tenant_id.is_empty() {
            return Err(ValidationError::MissingField("tenant_id".to_string()));
        }

        if !self.properties.is_object() {
            return Err(ValidationError::InvalidProperties(
                "properties must be a JSON object".to_string(),
            ));
        }

        if self.parent_id.as_deref() == Some(self.id.as_str()) {
            return Err(ValidationError::InvalidParent(
                "Category cannot be its own parent".to_string(),
            ));
        }

        Ok(())
    }
}

/// A proposed position change for one category.
///
/// Produced by the reorder planner and sent to a commit gateway as one element
/// of an atomic batch. Serialized as `{ "id", "parentId", "order" }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePatch {
    pub id: String,
    pub parent_id: Option<String>,
    pub order: u32,
}

impl NodePatch {
    pub fn new(id: impl Into<String>, parent_id: Option<String>, order: u32) -> Self {
        Self {
            id: id.into(),
            parent_id,
            order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_generates_uuid() {
        let a = CategoryNode::new("tenant", None, 0, json!({}));
        let b = CategoryNode::new("tenant", None, 1, json!({}));
        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
        assert_eq!(a.created_at, a.modified_at);
    }

    #[test]
    fn test_validate_rejects_self_parent() {
        let node = CategoryNode::with_id("x", "tenant", Some("x".to_string()), 0, json!({}));
        assert!(matches!(
            node.validate(),
            Err(ValidationError::InvalidParent(_))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_tenant_and_bad_properties() {
        let node = CategoryNode::with_id("x", "", None, 0, json!({}));
        assert_eq!(
            node.validate(),
            Err(ValidationError::MissingField("tenant_id".to_string()))
        );

        let node = CategoryNode::with_id("x", "tenant", None, 0, json!([1, 2]));
        assert!(matches!(
            node.validate(),
            Err(ValidationError::InvalidProperties(_))
        ));
    }

    #[test]
    fn test_apply_patch_moves_node() {
        let mut node = CategoryNode::with_id("c1", "tenant", None, 3, json!({}));
        let patch = NodePatch::new("c1", Some("r1".to_string()), 0);
        assert!(node.differs_from(&patch));

        let later = node.modified_at + chrono::Duration::seconds(5);
        node.apply_patch(&patch, later);

        assert_eq!(node.parent_id.as_deref(), Some("r1"));
        assert_eq!(node.order, 0);
        assert_eq!(node.modified_at, later);
        assert!(!node.differs_from(&patch));
    }

    /// The gateway wire format is camelCase with an explicit null parent.
    #[test]
    fn test_patch_serialization_contract() {
        let patch = NodePatch::new("c2", None, 4);
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({ "id": "c2", "parentId": null, "order": 4 }));

        let node: CategoryNode = serde_json::from_value(json!({
            "id": "r1",
            "parentId": null,
            "order": 0,
            "tenantId": "tenant",
            "createdAt": "2025-01-03T00:00:00Z",
            "modifiedAt": "2025-01-03T00:00:00Z"
        }))
        .unwrap();
        assert!(node.is_root());
        assert_eq!(node.properties, json!({}));
    }
}
