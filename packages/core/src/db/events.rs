//! Domain Events for category stores
//!
//! Stores emit these events after a write has been applied, following the
//! observer pattern: subscribers (UI bridges, caches, audit logs) learn about
//! changes without coupling to the store implementation.
//!
//! # Event Flow
//!
//! 1. The store applies a write under its lock
//! 2. The lock is released
//! 3. The event is sent on a `tokio::sync::broadcast` channel
//! 4. Every subscriber receives it asynchronously

use crate::models::{CategoryNode, NodePatch};
use serde::{Deserialize, Serialize};

/// Domain events emitted by category stores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CategoryEvent {
    /// A category was appended to a sibling group
    #[serde(rename = "created")]
    NodeCreated { node: CategoryNode },

    /// A patch list was committed atomically
    #[serde(rename = "reordered", rename_all = "camelCase")]
    NodesReordered {
        tenant_id: String,
        patches: Vec<NodePatch>,
    },

    /// A category and its subtree were removed
    #[serde(rename = "deleted", rename_all = "camelCase")]
    NodeDeleted {
        tenant_id: String,
        id: String,
        deleted_ids: Vec<String>,
    },
}

impl CategoryEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &str {
        match self {
            CategoryEvent::NodeCreated { .. } => "category:created",
            CategoryEvent::NodesReordered { .. } => "category:reordered",
            CategoryEvent::NodeDeleted { .. } => "category:deleted",
        }
    }
}
