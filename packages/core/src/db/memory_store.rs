//! In-Memory Category Store
//!
//! A complete `CommitGateway` that keeps every tenant's categories in one
//! `HashMap` behind a `tokio::sync::RwLock`. It backs the dev tools and the
//! test suite, and doubles as the reference for what a persistent gateway has
//! to guarantee.
//!
//! # Atomic Commits
//!
//! `reorder` validates every id and parent, applies the patch list to a
//! cloned tenant view, verifies the tree invariants on that view, and only
//! then writes the patched nodes back. Any failure leaves stored state exactly
//! as it was.
//!
//! # Lifecycle Operations
//!
//! - `create_node` appends to the end of the chosen sibling group
//! - `delete_node` removes a category with its subtree and re-densifies the
//!   sibling group it leaves behind
//! - `insert_nodes` seeds arbitrary, already-ordered trees

use crate::db::error::GatewayError;
use crate::db::events::CategoryEvent;
use crate::db::gateway::CommitGateway;
use crate::models::{sort_nodes, CategoryNode, CategorySnapshot, NodePatch};
use crate::operations::verify_tree;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap, HashSet};
use tokio::sync::{broadcast, RwLock};

/// Broadcast channel capacity for category events.
///
/// Lagging subscribers lose old events; they only need the latest state.
pub const CATEGORY_EVENT_CHANNEL_CAPACITY: usize = 128;

/// Multi-tenant category store held in memory
pub struct InMemoryCategoryStore {
    nodes: RwLock<HashMap<String, CategoryNode>>,
    event_tx: broadcast::Sender<CategoryEvent>,
}

impl Default for InMemoryCategoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCategoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_event_capacity(CATEGORY_EVENT_CHANNEL_CAPACITY)
    }

    /// Create an empty store with a custom event channel capacity
    pub fn with_event_capacity(capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(capacity.max(1));
        Self {
            nodes: RwLock::new(HashMap::new()),
            event_tx,
        }
    }

    /// Subscribe to category events
    ///
    /// Only events emitted after subscribing are received.
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<CategoryEvent> {
        self.event_tx.subscribe()
    }

    fn emit_event(&self, event: CategoryEvent) {
        tracing::trace!("Emitting {}", event.event_type());
        // No subscribers is not an error
        let _ = self.event_tx.send(event);
    }

    /// Seed the store with pre-built nodes
    ///
    /// Nodes replace existing ones with the same id. The combined state must
    /// satisfy every tree invariant or nothing is written. Seeding emits no
    /// events.
    pub async fn insert_nodes(&self, nodes: Vec<CategoryNode>) -> Result<(), GatewayError> {
        for node in &nodes {
            node.validate()?;
        }

        let mut stored = self.nodes.write().await;
        let mut next = stored.clone();
        let count = nodes.len();
        for node in nodes {
            next.insert(node.id.clone(), node);
        }

        verify_tree(&CategorySnapshot::from_nodes("", next.values().cloned()))?;

        *stored = next;
        tracing::debug!("Seeded {} categories ({} total)", count, stored.len());
        Ok(())
    }

    /// Append a new category to the end of its sibling group
    ///
    /// # Errors
    ///
    /// - `ParentNotFound` if `parent_id` does not exist
    /// - `CrossTenantReference` if the parent belongs to another tenant
    /// - `InvalidNode` if `tenant_id` is empty or `properties` is not an object
    pub async fn create_node(
        &self,
        tenant_id: &str,
        parent_id: Option<&str>,
        properties: Value,
    ) -> Result<CategoryNode, GatewayError> {
        let mut nodes = self.nodes.write().await;

        if let Some(parent_id) = parent_id {
            match nodes.get(parent_id) {
                None => return Err(GatewayError::parent_not_found(vec![parent_id.to_string()])),
                Some(parent) if parent.tenant_id != tenant_id => {
                    return Err(GatewayError::cross_tenant_reference(vec![
                        parent_id.to_string()
                    ]))
                }
                Some(_) => {}
            }
        }

        let order = nodes
            .values()
            .filter(|n| n.tenant_id == tenant_id && n.parent_id.as_deref() == parent_id)
            .count() as u32;
        let node = CategoryNode::new(tenant_id, parent_id.map(str::to_string), order, properties);
        node.validate()?;

        nodes.insert(node.id.clone(), node.clone());
        drop(nodes);

        tracing::debug!(
            "Created category '{}' under {:?} at order {}",
            node.id,
            parent_id,
            order
        );
        self.emit_event(CategoryEvent::NodeCreated { node: node.clone() });
        Ok(node)
    }

    /// Delete a category together with its subtree
    ///
    /// The sibling group the category leaves is renumbered `0..n`. Returns the
    /// ids of every removed category, the requested one first.
    pub async fn delete_node(&self, tenant_id: &str, id: &str) -> Result<Vec<String>, GatewayError> {
        let mut nodes = self.nodes.write().await;

        let former_parent = match nodes.get(id) {
            None => return Err(GatewayError::node_not_found(vec![id.to_string()])),
            Some(node) if node.tenant_id != tenant_id => {
                return Err(GatewayError::cross_tenant_reference(vec![id.to_string()]))
            }
            Some(node) => node.parent_id.clone(),
        };

        let mut children_of: HashMap<String, Vec<String>> = HashMap::new();
        for node in nodes.values().filter(|n| n.tenant_id == tenant_id) {
            if let Some(parent_id) = &node.parent_id {
                children_of
                    .entry(parent_id.clone())
                    .or_default()
                    .push(node.id.clone());
            }
        }

        let mut deleted = vec![id.to_string()];
        let mut visited: HashSet<String> = deleted.iter().cloned().collect();
        let mut cursor = 0;
        while cursor < deleted.len() {
            if let Some(children) = children_of.get(&deleted[cursor]) {
                for child in children {
                    if visited.insert(child.clone()) {
                        deleted.push(child.clone());
                    }
                }
            }
            cursor += 1;
        }

        for removed in &deleted {
            nodes.remove(removed);
        }

        let now = Utc::now();
        let mut siblings: Vec<&mut CategoryNode> = nodes
            .values_mut()
            .filter(|n| n.tenant_id == tenant_id && n.parent_id == former_parent)
            .collect();
        siblings.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        for (idx, sibling) in siblings.into_iter().enumerate() {
            let order = idx as u32;
            if sibling.order != order {
                sibling.order = order;
                sibling.modified_at = now;
            }
        }
        drop(nodes);

        tracing::debug!("Deleted category '{}' ({} removed)", id, deleted.len());
        self.emit_event(CategoryEvent::NodeDeleted {
            tenant_id: tenant_id.to_string(),
            id: id.to_string(),
            deleted_ids: deleted.clone(),
        });
        Ok(deleted)
    }
}

#[async_trait]
impl CommitGateway for InMemoryCategoryStore {
    async fn list_nodes(&self, tenant_id: &str) -> Result<Vec<CategoryNode>, GatewayError> {
        let nodes = self.nodes.read().await;
        Ok(tenant_nodes(&nodes, tenant_id))
    }

    async fn reorder(
        &self,
        tenant_id: &str,
        patches: Vec<NodePatch>,
    ) -> Result<Vec<CategoryNode>, GatewayError> {
        let mut nodes = self.nodes.write().await;

        if let Err(e) = validate_patches(&nodes, tenant_id, &patches) {
            tracing::debug!("Rejected patch list for tenant '{}': {}", tenant_id, e);
            return Err(e);
        }

        if patches.is_empty() {
            return Ok(tenant_nodes(&nodes, tenant_id));
        }

        let view = CategorySnapshot::from_nodes(
            tenant_id,
            nodes.values().filter(|n| n.tenant_id == tenant_id).cloned(),
        );
        let patched = view.with_patches(&patches, Utc::now());
        verify_tree(&patched)?;

        for patch in &patches {
            if let Some(node) = patched.get(&patch.id) {
                nodes.insert(patch.id.clone(), node.clone());
            }
        }
        let refreshed = tenant_nodes(&nodes, tenant_id);
        drop(nodes);

        tracing::info!(
            "Committed {} category patch(es) for tenant '{}'",
            patches.len(),
            tenant_id
        );
        self.emit_event(CategoryEvent::NodesReordered {
            tenant_id: tenant_id.to_string(),
            patches,
        });
        Ok(refreshed)
    }
}

/// Check ids and parents before anything is written
fn validate_patches(
    nodes: &HashMap<String, CategoryNode>,
    tenant_id: &str,
    patches: &[NodePatch],
) -> Result<(), GatewayError> {
    let mut seen = HashSet::new();
    for patch in patches {
        if !seen.insert(patch.id.as_str()) {
            return Err(GatewayError::DuplicatePatch {
                id: patch.id.clone(),
            });
        }
    }

    let missing: BTreeSet<&str> = patches
        .iter()
        .map(|p| p.id.as_str())
        .filter(|id| !nodes.contains_key(*id))
        .collect();
    if !missing.is_empty() {
        return Err(GatewayError::node_not_found(to_owned_ids(missing)));
    }

    let missing_parents: BTreeSet<&str> = patches
        .iter()
        .filter_map(|p| p.parent_id.as_deref())
        .filter(|id| !nodes.contains_key(*id))
        .collect();
    if !missing_parents.is_empty() {
        return Err(GatewayError::parent_not_found(to_owned_ids(missing_parents)));
    }

    let foreign: BTreeSet<&str> = patches
        .iter()
        .flat_map(|p| std::iter::once(p.id.as_str()).chain(p.parent_id.as_deref()))
        .filter(|id| nodes.get(*id).is_some_and(|n| n.tenant_id != tenant_id))
        .collect();
    if !foreign.is_empty() {
        return Err(GatewayError::cross_tenant_reference(to_owned_ids(foreign)));
    }

    Ok(())
}

fn to_owned_ids(ids: BTreeSet<&str>) -> Vec<String> {
    ids.into_iter().map(str::to_string).collect()
}

fn tenant_nodes(nodes: &HashMap<String, CategoryNode>, tenant_id: &str) -> Vec<CategoryNode> {
    let mut list: Vec<CategoryNode> = nodes
        .values()
        .filter(|n| n.tenant_id == tenant_id)
        .cloned()
        .collect();
    sort_nodes(&mut list);
    list
}
