//! Node Store - shared snapshot holder
//!
//! The node store owns the current `CategorySnapshot` of one tenant behind an
//! `Arc`. Readers clone the `Arc` and keep a consistent view for as long as
//! they need it (a tree render, a planning pass). Writers never patch the
//! snapshot in place: a successful commit or an explicit refresh swaps in a
//! whole new snapshot built from the gateway's authoritative node list.
//!
//! Replacement is crate-private: only a drag session's commit and refresh
//! paths may swap the snapshot.

use crate::db::{CommitGateway, GatewayError};
use crate::models::{CategoryNode, CategorySnapshot};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Current category snapshot of one tenant
#[derive(Debug)]
pub struct NodeStore {
    tenant_id: String,
    current: RwLock<Arc<CategorySnapshot>>,
}

impl NodeStore {
    /// Create a store holding an empty snapshot
    pub fn new(tenant_id: impl Into<String>) -> Self {
        let tenant_id = tenant_id.into();
        let snapshot = CategorySnapshot::new(tenant_id.clone());
        Self {
            tenant_id,
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Create a store from an already-fetched node list
    pub fn from_nodes(tenant_id: impl Into<String>, nodes: Vec<CategoryNode>) -> Self {
        let tenant_id = tenant_id.into();
        let snapshot = CategorySnapshot::from_nodes(tenant_id.clone(), nodes);
        Self {
            tenant_id,
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Create a store populated from `gateway.list_nodes(tenant_id)`
    pub async fn load<G>(tenant_id: impl Into<String>, gateway: &G) -> Result<Self, GatewayError>
    where
        G: CommitGateway + ?Sized,
    {
        let tenant_id = tenant_id.into();
        let nodes = gateway.list_nodes(&tenant_id).await?;
        tracing::debug!(
            "Loaded {} categories for tenant '{}'",
            nodes.len(),
            tenant_id
        );
        Ok(Self::from_nodes(tenant_id, nodes))
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// The current snapshot
    ///
    /// The returned `Arc` stays valid and unchanged even if the store is
    /// replaced afterwards.
    pub async fn snapshot(&self) -> Arc<CategorySnapshot> {
        self.current.read().await.clone()
    }

    /// Swap in a snapshot built from `nodes`
    pub(crate) async fn replace(&self, nodes: Vec<CategoryNode>) -> Arc<CategorySnapshot> {
        let next = Arc::new(CategorySnapshot::from_nodes(self.tenant_id.clone(), nodes));
        *self.current.write().await = next.clone();
        next
    }

    /// Re-fetch the tenant's nodes and swap them in
    ///
    /// On failure the current snapshot is kept.
    pub(crate) async fn refresh<G>(&self, gateway: &G) -> Result<Arc<CategorySnapshot>, GatewayError>
    where
        G: CommitGateway + ?Sized,
    {
        let nodes = gateway.list_nodes(&self.tenant_id).await?;
        Ok(self.replace(nodes).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryCategoryStore;
    use serde_json::json;

    fn node(id: &str, parent: Option<&str>, order: u32) -> CategoryNode {
        CategoryNode::with_id(id, "tenant", parent.map(str::to_string), order, json!({}))
    }

    #[tokio::test]
    async fn test_snapshot_survives_replacement() {
        let store = NodeStore::from_nodes("tenant", vec![node("r1", None, 0)]);
        let before = store.snapshot().await;

        store
            .replace(vec![node("r1", None, 0), node("r2", None, 1)])
            .await;

        assert_eq!(before.len(), 1);
        assert_eq!(store.snapshot().await.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_snapshot() {
        struct Unreachable;

        #[async_trait::async_trait]
        impl CommitGateway for Unreachable {
            async fn list_nodes(&self, _: &str) -> Result<Vec<CategoryNode>, GatewayError> {
                Err(GatewayError::transport("unreachable"))
            }

            async fn reorder(
                &self,
                _: &str,
                _: Vec<crate::models::NodePatch>,
            ) -> Result<Vec<CategoryNode>, GatewayError> {
                Err(GatewayError::transport("unreachable"))
            }
        }

        let store = NodeStore::from_nodes("tenant", vec![node("r1", None, 0)]);
        let before = store.snapshot().await;

        let err = store.refresh(&Unreachable).await.unwrap_err();
        assert_eq!(err, GatewayError::transport("unreachable"));
        assert!(Arc::ptr_eq(&before, &store.snapshot().await));
    }

    #[tokio::test]
    async fn test_load_and_refresh_from_gateway() {
        let gateway = InMemoryCategoryStore::new();
        gateway
            .insert_nodes(vec![node("r1", None, 0)])
            .await
            .unwrap();

        let store = NodeStore::load("tenant", &gateway).await.unwrap();
        assert_eq!(store.tenant_id(), "tenant");
        assert!(store.snapshot().await.contains("r1"));

        gateway.create_node("tenant", None, json!({})).await.unwrap();
        let refreshed = store.refresh(&gateway).await.unwrap();
        assert_eq!(refreshed.len(), 2);
        assert!(Arc::ptr_eq(&refreshed, &store.snapshot().await));
    }
}
