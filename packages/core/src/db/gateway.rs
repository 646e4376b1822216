//! Commit Gateway Trait
//!
//! The narrow boundary between the reordering engine and whatever persists
//! categories (a database, a REST backend, the in-memory store used in tests).
//!
//! # Contract
//!
//! - **Atomic**: `reorder` applies every patch or none
//! - **Validated**: every `id` and non-null `parent_id` must resolve inside
//!   `tenant_id` before anything is written
//! - **Authoritative**: success returns the full refreshed node list for the
//!   tenant, which replaces the caller's snapshot wholesale
//!
//! Timeouts and retries belong to the implementation's transport, never to
//! the caller.

use crate::db::error::GatewayError;
use crate::models::{CategoryNode, NodePatch};
use async_trait::async_trait;

/// Persistence boundary consumed by drag sessions
///
/// Implementations must be `Send + Sync` so sessions can hold them behind an
/// `Arc` across await points.
#[async_trait]
pub trait CommitGateway: Send + Sync {
    /// Every category of `tenant_id` with its `parent_id` and `order`
    async fn list_nodes(&self, tenant_id: &str) -> Result<Vec<CategoryNode>, GatewayError>;

    /// Atomically apply `patches` and return the refreshed tenant node list
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` / `ParentNotFound` for ids that do not resolve
    /// - `CrossTenantReference` for ids or parents of another tenant
    /// - `Transport` for connectivity or endpoint failures
    async fn reorder(
        &self,
        tenant_id: &str,
        patches: Vec<NodePatch>,
    ) -> Result<Vec<CategoryNode>, GatewayError>;
}
