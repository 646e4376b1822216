//! Catalog Core - Category Reordering Engine
//!
//! This crate turns drag-and-drop gestures over a tenant's category tree into
//! minimal, consistent lists of node mutations, and commits them through an
//! external gateway.
//!
//! # Architecture
//!
//! - **Flat snapshot**: the tree is an id-indexed map of `CategoryNode`s; each
//!   node names its parent and its rank among siblings
//! - **Pure planning**: the descendant guard and reorder planner are synchronous
//!   and never mutate the snapshot
//! - **Wholesale replacement**: the node store is swapped for the gateway's
//!   authoritative node list only after a successful commit
//!
//! # Modules
//!
//! - [`models`] - Category nodes, patches and snapshots
//! - [`operations`] - Descendant guard, reorder planner, integrity verifier
//! - [`db`] - Commit gateway trait, in-memory gateway, domain events
//! - [`services`] - Node store and drag session
//! - [`config`] - Environment configuration and seed loading

pub mod config;
pub mod db;
pub mod models;
pub mod operations;
pub mod services;

// Re-export commonly used types
pub use config::{load_seed, CategoryTreeConfig};
pub use db::{CategoryEvent, CommitGateway, GatewayError, InMemoryCategoryStore};
pub use models::*;
pub use operations::{is_descendant, plan, verify_tree, IntegrityError, RejectReason, ReorderPlan};
pub use services::*;
