//! Data Models
//!
//! This module contains the record types shared by every layer:
//!
//! - `CategoryNode` - One category in a tenant's tree
//! - `NodePatch` - A proposed `(parent_id, order)` change for one category
//! - `CategorySnapshot` - Flat, immutable arena of categories keyed by id

mod category;
mod snapshot;

pub use category::{CategoryNode, NodePatch, ValidationError};
pub use snapshot::{sort_nodes, CategorySnapshot};
