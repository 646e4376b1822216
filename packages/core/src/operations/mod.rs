//! Reordering Operations
//!
//! Pure, synchronous building blocks of the reordering engine:
//!
//! - `descendant_guard` - Bounded upward walk answering "is B below A?"
//! - `reorder_planner` - Drag gesture to minimal patch list
//! - `integrity` - Acyclicity, order density and tenant-scope verification
//!
//! Nothing in this module performs I/O or holds locks; callers pass an
//! immutable `CategorySnapshot`.

pub mod descendant_guard;
pub mod error;
pub mod integrity;
pub mod reorder_planner;

pub use descendant_guard::{ancestors, depth, is_descendant};
pub use error::{IntegrityError, RejectReason};
pub use integrity::verify_tree;
pub use reorder_planner::{plan, ReorderPlan};
