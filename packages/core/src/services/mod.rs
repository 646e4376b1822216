//! Business Services
//!
//! - `NodeStore` - shared, wholesale-replaced snapshot of one tenant's tree
//! - `DragSession` - gesture state machine that plans and commits reorders
//!
//! Services coordinate the pure planning operations with the commit gateway.

pub mod drag_session;
pub mod error;
pub mod node_store;

pub use drag_session::{DragSession, DragState, DropOutcome};
pub use error::SessionError;
pub use node_store::NodeStore;
