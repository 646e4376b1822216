//! Persistence Boundary
//!
//! This module holds everything on the far side of a commit:
//!
//! - `CommitGateway` - async trait every persistence backend implements
//! - `GatewayError` - typed validation and transport failures
//! - `CategoryEvent` - domain events broadcast after successful writes
//! - `InMemoryCategoryStore` - reference gateway used by dev tools and tests
//!
//! Persistence schema and REST paths belong to the surrounding application;
//! the engine only depends on the trait.

mod error;
pub mod events;
mod gateway;
mod memory_store;

pub use error::GatewayError;
pub use events::CategoryEvent;
pub use gateway::CommitGateway;
pub use memory_store::{InMemoryCategoryStore, CATEGORY_EVENT_CHANNEL_CAPACITY};
