//! Category tree configuration
//!
//! Settings come from environment variables with fallbacks:
//!
//! - `CATEGORY_TENANT_ID`: tenant whose tree is loaded (default: `default`)
//! - `CATEGORY_EVENT_CAPACITY`: event broadcast channel capacity (default: 128)
//! - `CATEGORY_SEED_PATH`: optional JSON file of seed categories

use crate::db::CATEGORY_EVENT_CHANNEL_CAPACITY;
use crate::models::CategoryNode;
use anyhow::Context;
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_TENANT_ID: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTreeConfig {
    pub tenant_id: String,
    pub event_channel_capacity: usize,
    pub seed_path: Option<PathBuf>,
}

impl Default for CategoryTreeConfig {
    fn default() -> Self {
        Self {
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            event_channel_capacity: CATEGORY_EVENT_CHANNEL_CAPACITY,
            seed_path: None,
        }
    }
}

impl CategoryTreeConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through `lookup`
    ///
    /// Missing, empty or unparsable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            tenant_id: non_empty("CATEGORY_TENANT_ID").unwrap_or(defaults.tenant_id),
            event_channel_capacity: non_empty("CATEGORY_EVENT_CAPACITY")
                .and_then(|c| c.trim().parse::<usize>().ok())
                .filter(|c| *c > 0)
                .unwrap_or(defaults.event_channel_capacity),
            seed_path: non_empty("CATEGORY_SEED_PATH").map(PathBuf::from),
        }
    }
}

/// Load seed categories from a JSON array file
pub fn load_seed(path: impl AsRef<Path>) -> anyhow::Result<Vec<CategoryNode>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    let nodes: Vec<CategoryNode> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse seed file {}", path.display()))?;
    tracing::debug!("Loaded {} seed categories from {}", nodes.len(), path.display());
    Ok(nodes)
}
