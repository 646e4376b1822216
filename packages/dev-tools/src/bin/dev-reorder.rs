//! Development Reorder Binary
//!
//! Runs one drag-and-drop gesture against an in-memory category store and
//! prints the resulting tree as JSON. Useful for checking how a drop is
//! planned without a running admin panel.
//!
//! # Usage
//!
//! ```bash
//! CATEGORY_SEED_PATH=./seed.json cargo run --bin dev-reorder -- c2 c1
//!
//! # Override the environment for one run
//! cargo run --bin dev-reorder -- --tenant shop-1 --seed ./seed.json c2 c1
//! ```
//!
//! # Environment Variables
//!
//! - `CATEGORY_TENANT_ID`: Tenant to load (default: `default`)
//! - `CATEGORY_EVENT_CAPACITY`: Event channel capacity (default: 128)
//! - `CATEGORY_SEED_PATH`: JSON array of categories to seed the store with
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")
//!
//! Command-line flags take precedence over the environment. Logs go to stderr
//! so stdout stays valid JSON.

use std::path::PathBuf;
use std::sync::Arc;

use catalog_core::db::InMemoryCategoryStore;
use catalog_core::operations::ancestors;
use catalog_core::services::{DragSession, DropOutcome, NodeStore};
use catalog_core::{load_seed, CategoryTreeConfig};
use clap::Parser;

/// Drop one category onto another and print the resulting tree
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Id of the category being dragged
    dragged_id: String,

    /// Id of the category it is dropped onto
    target_id: String,

    /// Tenant to load, overrides CATEGORY_TENANT_ID
    #[arg(short, long)]
    tenant: Option<String>,

    /// Seed file, overrides CATEGORY_SEED_PATH
    #[arg(short, long)]
    seed: Option<PathBuf>,
}

impl Args {
    /// Environment configuration with command-line overrides applied
    fn apply_to(&self, mut config: CategoryTreeConfig) -> CategoryTreeConfig {
        if let Some(tenant) = &self.tenant {
            config.tenant_id = tenant.clone();
        }
        if let Some(seed) = &self.seed {
            config.seed_path = Some(seed.clone());
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = args.apply_to(CategoryTreeConfig::from_env());
    tracing::info!("Tenant: {}", config.tenant_id);

    let gateway = Arc::new(InMemoryCategoryStore::with_event_capacity(
        config.event_channel_capacity,
    ));
    match &config.seed_path {
        Some(path) => {
            tracing::info!("Seed: {}", path.display());
            gateway.insert_nodes(load_seed(path)?).await?;
        }
        None => tracing::warn!("No seed file given, starting from an empty tree"),
    }

    let store = Arc::new(NodeStore::load(config.tenant_id.clone(), gateway.as_ref()).await?);
    let mut session = DragSession::new(store.clone(), gateway);

    session.start(args.dragged_id.clone())?;
    session.hover(args.target_id.clone())?;
    match session.release().await? {
        DropOutcome::Committed { patches } => {
            tracing::info!("Committed {} patch(es)", patches.len());
            for patch in &patches {
                tracing::info!(
                    "  {} -> parent {:?}, order {}",
                    patch.id,
                    patch.parent_id,
                    patch.order
                );
            }
        }
        DropOutcome::Unchanged => tracing::info!("Drop leaves the tree unchanged"),
        DropOutcome::Rejected(reason) => tracing::warn!("Drop rejected: {}", reason),
        DropOutcome::Cancelled => tracing::info!("Drop cancelled"),
    }

    let snapshot = store.snapshot().await;
    if snapshot.contains(&args.dragged_id) {
        let path: Vec<&str> = ancestors(&snapshot, &args.dragged_id)
            .into_iter()
            .rev()
            .map(|n| n.id.as_str())
            .collect();
        tracing::info!(
            "'{}' now at depth {} (path: {:?})",
            args.dragged_id,
            path.len(),
            path
        );
    }
    println!("{}", serde_json::to_string_pretty(&snapshot.to_sorted_vec())?);

    Ok(())
}
