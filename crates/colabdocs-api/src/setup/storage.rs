//! Storage setup and initialization

use anyhow::{Context, Result};
use colabdocs_core::Config;
use colabdocs_storage::{create_storage, StorageClient};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn StorageClient>> {
    tracing::info!("Initializing storage client...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage")?;
    tracing::info!(
        backend = %storage.backend_type(),
        "Storage client initialized successfully"
    );
    Ok(storage)
}
