//! Application state shared by all handlers.

use colabdocs_core::Config;
use colabdocs_db::CollaboratorStore;
use colabdocs_services::{ArchiveLimits, ImportService, PlaceholderGenerator};
use colabdocs_storage::StorageClient;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn CollaboratorStore>,
    pub storage: Arc<dyn StorageClient>,
    pub import_service: ImportService,
}

impl AppState {
    /// Wire the import service to the given store and storage backend.
    pub fn new(
        config: Config,
        store: Arc<dyn CollaboratorStore>,
        storage: Arc<dyn StorageClient>,
    ) -> Self {
        let limits = ArchiveLimits {
            max_entries: config.max_archive_entries(),
            max_entry_size: config.max_entry_size_bytes(),
            max_total_size: config.max_total_uncompressed_bytes(),
        };
        let import_service = ImportService::new(
            store.clone(),
            storage.clone(),
            PlaceholderGenerator::new(config.placeholder_email_domain()),
            limits,
        );

        Self {
            config,
            store,
            storage,
            import_service,
        }
    }
}
