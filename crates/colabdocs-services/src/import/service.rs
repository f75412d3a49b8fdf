use std::sync::Arc;

use colabdocs_core::models::ImportSummary;
use colabdocs_core::AppError;
use colabdocs_db::CollaboratorStore;
use colabdocs_storage::StorageClient;

use super::orchestrator::{ImportOrchestrator, ImportOutcome};
use super::placeholders::PlaceholderGenerator;
use crate::archive::{classify_entries, read_archive, ArchiveError, ArchiveLimits};

impl From<ArchiveError> for AppError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::LimitExceeded(message) => AppError::PayloadTooLarge(message),
            other => AppError::ArchiveFormat(other.to_string()),
        }
    }
}

/// Entry point for a bulk import: archive bytes in, outcome out.
#[derive(Clone)]
pub struct ImportService {
    orchestrator: Arc<ImportOrchestrator>,
    limits: ArchiveLimits,
}

impl ImportService {
    pub fn new(
        store: Arc<dyn CollaboratorStore>,
        storage: Arc<dyn StorageClient>,
        placeholders: PlaceholderGenerator,
        limits: ArchiveLimits,
    ) -> Self {
        Self {
            orchestrator: Arc::new(ImportOrchestrator::new(store, storage, placeholders)),
            limits,
        }
    }

    /// Read, classify and import an archive.
    ///
    /// Archive errors abort before anything is written. Classification
    /// errors are listed first in the summary, followed by import errors.
    #[tracing::instrument(skip_all, fields(archive_bytes = bytes.len()))]
    pub async fn import_archive(&self, bytes: Vec<u8>) -> Result<ImportOutcome, AppError> {
        let limits = self.limits;
        let classification = tokio::task::spawn_blocking(move || {
            read_archive(&bytes, &limits).map(|entries| classify_entries(&entries))
        })
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read archive: {}", e)))??;

        tracing::info!(
            groups = classification.groups.len(),
            rejected = classification.errors.len(),
            "Archive classified"
        );

        let summary = ImportSummary::with_errors(classification.errors);
        Ok(self
            .orchestrator
            .run_with_summary(classification.groups, summary)
            .await)
    }
}
