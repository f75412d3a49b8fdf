//! Storage abstraction trait
//!
//! This module defines the `StorageClient` trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Folder creation failed: {0}")]
    FolderFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage name: {0}")]
    InvalidName(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A file accepted by the storage service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Name under which the service stored the file (may differ from the uploaded name).
    pub stored_file_name: String,
    /// URL for the stored file, when the backend exposes one.
    pub file_url: Option<String>,
}

/// Storage abstraction trait
///
/// The import orchestrator talks to file storage only through this trait, so
/// the remote HTTP API and the local filesystem backend are interchangeable.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Create a folder. Creating a folder that already exists succeeds.
    async fn create_folder(&self, folder_name: &str) -> StorageResult<()>;

    /// Upload an in-memory buffer into a folder.
    ///
    /// The buffer is consumed; the returned `StoredFile` carries the name the
    /// backend assigned to it.
    async fn upload_buffer(
        &self,
        data: Vec<u8>,
        file_name: &str,
        folder_name: &str,
        mime_type: &str,
    ) -> StorageResult<StoredFile>;

    /// Download a stored file.
    ///
    /// `download` and `delete` complete the storage API surface for callers
    /// that read back or remove imported documents; the import itself only
    /// creates folders and uploads.
    async fn download(&self, folder_name: &str, stored_file_name: &str) -> StorageResult<Vec<u8>>;

    /// Delete a stored file. Deleting a missing file succeeds.
    async fn delete(&self, folder_name: &str, stored_file_name: &str) -> StorageResult<()>;

    /// Cheap reachability probe used by the health endpoint
    async fn health_check(&self) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
