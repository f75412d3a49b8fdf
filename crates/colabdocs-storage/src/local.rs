use crate::keys::{generate_stored_name, validate_segment};
use crate::traits::{StorageClient, StorageError, StorageResult, StoredFile};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Folders map to directories under `base_path`; stored names are prefixed
/// with a random UUID so repeated uploads of the same file never collide.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/colabdocs/files")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:4000/files")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    fn folder_path(&self, folder_name: &str) -> StorageResult<PathBuf> {
        validate_segment("folder", folder_name)?;
        Ok(self.base_path.join(folder_name))
    }

    fn file_path(&self, folder_name: &str, file_name: &str) -> StorageResult<PathBuf> {
        validate_segment("file", file_name)?;
        Ok(self.folder_path(folder_name)?.join(file_name))
    }

    fn generate_url(&self, folder_name: &str, file_name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            folder_name,
            file_name
        )
    }
}

#[async_trait]
impl StorageClient for LocalStorage {
    async fn create_folder(&self, folder_name: &str) -> StorageResult<()> {
        let path = self.folder_path(folder_name)?;

        fs::create_dir_all(&path).await.map_err(|e| {
            StorageError::FolderFailed(format!(
                "Failed to create folder {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!(folder = %folder_name, "Local storage folder ready");
        Ok(())
    }

    async fn upload_buffer(
        &self,
        data: Vec<u8>,
        file_name: &str,
        folder_name: &str,
        _mime_type: &str,
    ) -> StorageResult<StoredFile> {
        let folder = self.folder_path(folder_name)?;
        if !fs::try_exists(&folder).await.unwrap_or(false) {
            return Err(StorageError::UploadFailed(format!(
                "Folder does not exist: {}",
                folder_name
            )));
        }

        let stored_file_name = generate_stored_name(file_name);
        let path = folder.join(&stored_file_name);
        let size = data.len();
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            folder = %folder_name,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(StoredFile {
            file_url: Some(self.generate_url(folder_name, &stored_file_name)),
            stored_file_name,
        })
    }

    async fn download(&self, folder_name: &str, stored_file_name: &str) -> StorageResult<Vec<u8>> {
        let path = self.file_path(folder_name, stored_file_name)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(format!(
                "{}/{}",
                folder_name, stored_file_name
            )));
        }

        fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })
    }

    async fn delete(&self, folder_name: &str, stored_file_name: &str) -> StorageResult<()> {
        let path = self.file_path(folder_name, stored_file_name)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), "Local storage delete successful");
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<()> {
        let metadata = fs::metadata(&self.base_path).await?;
        if metadata.is_dir() {
            Ok(())
        } else {
            Err(StorageError::ConfigError(format!(
                "{} is not a directory",
                self.base_path.display()
            )))
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
