#[cfg(feature = "storage-http")]
use crate::{HttpStorage, HttpStorageOptions};
#[cfg(feature = "storage-local")]
use crate::LocalStorage;
use crate::{StorageBackend, StorageClient, StorageError, StorageResult};
use colabdocs_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn StorageClient>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-http")]
        StorageBackend::Http => {
            let base_url = config.storage_api_url().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("STORAGE_API_URL not configured".to_string())
            })?;

            let ca_cert_pem = match config.storage_ca_cert_path() {
                Some(path) => Some(tokio::fs::read(path).await.map_err(|e| {
                    StorageError::ConfigError(format!(
                        "Failed to read STORAGE_CA_CERT_PATH {}: {}",
                        path, e
                    ))
                })?),
                None => None,
            };

            let storage = HttpStorage::new(HttpStorageOptions {
                base_url,
                api_token: config.storage_api_token().map(String::from),
                ca_cert_pem,
                timeout: Some(std::time::Duration::from_secs(config.storage_timeout_secs())),
            })?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-http"))]
        StorageBackend::Http => Err(StorageError::ConfigError(
            "HTTP storage backend not available (storage-http feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config
                .local_storage_path()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
                })?;
            let base_url = config
                .local_storage_base_url()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
                })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
