//! Remote file-storage HTTP API client
//!
//! Endpoints (relative to the configured base URL):
//!
//! - `POST /folders` with JSON `{"folderName": "..."}`
//! - `POST /files` multipart with fields `folderName` and `file`,
//!   answering `{"success": true, "fileName": "...", "fileUrl": "..."}`
//! - `GET /files/{folder}/{file}` and `DELETE /files/{folder}/{file}`
//! - `GET /health`
//!
//! Certificate verification is always on. Storage hosts signed by an
//! internal CA are trusted by adding that CA through `ca_cert_pem`.

use crate::keys::validate_segment;
use crate::traits::{StorageClient, StorageError, StorageResult, StoredFile};
use crate::StorageBackend;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{multipart, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

/// Options for building an `HttpStorage`
#[derive(Clone, Default)]
pub struct HttpStorageOptions {
    pub base_url: String,
    pub api_token: Option<String>,
    /// PEM-encoded root certificate to trust in addition to the system roots.
    pub ca_cert_pem: Option<Vec<u8>>,
    pub timeout: Option<Duration>,
}

/// Storage backed by the remote file-storage HTTP API
#[derive(Clone)]
pub struct HttpStorage {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl Debug for HttpStorage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("HttpStorage")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateFolderRequest<'a> {
    folder_name: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageApiResponse {
    #[serde(default)]
    success: bool,
    #[serde(default, alias = "storedFileName")]
    file_name: Option<String>,
    #[serde(default)]
    file_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl HttpStorage {
    pub fn new(options: HttpStorageOptions) -> StorageResult<Self> {
        let mut builder = Client::builder()
            .timeout(options.timeout.unwrap_or(Duration::from_secs(60)))
            .user_agent(concat!("colabdocs/", env!("CARGO_PKG_VERSION")));

        if let Some(pem) = options.ca_cert_pem.as_deref() {
            let cert = reqwest::Certificate::from_pem(pem).map_err(|e| {
                StorageError::ConfigError(format!("Invalid storage CA certificate: {}", e))
            })?;
            builder = builder.add_root_certificate(cert);
        }

        let client = builder.build().map_err(|e| {
            StorageError::ConfigError(format!("Failed to create HTTP client for storage: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            api_token: options.api_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn file_url(&self, folder_name: &str, file_name: &str) -> String {
        self.url(&format!(
            "/files/{}/{}",
            utf8_percent_encode(folder_name, NON_ALPHANUMERIC),
            utf8_percent_encode(file_name, NON_ALPHANUMERIC)
        ))
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Extract the most useful error text from a failed response.
    async fn failure_message(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<StorageApiResponse>(&body) {
            Ok(StorageApiResponse {
                error: Some(error), ..
            }) => format!("{} ({})", error, status),
            _ if body.is_empty() => format!("HTTP {}", status),
            _ => format!("HTTP {}: {}", status, truncate(&body, 200)),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[async_trait]
impl StorageClient for HttpStorage {
    #[tracing::instrument(skip(self), fields(storage.operation = "create_folder"))]
    async fn create_folder(&self, folder_name: &str) -> StorageResult<()> {
        validate_segment("folder", folder_name)?;

        let response = self
            .authorized(self.client.post(self.url("/folders")))
            .json(&CreateFolderRequest { folder_name })
            .send()
            .await
            .map_err(|e| StorageError::FolderFailed(e.to_string()))?;

        if response.status() == StatusCode::CONFLICT {
            tracing::debug!(folder = %folder_name, "Storage folder already exists");
            return Ok(());
        }
        if !response.status().is_success() {
            return Err(StorageError::FolderFailed(
                Self::failure_message(response).await,
            ));
        }

        Ok(())
    }

    #[tracing::instrument(skip(self, data), fields(storage.operation = "upload", size_bytes = data.len()))]
    async fn upload_buffer(
        &self,
        data: Vec<u8>,
        file_name: &str,
        folder_name: &str,
        mime_type: &str,
    ) -> StorageResult<StoredFile> {
        validate_segment("folder", folder_name)?;

        let start = std::time::Instant::now();
        let part = multipart::Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .map_err(|e| StorageError::UploadFailed(format!("Invalid MIME type: {}", e)))?;
        let form = multipart::Form::new()
            .text("folderName", folder_name.to_string())
            .part("file", part);

        let response = self
            .authorized(self.client.post(self.url("/files")))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::UploadFailed(
                Self::failure_message(response).await,
            ));
        }

        let body: StorageApiResponse = response
            .json()
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Invalid storage response: {}", e)))?;

        if !body.success {
            return Err(StorageError::UploadFailed(
                body.error
                    .unwrap_or_else(|| "Storage rejected the upload".to_string()),
            ));
        }

        let stored_file_name = body.file_name.ok_or_else(|| {
            StorageError::UploadFailed("Storage response did not include a file name".to_string())
        })?;

        tracing::info!(
            folder = %folder_name,
            stored_file_name = %stored_file_name,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Storage upload successful"
        );

        Ok(StoredFile {
            stored_file_name,
            file_url: body.file_url,
        })
    }

    async fn download(&self, folder_name: &str, stored_file_name: &str) -> StorageResult<Vec<u8>> {
        validate_segment("folder", folder_name)?;
        validate_segment("file", stored_file_name)?;

        let response = self
            .authorized(self.client.get(self.file_url(folder_name, stored_file_name)))
            .send()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(format!(
                "{}/{}",
                folder_name, stored_file_name
            )));
        }
        if !response.status().is_success() {
            return Err(StorageError::DownloadFailed(
                Self::failure_message(response).await,
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn delete(&self, folder_name: &str, stored_file_name: &str) -> StorageResult<()> {
        validate_segment("folder", folder_name)?;
        validate_segment("file", stored_file_name)?;

        let response = self
            .authorized(self.client.delete(self.file_url(folder_name, stored_file_name)))
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed(e.to_string()))?;

        if response.status().is_success() || response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Err(StorageError::DeleteFailed(
            Self::failure_message(response).await,
        ))
    }

    async fn health_check(&self) -> StorageResult<()> {
        let response = self
            .authorized(self.client.get(self.url("/health")))
            .send()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(StorageError::BackendError(format!(
                "HTTP {}",
                response.status()
            )))
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Http
    }
}
