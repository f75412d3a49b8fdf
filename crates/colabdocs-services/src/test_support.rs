//! In-memory store and storage doubles plus a ZIP fixture builder.

use async_trait::async_trait;
use chrono::Utc;
use colabdocs_core::models::{Collaborator, CollaboratorDocument, NewCollaborator, NewDocument};
use colabdocs_core::AppError;
use colabdocs_db::CollaboratorStore;
use colabdocs_storage::{StorageBackend, StorageClient, StorageError, StorageResult, StoredFile};
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
pub enum Compression {
    Stored,
    Deflated,
    Directory,
}

/// Build a ZIP archive with the `zip` crate.
pub fn build_zip(entries: &[(&str, &[u8], Compression)]) -> Vec<u8> {
    use zip::write::FileOptions;
    use zip::CompressionMethod;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (path, content, compression) in entries {
        match compression {
            Compression::Directory => {
                writer
                    .add_directory(path.trim_end_matches('/'), FileOptions::default())
                    .unwrap();
            }
            Compression::Stored | Compression::Deflated => {
                let method = match compression {
                    Compression::Stored => CompressionMethod::Stored,
                    _ => CompressionMethod::Deflated,
                };
                writer
                    .start_file(*path, FileOptions::default().compression_method(method))
                    .unwrap();
                writer.write_all(content).unwrap();
            }
        }
    }
    writer.finish().unwrap().into_inner()
}

/// In-memory `CollaboratorStore`
#[derive(Clone, Default)]
pub struct MockStore {
    pub greatest: Arc<Mutex<Option<String>>>,
    pub fail_greatest: Arc<Mutex<bool>>,
    pub collaborators: Arc<Mutex<Vec<Collaborator>>>,
    pub documents: Arc<Mutex<Vec<CollaboratorDocument>>>,
    pub folders: Arc<Mutex<HashMap<Uuid, String>>>,
    /// Names whose insert should fail.
    pub reject_names: Arc<Mutex<HashSet<String>>>,
    pub fail_all_inserts: Arc<Mutex<bool>>,
    pub attempted_identifiers: Arc<Mutex<Vec<String>>>,
    pub calls: Arc<Mutex<usize>>,
}

impl MockStore {
    pub fn with_greatest(identifier: &str) -> Self {
        let store = Self::default();
        *store.greatest.lock().unwrap() = Some(identifier.to_string());
        store
    }

    pub fn reject(&self, name: &str) {
        self.reject_names.lock().unwrap().insert(name.to_string());
    }

    fn touch(&self) {
        *self.calls.lock().unwrap() += 1;
    }
}

#[async_trait]
impl CollaboratorStore for MockStore {
    async fn greatest_identifier(&self) -> Result<Option<String>, AppError> {
        self.touch();
        if *self.fail_greatest.lock().unwrap() {
            return Err(AppError::Internal("connection refused".to_string()));
        }
        Ok(self.greatest.lock().unwrap().clone())
    }

    async fn insert_collaborator(
        &self,
        collaborator: NewCollaborator,
    ) -> Result<Collaborator, AppError> {
        self.touch();
        self.attempted_identifiers
            .lock()
            .unwrap()
            .push(collaborator.identifier.clone());
        if *self.fail_all_inserts.lock().unwrap()
            || self.reject_names.lock().unwrap().contains(&collaborator.name)
        {
            return Err(AppError::Internal("insert rejected".to_string()));
        }

        let created = Collaborator {
            id: Uuid::new_v4(),
            identifier: collaborator.identifier,
            name: collaborator.name,
            email: collaborator.email,
            phone: collaborator.phone,
            admission_date: collaborator.admission_date,
            status: collaborator.status,
            role: collaborator.role,
            department: collaborator.department,
            storage_folder: None,
            created_at: Utc::now(),
        };
        self.collaborators.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn insert_document(
        &self,
        document: NewDocument,
    ) -> Result<CollaboratorDocument, AppError> {
        self.touch();
        let created = CollaboratorDocument {
            id: Uuid::new_v4(),
            collaborator_id: document.collaborator_id,
            original_filename: document.original_filename,
            stored_filename: document.stored_filename,
            file_url: document.file_url,
            content_type: document.content_type,
            file_size: document.file_size,
            category: document.category,
            uploaded_at: Utc::now(),
        };
        self.documents.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn set_storage_folder(&self, collaborator_id: Uuid, folder: &str) -> Result<(), AppError> {
        self.touch();
        self.folders
            .lock()
            .unwrap()
            .insert(collaborator_id, folder.to_string());
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// In-memory `StorageClient`
#[derive(Clone, Default)]
pub struct MockStorage {
    pub folders: Arc<Mutex<Vec<String>>>,
    pub files: Arc<Mutex<HashMap<(String, String), Vec<u8>>>>,
    pub fail_folders: Arc<Mutex<bool>>,
    /// Original file names whose upload should fail.
    pub reject_files: Arc<Mutex<HashSet<String>>>,
    pub calls: Arc<Mutex<usize>>,
}

impl MockStorage {
    pub fn reject(&self, file_name: &str) {
        self.reject_files.lock().unwrap().insert(file_name.to_string());
    }
}

#[async_trait]
impl StorageClient for MockStorage {
    async fn create_folder(&self, folder_name: &str) -> StorageResult<()> {
        *self.calls.lock().unwrap() += 1;
        if *self.fail_folders.lock().unwrap() {
            return Err(StorageError::FolderFailed("service unavailable".to_string()));
        }
        self.folders.lock().unwrap().push(folder_name.to_string());
        Ok(())
    }

    async fn upload_buffer(
        &self,
        data: Vec<u8>,
        file_name: &str,
        folder_name: &str,
        _mime_type: &str,
    ) -> StorageResult<StoredFile> {
        *self.calls.lock().unwrap() += 1;
        if self.reject_files.lock().unwrap().contains(file_name) {
            return Err(StorageError::UploadFailed("quota exceeded".to_string()));
        }
        let stored_file_name = format!("stored_{}", file_name);
        self.files.lock().unwrap().insert(
            (folder_name.to_string(), stored_file_name.clone()),
            data,
        );
        Ok(StoredFile {
            file_url: Some(format!("mem://{}/{}", folder_name, stored_file_name)),
            stored_file_name,
        })
    }

    async fn download(&self, folder_name: &str, stored_file_name: &str) -> StorageResult<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(&(folder_name.to_string(), stored_file_name.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(stored_file_name.to_string()))
    }

    async fn delete(&self, folder_name: &str, stored_file_name: &str) -> StorageResult<()> {
        self.files
            .lock()
            .unwrap()
            .remove(&(folder_name.to_string(), stored_file_name.to_string()));
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
