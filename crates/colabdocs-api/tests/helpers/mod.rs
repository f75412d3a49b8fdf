//! Test helpers: build AppState and router for integration tests.
//!
//! Run with: `cargo test -p colabdocs-api --test import_test`. The database is
//! replaced by an in-memory store; files go to `LocalStorage` in a temp dir.

#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use colabdocs_api::constants;
use colabdocs_api::setup::routes;
use colabdocs_api::AppState;
use colabdocs_core::models::{Collaborator, CollaboratorDocument, NewCollaborator, NewDocument};
use colabdocs_core::{AppError, BaseConfig, Config, ImporterConfig, StorageBackend};
use colabdocs_db::CollaboratorStore;
use colabdocs_storage::LocalStorage;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use uuid::Uuid;

/// Archive size limit used by the test app.
pub const TEST_MAX_ARCHIVE_BYTES: usize = 64 * 1024;

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    pub collaborators: Arc<Mutex<Vec<Collaborator>>>,
    pub documents: Arc<Mutex<Vec<CollaboratorDocument>>>,
    pub unavailable: Arc<Mutex<bool>>,
}

impl InMemoryStore {
    /// Store a collaborator that existed before the test ran.
    pub fn seed(&self, identifier: &str, name: &str) {
        self.collaborators.lock().unwrap().push(Collaborator {
            id: Uuid::new_v4(),
            identifier: identifier.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", identifier),
            phone: "(11) 91234-5678".to_string(),
            admission_date: Utc::now().date_naive(),
            status: "Ativo".to_string(),
            role: "Operador".to_string(),
            department: "Operação".to_string(),
            storage_folder: None,
            created_at: Utc::now(),
        });
    }

    fn check_available(&self) -> Result<(), AppError> {
        if *self.unavailable.lock().unwrap() {
            return Err(AppError::Internal("database unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CollaboratorStore for InMemoryStore {
    async fn greatest_identifier(&self) -> Result<Option<String>, AppError> {
        self.check_available()?;
        Ok(self
            .collaborators
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.identifier.clone())
            .max_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b))))
    }

    async fn insert_collaborator(
        &self,
        collaborator: NewCollaborator,
    ) -> Result<Collaborator, AppError> {
        self.check_available()?;
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
        self.check_available()?;
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
        self.check_available()?;
        let mut collaborators = self.collaborators.lock().unwrap();
        let collaborator = collaborators
            .iter_mut()
            .find(|c| c.id == collaborator_id)
            .ok_or_else(|| AppError::NotFound(format!("Collaborator {}", collaborator_id)))?;
        collaborator.storage_folder = Some(folder.to_string());
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_available()
    }
}

pub fn test_config(storage_path: &std::path::Path) -> Config {
    Config(Box::new(ImporterConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 1,
            db_timeout_seconds: 1,
            environment: "test".to_string(),
        },
        database_url: "postgres://unused@localhost/unused".to_string(),
        storage_backend: StorageBackend::Local,
        storage_api_url: None,
        storage_api_token: None,
        storage_ca_cert_path: None,
        storage_timeout_secs: 5,
        local_storage_path: Some(storage_path.display().to_string()),
        local_storage_base_url: Some("http://localhost/files".to_string()),
        max_archive_size_bytes: TEST_MAX_ARCHIVE_BYTES,
        max_archive_entries: 100,
        max_entry_size_bytes: 1024 * 1024,
        max_total_uncompressed_bytes: 4 * 1024 * 1024,
        placeholder_email_domain: "importado.local".to_string(),
    }))
}

/// Test application: server plus the store and temp dir behind it.
pub struct TestApp {
    pub server: TestServer,
    pub store: InMemoryStore,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Number of folders created under the storage root.
    pub fn storage_folder_count(&self) -> usize {
        std::fs::read_dir(self.temp_dir.path())
            .map(|entries| entries.filter_map(Result::ok).count())
            .unwrap_or(0)
    }
}

pub async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config(temp_dir.path());

    let storage = LocalStorage::new(temp_dir.path(), "http://localhost/files".to_string())
        .await
        .expect("local storage");
    let store = InMemoryStore::default();

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(store.clone()),
        Arc::new(storage),
    ));
    let router = routes::setup_routes(&config, state).expect("routes");
    let server = TestServer::new(router).expect("test server");

    TestApp {
        server,
        store,
        temp_dir,
    }
}
