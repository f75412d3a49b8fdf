//! Store abstraction used by the import orchestrator
//!
//! The orchestrator only needs a handful of writes, so it depends on this
//! trait instead of the concrete repositories. Tests substitute an in-memory
//! implementation.

use async_trait::async_trait;
use colabdocs_core::models::{Collaborator, CollaboratorDocument, NewCollaborator, NewDocument};
use colabdocs_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{CollaboratorRepository, DocumentRepository};

/// Persistence operations needed to import collaborators
#[async_trait]
pub trait CollaboratorStore: Send + Sync {
    /// Greatest identifier stored so far, if any
    async fn greatest_identifier(&self) -> Result<Option<String>, AppError>;

    async fn insert_collaborator(
        &self,
        collaborator: NewCollaborator,
    ) -> Result<Collaborator, AppError>;

    async fn insert_document(&self, document: NewDocument)
        -> Result<CollaboratorDocument, AppError>;

    /// Record the storage folder created for a collaborator
    async fn set_storage_folder(&self, collaborator_id: Uuid, folder: &str)
        -> Result<(), AppError>;

    /// Connectivity probe for readiness checks
    async fn ping(&self) -> Result<(), AppError>;
}

/// Postgres-backed `CollaboratorStore`
#[derive(Clone)]
pub struct PgCollaboratorStore {
    pool: PgPool,
    collaborators: CollaboratorRepository,
    documents: DocumentRepository,
}

impl PgCollaboratorStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            collaborators: CollaboratorRepository::new(pool.clone()),
            documents: DocumentRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl CollaboratorStore for PgCollaboratorStore {
    async fn greatest_identifier(&self) -> Result<Option<String>, AppError> {
        self.collaborators.greatest_identifier().await
    }

    async fn insert_collaborator(
        &self,
        collaborator: NewCollaborator,
    ) -> Result<Collaborator, AppError> {
        self.collaborators.insert(collaborator).await
    }

    async fn insert_document(
        &self,
        document: NewDocument,
    ) -> Result<CollaboratorDocument, AppError> {
        self.documents.insert(document).await
    }

    async fn set_storage_folder(
        &self,
        collaborator_id: Uuid,
        folder: &str,
    ) -> Result<(), AppError> {
        self.collaborators
            .set_storage_folder(collaborator_id, folder)
            .await
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
