use colabdocs_core::models::{CollaboratorDocument, NewDocument};
use colabdocs_core::AppError;
use sqlx::{PgPool, Postgres};

/// Repository for document metadata attached to collaborators
#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, document), fields(db.table = "collaborator_documents", db.operation = "insert", collaborator_id = %document.collaborator_id))]
    pub async fn insert(&self, document: NewDocument) -> Result<CollaboratorDocument, AppError> {
        let created = sqlx::query_as::<Postgres, CollaboratorDocument>(
            r#"
            INSERT INTO collaborator_documents
                (collaborator_id, original_filename, stored_filename, file_url, content_type, file_size, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, collaborator_id, original_filename, stored_filename, file_url,
                      content_type, file_size, category, uploaded_at
            "#,
        )
        .bind(document.collaborator_id)
        .bind(&document.original_filename)
        .bind(&document.stored_filename)
        .bind(&document.file_url)
        .bind(&document.content_type)
        .bind(document.file_size)
        .bind(&document.category)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
