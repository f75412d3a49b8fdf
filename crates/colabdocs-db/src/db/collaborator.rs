use colabdocs_core::models::{Collaborator, NewCollaborator};
use colabdocs_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Zero padding stops at five digits, so longer identifiers sort first.
const GREATEST_IDENTIFIER_SQL: &str =
    "SELECT identifier FROM collaborators ORDER BY length(identifier) DESC, identifier DESC LIMIT 1";

const COLLABORATOR_COLUMNS: &str = "id, identifier, name, email, phone, admission_date, status, role, department, storage_folder, created_at";

/// Repository for collaborator records
#[derive(Clone)]
pub struct CollaboratorRepository {
    pool: PgPool,
}

impl CollaboratorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Numerically greatest identifier currently stored.
    ///
    /// Identifiers are zero padded to five digits and grow past that
    /// (`99999` is followed by `100000`), so length is compared first.
    #[tracing::instrument(skip(self), fields(db.table = "collaborators", db.operation = "select"))]
    pub async fn greatest_identifier(&self) -> Result<Option<String>, AppError> {
        let identifier = sqlx::query_scalar::<Postgres, String>(GREATEST_IDENTIFIER_SQL)
            .fetch_optional(&self.pool)
            .await?;

        Ok(identifier)
    }

    #[tracing::instrument(skip(self, collaborator), fields(db.table = "collaborators", db.operation = "insert", identifier = %collaborator.identifier))]
    pub async fn insert(&self, collaborator: NewCollaborator) -> Result<Collaborator, AppError> {
        let query = format!(
            r#"
            INSERT INTO collaborators (identifier, name, email, phone, admission_date, status, role, department)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            COLLABORATOR_COLUMNS
        );

        let created = sqlx::query_as::<Postgres, Collaborator>(&query)
            .bind(&collaborator.identifier)
            .bind(&collaborator.name)
            .bind(&collaborator.email)
            .bind(&collaborator.phone)
            .bind(collaborator.admission_date)
            .bind(&collaborator.status)
            .bind(&collaborator.role)
            .bind(&collaborator.department)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    /// Record the storage folder holding a collaborator's documents
    #[tracing::instrument(skip(self), fields(db.table = "collaborators", db.operation = "update", db.record_id = %id))]
    pub async fn set_storage_folder(&self, id: Uuid, folder: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE collaborators SET storage_folder = $1 WHERE id = $2")
            .bind(folder)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Collaborator {} not found", id)));
        }

        Ok(())
    }
}
