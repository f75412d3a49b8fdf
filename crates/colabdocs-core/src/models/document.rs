use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for a document stored on behalf of a collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CollaboratorDocument {
    pub id: Uuid,
    pub collaborator_id: Uuid,
    pub original_filename: String,
    /// File name assigned by the storage service.
    pub stored_filename: String,
    pub file_url: Option<String>,
    pub content_type: String,
    pub file_size: i64,
    pub category: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub collaborator_id: Uuid,
    pub original_filename: String,
    pub stored_filename: String,
    pub file_url: Option<String>,
    pub content_type: String,
    pub file_size: i64,
    pub category: String,
}
