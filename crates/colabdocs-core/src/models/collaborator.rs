use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A collaborator ("colaborador") record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Collaborator {
    pub id: Uuid,
    /// Sequential, zero-padded human readable identifier (e.g. `00042`).
    pub identifier: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub admission_date: NaiveDate,
    pub status: String,
    pub role: String,
    pub department: String,
    /// Folder in file storage holding this collaborator's documents.
    pub storage_folder: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCollaborator {
    pub identifier: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub admission_date: NaiveDate,
    pub status: String,
    pub role: String,
    pub department: String,
}

impl NewCollaborator {
    /// Storage folder name for a collaborator once its record id is known.
    pub fn folder_name(identifier: &str, record_id: Uuid) -> String {
        format!("{}_{}", identifier, record_id)
    }
}
