//! Shared name validation for storage backends.
//!
//! Folder and file names are single path segments. Anything that could
//! escape the folder (separators, `..`, NUL) is rejected.

use crate::{StorageError, StorageResult};
use uuid::Uuid;

/// Validate a folder or file name supplied by a caller.
pub fn validate_segment(kind: &str, name: &str) -> StorageResult<()> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(StorageError::InvalidName(format!("{} name is empty", kind)));
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") || name.contains('\0') {
        return Err(StorageError::InvalidName(format!(
            "{} name contains invalid characters: {}",
            kind, name
        )));
    }
    Ok(())
}

/// Reduce an uploaded file name to a safe single segment.
///
/// Only the base name is kept; characters outside `[A-Za-z0-9._-]` become `_`.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.').replace("..", "_");
    if cleaned.is_empty() {
        "arquivo".to_string()
    } else {
        cleaned
    }
}

/// Unique stored name for an upload: `{uuid}_{sanitized}`.
pub fn generate_stored_name(file_name: &str) -> String {
    format!("{}_{}", Uuid::new_v4().simple(), sanitize_file_name(file_name))
}
