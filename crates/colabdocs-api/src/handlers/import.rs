//! Bulk collaborator import from a ZIP archive

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::{extract_multipart_file, validate_archive_name, validate_file_size};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use colabdocs_core::models::ImportResponse;
use colabdocs_services::ImportOutcome;
use std::sync::Arc;

/// `POST /api/v0/colaboradores/import`
///
/// Returns 200 when at least one collaborator was created and 400 with the
/// full summary when none was. Per-file problems never fail the request.
#[tracing::instrument(skip_all)]
pub async fn import_collaborators(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let (data, filename, _content_type) = extract_multipart_file(multipart).await?;

    validate_archive_name(&filename)?;
    validate_file_size(data.len(), state.config.max_archive_size_bytes())?;

    tracing::info!(filename = %filename, size = data.len(), "Starting collaborator import");

    let outcome = state.import_service.import_archive(data).await?;

    let response = match outcome {
        ImportOutcome::Success { summary } => {
            tracing::info!(
                created = summary.created_count,
                documents = summary.imported_document_count,
                errors = summary.errors.len(),
                "Collaborator import finished"
            );
            (StatusCode::OK, Json(ImportResponse::succeeded(summary)))
        }
        ImportOutcome::Failure { message, summary } => {
            tracing::warn!(
                error = %message,
                errors = summary.errors.len(),
                "Collaborator import created no collaborators"
            );
            (
                StatusCode::BAD_REQUEST,
                Json(ImportResponse::failed(message, Some(summary))),
            )
        }
    };

    Ok(response)
}
