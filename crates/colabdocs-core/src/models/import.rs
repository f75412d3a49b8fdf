use serde::{Deserialize, Serialize};

/// Counts and diagnostics for one bulk import run.
///
/// Created fresh per request and returned in the response body; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    #[serde(rename = "colaboradoresCriados")]
    pub created_count: u32,
    #[serde(rename = "documentosImportados")]
    pub imported_document_count: u32,
    /// One line per rejected file or failed step, in the order they happened.
    #[serde(rename = "erros")]
    pub errors: Vec<String>,
}

impl ImportSummary {
    pub fn with_errors(errors: Vec<String>) -> Self {
        Self {
            errors,
            ..Self::default()
        }
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}

/// Body returned by the import endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ImportSummary>,
}

impl ImportResponse {
    pub fn succeeded(summary: ImportSummary) -> Self {
        Self {
            success: true,
            error: None,
            summary: Some(summary),
        }
    }

    pub fn failed(error: impl Into<String>, summary: Option<ImportSummary>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            summary,
        }
    }
}
